//! Integration tests for the persisted cart store

use rand::{Rng, SeedableRng, rngs::StdRng};
use testresult::TestResult;

use trousseau::{
    cart::{CART_STORAGE_KEY, CartStore, QuantityChange},
    prices::Price,
    products::{Category, Product},
    storage::{FileStorage, MemoryStorage, Storage},
};

fn product(id: &str, price: u64) -> Product {
    Product::new(id, format!("Product {id}"), Price::new(price), Category::Ornament)
}

fn assert_consistent<S: Storage>(cart: &CartStore<S>) {
    let expected: u64 = cart
        .items()
        .iter()
        .map(|entry| u64::from(entry.quantity()) * entry.product().price.minor_units())
        .sum();

    assert_eq!(cart.total(), Price::new(expected), "total must equal the sum of line totals");
    assert!(cart.state().is_consistent(), "entries must be unique and total in sync");
}

#[test]
fn worked_example_tracks_the_running_total() -> TestResult {
    let p1 = product("P1", 1_000);
    let p2 = product("P2", 500);
    let mut cart = CartStore::open(MemoryStorage::new());

    cart.add_to_cart(&p1, 2)?;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.get("P1").map(|entry| entry.quantity()), Some(2));
    assert_eq!(cart.total(), Price::new(2_000));

    cart.add_to_cart(&p2, 1)?;
    assert_eq!(cart.total(), Price::new(2_500));

    assert_eq!(
        cart.update_quantity("P1", 5)?,
        QuantityChange::Updated { from: 2, to: 5 }
    );
    assert_eq!(cart.total(), Price::new(5_500));

    assert!(cart.remove_from_cart("P2").is_some());
    assert_eq!(cart.total(), Price::new(5_000));

    cart.clear_cart();
    assert!(cart.items().is_empty());
    assert_eq!(cart.total(), Price::ZERO);

    Ok(())
}

#[test]
fn adding_an_existing_product_merges_quantities() -> TestResult {
    let mut cart = CartStore::open(MemoryStorage::new());
    let saree = product("saree", 1_250_000);

    cart.add_to_cart(&saree, 1)?;
    cart.add_to_cart(&saree, 2)?;

    assert_eq!(cart.len(), 1);
    assert_eq!(cart.cart_count(), 3);
    assert_eq!(cart.total(), Price::new(3_750_000));

    Ok(())
}

#[test]
fn removal_is_idempotent() -> TestResult {
    let mut cart = CartStore::open(MemoryStorage::new());
    cart.add_to_cart(&product("a", 100), 1)?;
    cart.add_to_cart(&product("b", 200), 1)?;

    assert!(cart.remove_from_cart("a").is_some());
    let after_first = cart.state().clone();

    assert!(cart.remove_from_cart("a").is_none());
    assert_eq!(cart.state(), &after_first);
    assert_eq!(cart.total(), Price::new(200));

    Ok(())
}

#[test]
fn update_to_zero_removes_the_entry() -> TestResult {
    let mut cart = CartStore::open(MemoryStorage::new());
    cart.add_to_cart(&product("a", 100), 3)?;

    assert_eq!(cart.update_quantity("a", 0)?, QuantityChange::Removed);
    assert!(cart.is_empty());
    assert_eq!(cart.total(), Price::ZERO);

    Ok(())
}

#[test]
fn random_operations_keep_the_total_consistent() -> TestResult {
    let catalog: Vec<Product> = (1..=6_u64)
        .map(|n| product(&format!("p{n}"), n * 1_337))
        .collect();
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut cart = CartStore::open(MemoryStorage::new());

    for _ in 0..1_000 {
        let idx = rng.gen_range(0..catalog.len());
        let target = catalog.get(idx).ok_or("index out of range")?;

        match rng.gen_range(0..10) {
            0..=3 => cart.add_to_cart(target, rng.gen_range(0..4))?,
            4..=6 => {
                cart.update_quantity(target.id.as_str(), rng.gen_range(0..6))?;
            }
            7 | 8 => {
                cart.remove_from_cart(target.id.as_str());
            }
            _ => cart.clear_cart(),
        }

        assert_consistent(&cart);
    }

    let before = cart.state().clone();
    let reopened = CartStore::open(cart.into_storage());

    assert_eq!(reopened.state(), &before);

    Ok(())
}

#[test]
fn persisted_document_has_the_documented_shape() -> TestResult {
    let mut cart = CartStore::open(MemoryStorage::new());
    cart.add_to_cart(&product("P1", 1_000), 2)?;

    let json = cart.storage().read(CART_STORAGE_KEY)?.ok_or("cart not persisted")?;
    let value: serde_json::Value = serde_json::from_str(&json)?;

    assert_eq!(value["total"], 2_000);
    assert_eq!(value["items"][0]["quantity"], 2);
    assert_eq!(value["items"][0]["product"]["id"], "P1");
    assert_eq!(value["items"][0]["product"]["price"], 1_000);
    assert_eq!(value["items"][0]["product"]["category"], "ornament");

    Ok(())
}

#[test]
fn file_storage_survives_a_restart() -> TestResult {
    let dir = tempfile::tempdir()?;

    let before = {
        let mut cart = CartStore::open(FileStorage::open(dir.path())?);
        cart.add_to_cart(&product("necklace", 459_900), 1)?;
        cart.add_to_cart(&product("jhumka", 129_900), 2)?;
        assert!(!cart.is_degraded());
        cart.state().clone()
    };

    let reopened = CartStore::open(FileStorage::open(dir.path())?);

    assert_eq!(reopened.state(), &before);
    assert_eq!(reopened.total(), Price::new(719_700));

    Ok(())
}
