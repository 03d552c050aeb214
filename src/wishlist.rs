//! Wishlist
//!
//! A persisted set of product snapshots the visitor wants to come back to.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    products::Product,
    storage::{Storage, StorageError},
};

/// Storage key the wishlist document is persisted under.
pub const WISHLIST_STORAGE_KEY: &str = "wishlist-storage";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct WishlistState {
    items: Vec<Product>,
}

/// Saved products, in the order they were added.
///
/// Persistence follows the cart: every change is written through, and a failed
/// write is logged while the in-memory list keeps working.
#[derive(Debug)]
pub struct WishlistStore<S: Storage> {
    storage: S,
    state: WishlistState,
    degraded: bool,
}

impl<S: Storage> WishlistStore<S> {
    /// Open the store, rehydrating any persisted wishlist.
    pub fn open(storage: S) -> Self {
        let loaded = load_state(&storage);

        let (state, degraded) = match loaded {
            Ok(state) => (state, false),
            Err(err) => {
                warn!(error = %err, "could not rehydrate wishlist; starting empty");
                (WishlistState::default(), true)
            }
        };

        WishlistStore {
            storage,
            state,
            degraded,
        }
    }

    /// Save a product. Returns `false` if it was already saved.
    #[tracing::instrument(skip_all, fields(product_id = %product.id))]
    pub fn add(&mut self, product: &Product) -> bool {
        if self.contains(product.id.as_str()) {
            debug!("product already in wishlist");
            return false;
        }

        self.state.items.push(product.clone());
        self.persist();

        true
    }

    /// Remove a product, returning it if it was saved.
    #[tracing::instrument(skip(self))]
    pub fn remove(&mut self, product_id: &str) -> Option<Product> {
        let idx = self
            .state
            .items
            .iter()
            .position(|product| product.id.as_str() == product_id)?;

        let removed = self.state.items.remove(idx);
        self.persist();

        Some(removed)
    }

    /// Whether a product is saved.
    #[must_use]
    pub fn contains(&self, product_id: &str) -> bool {
        self.state
            .items
            .iter()
            .any(|product| product.id.as_str() == product_id)
    }

    /// Remove every product.
    pub fn clear(&mut self) {
        self.state.items.clear();
        self.persist();
    }

    /// Saved products.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.state.items
    }

    /// Number of saved products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Whether the last write (or the initial load) failed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Tear the store down, returning its storage.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.state)
            .map_err(|err| StorageError::Unavailable(err.to_string()))
            .and_then(|json| self.storage.write(WISHLIST_STORAGE_KEY, &json));

        self.degraded = match result {
            Ok(()) => false,
            Err(err) => {
                warn!(error = %err, "failed to persist wishlist; continuing in memory");
                true
            }
        };
    }
}

/// Errors reading a persisted wishlist.
#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("corrupt wishlist document: {0}")]
    Json(#[from] serde_json::Error),
}

fn load_state<S: Storage>(storage: &S) -> Result<WishlistState, LoadError> {
    let Some(json) = storage.read(WISHLIST_STORAGE_KEY)? else {
        return Ok(WishlistState::default());
    };

    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        prices::Price,
        products::Category,
        storage::{MemoryStorage, MockStorage},
    };

    use super::*;

    fn product(id: &str) -> Product {
        Product::new(id, id, Price::new(100), Category::Saree)
    }

    #[test]
    fn add_is_deduplicated() {
        let mut wishlist = WishlistStore::open(MemoryStorage::new());

        assert!(wishlist.add(&product("a")));
        assert!(!wishlist.add(&product("a")));
        assert!(wishlist.add(&product("b")));

        assert_eq!(wishlist.len(), 2);
        assert!(wishlist.contains("a"));
    }

    #[test]
    fn remove_and_clear() {
        let mut wishlist = WishlistStore::open(MemoryStorage::new());
        wishlist.add(&product("a"));
        wishlist.add(&product("b"));

        assert_eq!(wishlist.remove("a").map(|p| p.id), Some("a".into()));
        assert_eq!(wishlist.remove("a"), None);

        wishlist.clear();

        assert!(wishlist.is_empty());
    }

    #[test]
    fn reopen_restores_saved_products() -> TestResult {
        let mut wishlist = WishlistStore::open(MemoryStorage::new());
        wishlist.add(&product("a"));
        wishlist.add(&product("b"));

        let storage = wishlist.into_storage();
        assert!(storage.read(WISHLIST_STORAGE_KEY)?.is_some());

        let reopened = WishlistStore::open(storage);
        let ids: Vec<&str> = reopened.items().iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, ["a", "b"]);

        Ok(())
    }

    #[test]
    fn failed_write_is_degraded_not_fatal() {
        let mut storage = MockStorage::new();
        storage.expect_read().returning(|_| Ok(None));
        storage
            .expect_write()
            .returning(|_, _| Err(StorageError::Unavailable("quota exceeded".into())));

        let mut wishlist = WishlistStore::open(storage);

        assert!(wishlist.add(&product("a")));
        assert!(wishlist.is_degraded());
        assert!(wishlist.contains("a"));
    }

    #[test]
    fn corrupt_document_starts_empty_and_degraded() -> TestResult {
        let mut storage = MemoryStorage::new();
        storage.write(WISHLIST_STORAGE_KEY, "[not json")?;

        let wishlist = WishlistStore::open(storage);

        assert!(wishlist.is_empty());
        assert!(wishlist.is_degraded());

        Ok(())
    }

    #[test]
    fn unreadable_storage_starts_empty_and_degraded() {
        let mut storage = MockStorage::new();
        storage
            .expect_read()
            .returning(|_| Err(StorageError::Unavailable("locked".into())));

        let wishlist = WishlistStore::open(storage);

        assert!(wishlist.is_empty());
        assert!(wishlist.is_degraded());
    }

    #[test]
    fn load_errors_name_the_document() {
        let err = serde_json::from_str::<WishlistState>("[not json").map_err(LoadError::from);

        assert!(matches!(
            err,
            Err(LoadError::Json(ref source)) if source.is_syntax()
        ));
        assert!(
            err.is_err_and(|e| e.to_string().starts_with("corrupt wishlist document"))
        );
    }
}
