use std::io;

use clap::{Args, Subcommand};
use trousseau::{
    cart::{CartStore, QuantityChange},
    pricing::OrderTotals,
    receipt::Receipt,
    storage::FileStorage,
};

use crate::{
    cli::{load_catalog, open_storage, shop_settings},
    config::Config,
};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart with its totals
    Show,

    /// Add a product to the cart
    Add(AddArgs),

    /// Set the quantity of a product in the cart; zero removes it
    Update(UpdateArgs),

    /// Remove a product from the cart
    Remove(RemoveArgs),

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product id
    id: String,

    /// Quantity to add
    #[arg(short, long, default_value_t = 1)]
    quantity: u32,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Product id
    id: String,

    /// New quantity
    quantity: u32,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Product id
    id: String,
}

pub(crate) fn run(config: &Config, command: CartCommand) -> Result<(), String> {
    let mut cart = CartStore::open(open_storage(config)?);

    match command.command {
        CartSubcommand::Show => show(config, &cart)?,
        CartSubcommand::Add(args) => {
            let catalog = load_catalog(config)?;
            let product = catalog.get(&args.id).map_err(|error| error.to_string())?;

            cart.add_to_cart(product, args.quantity)
                .map_err(|error| format!("failed to add {}: {error}", args.id))?;

            println!("added {} × {}", args.quantity, product.name);
        }
        CartSubcommand::Update(args) => {
            let change = cart
                .update_quantity(&args.id, args.quantity)
                .map_err(|error| format!("failed to update {}: {error}", args.id))?;

            match change {
                QuantityChange::NotInCart => println!("{} is not in the cart", args.id),
                QuantityChange::Updated { from, to } => {
                    println!("updated {} from {from} to {to}", args.id);
                }
                QuantityChange::Removed => println!("removed {}", args.id),
            }
        }
        CartSubcommand::Remove(args) => match cart.remove_from_cart(&args.id) {
            Some(entry) => println!("removed {}", entry.product().name),
            None => println!("{} is not in the cart", args.id),
        },
        CartSubcommand::Clear => {
            cart.clear_cart();
            println!("cart cleared");
        }
    }

    println!("items: {}  total: {}", cart.cart_count(), cart.total());

    if cart.is_degraded() {
        eprintln!("warning: the cart could not be saved and will be lost on exit");
    }

    Ok(())
}

fn show(config: &Config, cart: &CartStore<FileStorage>) -> Result<(), String> {
    if cart.is_empty() {
        println!("your cart is empty");
        return Ok(());
    }

    let settings = shop_settings(config)?;
    let totals = OrderTotals::from_subtotal(cart.total(), settings.tax_rate, settings.shipping)
        .map_err(|error| error.to_string())?;
    let tax_label = format!("{}:", settings.tax_label());

    Receipt::new(cart.items(), totals, &tax_label)
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print cart: {error}"))
}
