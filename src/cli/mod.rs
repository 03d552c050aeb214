use clap::{Parser, Subcommand};
use trousseau::{catalog::Catalog, checkout::ShopSettings, storage::FileStorage};

use crate::config::Config;

mod cart;
mod checkout;
mod orders;
mod products;
mod wishlist;

#[derive(Debug, Parser)]
#[command(name = "trousseau", about = "Bridal storefront cart and checkout", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products(products::ProductsCommand),

    /// Manage the cart
    Cart(cart::CartCommand),

    /// Manage saved products
    Wishlist(wishlist::WishlistCommand),

    /// Place the cart as an order
    Checkout(checkout::CheckoutArgs),

    /// List logged orders
    Orders(orders::OrdersArgs),
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Products(command) => products::run(&self.config, command),
            Commands::Cart(command) => cart::run(&self.config, command),
            Commands::Wishlist(command) => wishlist::run(&self.config, command),
            Commands::Checkout(args) => checkout::run(&self.config, args),
            Commands::Orders(args) => orders::run(&self.config, &args),
        }
    }
}

fn open_storage(config: &Config) -> Result<FileStorage, String> {
    FileStorage::open(&config.storage.storage_dir).map_err(|error| {
        format!(
            "failed to open storage at {}: {error}",
            config.storage.storage_dir.display()
        )
    })
}

fn load_catalog(config: &Config) -> Result<Catalog, String> {
    Catalog::load(&config.storage.catalog).map_err(|error| {
        format!(
            "failed to load catalog {}: {error}",
            config.storage.catalog.display()
        )
    })
}

fn shop_settings(config: &Config) -> Result<ShopSettings, String> {
    config
        .shop
        .settings()
        .map_err(|error| format!("invalid shop settings: {error}"))
}
