use clap::{Args, Subcommand};
use trousseau::wishlist::WishlistStore;

use crate::{
    cli::{load_catalog, open_storage},
    config::Config,
};

#[derive(Debug, Args)]
pub(crate) struct WishlistCommand {
    #[command(subcommand)]
    command: WishlistSubcommand,
}

#[derive(Debug, Subcommand)]
enum WishlistSubcommand {
    /// List saved products
    Show,

    /// Save a product
    Add(ProductArgs),

    /// Forget a saved product
    Remove(ProductArgs),

    /// Forget every saved product
    Clear,
}

#[derive(Debug, Args)]
struct ProductArgs {
    /// Product id
    id: String,
}

pub(crate) fn run(config: &Config, command: WishlistCommand) -> Result<(), String> {
    let mut wishlist = WishlistStore::open(open_storage(config)?);

    match command.command {
        WishlistSubcommand::Show => {
            if wishlist.is_empty() {
                println!("your wishlist is empty");
            }

            for product in wishlist.items() {
                println!("{:<24} {:<32} {}", product.id.as_str(), product.name, product.price);
            }
        }
        WishlistSubcommand::Add(args) => {
            let catalog = load_catalog(config)?;
            let product = catalog.get(&args.id).map_err(|error| error.to_string())?;

            if wishlist.add(product) {
                println!("saved {}", product.name);
            } else {
                println!("{} is already saved", product.name);
            }
        }
        WishlistSubcommand::Remove(args) => match wishlist.remove(&args.id) {
            Some(product) => println!("removed {}", product.name),
            None => println!("{} is not saved", args.id),
        },
        WishlistSubcommand::Clear => {
            wishlist.clear();
            println!("wishlist cleared");
        }
    }

    if wishlist.is_degraded() {
        eprintln!("warning: the wishlist could not be saved and will be lost on exit");
    }

    Ok(())
}
