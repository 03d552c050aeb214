use clap::{Args, Subcommand};
use trousseau::{
    catalog::{DEFAULT_LIMIT, ProductQuery, SortOrder},
    prices::Price,
    products::{Category, Product},
};

use crate::{cli::load_catalog, config::Config};

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List products matching filters
    List(ListProductsArgs),

    /// Show one product
    Show(ShowProductArgs),
}

#[derive(Debug, Args)]
struct ListProductsArgs {
    /// Only this category
    #[arg(long, value_enum)]
    category: Option<Category>,

    /// Only featured products
    #[arg(long)]
    featured: bool,

    /// Text to look for in names and descriptions
    #[arg(long)]
    search: Option<String>,

    /// Lowest price in rupees
    #[arg(long)]
    min_price: Option<u64>,

    /// Highest price in rupees
    #[arg(long)]
    max_price: Option<u64>,

    /// Result order
    #[arg(long, value_enum, default_value_t = SortOrder::Newest)]
    sort: SortOrder,

    /// Results to skip
    #[arg(long, default_value_t = 0)]
    skip: usize,

    /// Maximum results
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,
}

#[derive(Debug, Args)]
struct ShowProductArgs {
    /// Product id
    id: String,
}

pub(crate) fn run(config: &Config, command: ProductsCommand) -> Result<(), String> {
    match command.command {
        ProductsSubcommand::List(args) => list(config, args),
        ProductsSubcommand::Show(args) => show(config, &args),
    }
}

fn list(config: &Config, args: ListProductsArgs) -> Result<(), String> {
    let catalog = load_catalog(config)?;

    let query = ProductQuery {
        category: args.category,
        featured: args.featured.then_some(true),
        search: args.search,
        min_price: rupees(args.min_price)?,
        max_price: rupees(args.max_price)?,
        sort: args.sort,
        skip: args.skip,
        limit: args.limit,
    };

    let products = catalog.query(&query);

    if products.is_empty() {
        println!("no products found");
        return Ok(());
    }

    for product in products {
        println!("{}", summary_line(product));
    }

    Ok(())
}

fn show(config: &Config, args: &ShowProductArgs) -> Result<(), String> {
    let catalog = load_catalog(config)?;
    let product = catalog.get(&args.id).map_err(|error| error.to_string())?;

    println!("id: {}", product.id);
    println!("name: {}", product.name);
    println!("category: {}", product.category);
    if let Some(sub_category) = &product.sub_category {
        println!("sub_category: {sub_category}");
    }
    println!("price: {}", product.price);
    if let (Some(original), Some(percent)) = (product.original_price, product.discount_percent()) {
        println!("original_price: {original} ({percent}% off)");
    }
    println!("stock: {}", product.stock);
    if let Some(description) = &product.description {
        println!("description: {description}");
    }
    if let Some(attributes) = &product.attributes {
        for (label, value) in [
            ("material", &attributes.material),
            ("color", &attributes.color),
            ("work", &attributes.work),
            ("weight", &attributes.weight),
        ] {
            if let Some(value) = value {
                println!("{label}: {value}");
            }
        }
        if !attributes.occasion.is_empty() {
            println!("occasion: {}", attributes.occasion.join(", "));
        }
    }
    println!("images: {}", product.images.join(", "));

    Ok(())
}

fn summary_line(product: &Product) -> String {
    let mut line = format!(
        "{:<24} {:<32} {:<10} {:>14}",
        product.id.as_str(),
        product.name,
        product.category.as_str(),
        product.price.to_string()
    );

    if product.featured {
        line.push_str("  featured");
    }

    if !product.in_stock() {
        line.push_str("  out of stock");
    }

    line
}

fn rupees(value: Option<u64>) -> Result<Option<Price>, String> {
    value
        .map(|rupees| Price::from_major(rupees).ok_or_else(|| format!("price out of range: {rupees}")))
        .transpose()
}
