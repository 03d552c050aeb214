//! Catalog
//!
//! A read-only product catalog loaded from YAML, with the filters the product
//! listing offers.
//!
//! ```yaml
//! products:
//!   - id: kanjivaram-red
//!     name: Red Kanjivaram Silk
//!     price: 12500 INR
//!     category: saree
//!     images: [kanjivaram-red-1.jpg]
//! ```

use std::{fs, io, path::Path};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    prices::{Price, currency},
    products::{Category, InvalidProduct, Product, ProductAttributes, ProductId},
};

/// Page size used when a query does not set one.
pub const DEFAULT_LIMIT: usize = 100;

/// Catalog loading and lookup errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading a catalog file
    #[error("failed to read catalog file: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("invalid price format: {0}")]
    InvalidPrice(String),

    /// Price in a currency other than the storefront's
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Product failed validation
    #[error(transparent)]
    InvalidProduct(#[from] InvalidProduct),

    /// Two products share an id
    #[error("duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// No product with the requested id
    #[error("product not found: {0}")]
    NotFound(String),
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    products: Vec<ProductFixture>,
}

/// Product as written in a catalog file
#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    price: String,
    #[serde(default)]
    original_price: Option<String>,
    category: Category,
    #[serde(default)]
    sub_category: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    stock: u32,
    #[serde(default)]
    featured: bool,
    #[serde(default)]
    attributes: Option<ProductAttributes>,
}

impl TryFrom<ProductFixture> for Product {
    type Error = CatalogError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let original_price = fixture
            .original_price
            .as_deref()
            .map(parse_price)
            .transpose()?;

        Ok(Product {
            id: ProductId::new(fixture.id),
            name: fixture.name,
            description: fixture.description,
            price: parse_price(&fixture.price)?,
            original_price,
            category: fixture.category,
            sub_category: fixture.sub_category,
            images: fixture.images,
            stock: fixture.stock,
            featured: fixture.featured,
            attributes: fixture.attributes,
        })
    }
}

/// Parse a price string (e.g. "12500 INR" or "899.50 INR") into paise.
///
/// # Errors
///
/// Returns an error if the string is not "AMOUNT CURRENCY", the amount is not a
/// non-negative number, or the currency is not the storefront's.
pub fn parse_price(s: &str) -> Result<Price, CatalogError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(CatalogError::InvalidPrice(format!(
            "expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    if code != currency().iso_alpha_code {
        return Err(CatalogError::UnsupportedCurrency(code.to_string()));
    }

    let minor_units = amount
        .parse::<Decimal>()
        .ok()
        .and_then(|value| value.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|value| value.round_dp(0).to_u64())
        .ok_or_else(|| CatalogError::InvalidPrice(s.to_string()))?;

    Ok(Price::new(minor_units))
}

/// Listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    /// Catalog order, newest first
    #[default]
    Newest,

    /// Cheapest first
    PriceLow,

    /// Most expensive first
    PriceHigh,

    /// Alphabetical by name
    Name,
}

/// Filters for [`Catalog::query`]. Unset filters match everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    /// Only this category
    pub category: Option<Category>,

    /// Only featured (or only non-featured) products
    pub featured: Option<bool>,

    /// Case-insensitive text in the name, description or sub-category
    pub search: Option<String>,

    /// Lowest price, inclusive
    pub min_price: Option<Price>,

    /// Highest price, inclusive
    pub max_price: Option<Price>,

    /// Result order
    pub sort: SortOrder,

    /// Results to skip
    pub skip: usize,

    /// Maximum results
    pub limit: usize,
}

impl Default for ProductQuery {
    fn default() -> Self {
        ProductQuery {
            category: None,
            featured: None,
            search: None,
            min_price: None,
            max_price: None,
            sort: SortOrder::default(),
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ProductQuery {
    fn matches(&self, product: &Product, needle: Option<&str>) -> bool {
        if self.category.is_some_and(|category| category != product.category) {
            return false;
        }

        if self.featured.is_some_and(|featured| featured != product.featured) {
            return false;
        }

        if self.min_price.is_some_and(|min| product.price < min)
            || self.max_price.is_some_and(|max| product.price > max)
        {
            return false;
        }

        needle.is_none_or(|needle| {
            [
                Some(product.name.as_str()),
                product.description.as_deref(),
                product.sub_category.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(needle))
        })
    }
}

/// Product catalog
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: FxHashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from products, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if a product is invalid or an id repeats.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut index = FxHashMap::default();

        for (idx, product) in products.iter().enumerate() {
            product.validate()?;

            if index.insert(product.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }

        Ok(Catalog { products, index })
    }

    /// Parse a YAML catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML, a price or a product is invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;

        let products = fixture
            .products
            .into_iter()
            .map(Product::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Catalog::new(products)
    }

    /// Load a YAML catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let catalog = Catalog::from_yaml_str(&fs::read_to_string(path)?)?;

        debug!(path = %path.display(), products = catalog.len(), "loaded catalog");

        Ok(catalog)
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no product has this id.
    pub fn get(&self, id: &str) -> Result<&Product, CatalogError> {
        self.index
            .get(id)
            .and_then(|&idx| self.products.get(idx))
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Every product, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products matching `query`, sorted and paged.
    #[must_use]
    pub fn query(&self, query: &ProductQuery) -> Vec<&Product> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut found: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| query.matches(product, needle.as_deref()))
            .collect();

        match query.sort {
            SortOrder::Newest => {}
            SortOrder::PriceLow => found.sort_by_key(|product| product.price),
            SortOrder::PriceHigh => found.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Name => found.sort_by_cached_key(|product| product.name.to_lowercase()),
        }

        found.into_iter().skip(query.skip).take(query.limit).collect()
    }
}
