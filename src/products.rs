//! Products

use std::{borrow::Borrow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prices::Price;

/// Product identifier, unique across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new product identifier.
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        ProductId(value)
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Product category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Sarees
    Saree,

    /// Jewellery and ornaments
    Ornament,

    /// Complete bridal sets
    BridalSet,
}

impl Category {
    /// The wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Saree => "saree",
            Category::Ornament => "ornament",
            Category::BridalSet => "bridal-set",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "saree" => Ok(Category::Saree),
            "ornament" => Ok(Category::Ornament),
            "bridal-set" => Ok(Category::BridalSet),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Descriptive product attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductAttributes {
    /// Fabric or metal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,

    /// Dominant colour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Embroidery or craft work
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work: Option<String>,

    /// Weight, free text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,

    /// Occasions the product suits
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub occasion: Vec<String>,
}

/// Problems that make a product unfit for listing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidProduct {
    /// The product id is blank.
    #[error("product id is empty")]
    MissingId,

    /// The product name is blank.
    #[error("product {0} has no name")]
    MissingName(ProductId),

    /// The product has no images.
    #[error("product {0} has no images")]
    MissingImages(ProductId),
}

/// Product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Long description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit price
    pub price: Price,

    /// List price before markdown, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,

    /// Product category
    pub category: Category,

    /// Free-text sub-category, e.g. "Kanjivaram"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,

    /// Image references, in display order
    #[serde(default)]
    pub images: Vec<String>,

    /// Units in stock
    #[serde(default)]
    pub stock: u32,

    /// Whether the product is featured on the home page
    #[serde(default)]
    pub featured: bool,

    /// Descriptive attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<ProductAttributes>,
}

impl Product {
    /// Creates a product with the required fields and no optional data.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Price,
        category: Category,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            original_price: None,
            category,
            sub_category: None,
            images: Vec::new(),
            stock: 0,
            featured: false,
            attributes: None,
        }
    }

    /// The first image, used as the thumbnail.
    #[must_use]
    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Percentage off the original price, rounded down, when marked down.
    #[must_use]
    pub fn discount_percent(&self) -> Option<u64> {
        let original = self.original_price?;

        if original <= self.price || *original == 0 {
            return None;
        }

        let off = u128::from(*original - *self.price) * 100 / u128::from(*original);

        u64::try_from(off).ok()
    }

    /// Whether any stock remains.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Checks the product is complete enough to be listed.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidProduct`] describing the first missing field.
    pub fn validate(&self) -> Result<(), InvalidProduct> {
        if self.id.as_str().trim().is_empty() {
            return Err(InvalidProduct::MissingId);
        }

        if self.name.trim().is_empty() {
            return Err(InvalidProduct::MissingName(self.id.clone()));
        }

        if self.images.is_empty() {
            return Err(InvalidProduct::MissingImages(self.id.clone()));
        }

        Ok(())
    }
}
