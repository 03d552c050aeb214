//! Cart
//!
//! [`CartState`] holds the entries and the running total and owns every rule about
//! how they change. [`CartStore`] wraps a state with durable persistence.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    prices::Price,
    pricing::{PricingError, line_total, total_price},
    products::{Product, ProductId},
};

pub mod store;

pub use store::{CART_STORAGE_KEY, CartStore};

/// Errors related to cart mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The mutation would overflow a quantity or the total.
    #[error("cart mutation for {0} overflows")]
    Overflow(ProductId),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One product snapshot and how many of it the visitor wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    product: Product,
    quantity: NonZeroU32,
}

impl CartEntry {
    /// Creates a new entry.
    #[must_use]
    pub fn new(product: Product, quantity: NonZeroU32) -> Self {
        CartEntry { product, quantity }
    }

    /// The product snapshot taken when the entry was added.
    #[must_use]
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Quantity, always at least one.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    /// `quantity × unit price`
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the line total does not fit.
    pub fn line_total(&self) -> Result<Price, PricingError> {
        line_total(self.product.price, self.quantity.get())
    }
}

/// Cart contents plus the running total.
///
/// The total always equals the sum of `quantity × price` over the entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<CartEntry>,
    total: Price,
}

/// What happened to an entry when its quantity was updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// No entry exists for the product.
    NotInCart,

    /// The quantity was replaced.
    Updated {
        /// Quantity before the update
        from: u32,
        /// Quantity after the update
        to: u32,
    },

    /// The quantity was zero, so the entry was removed.
    Removed,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from entries, computing the total and merging duplicates.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if quantities or the total overflow.
    pub fn from_entries(entries: impl IntoIterator<Item = CartEntry>) -> Result<Self, CartError> {
        let mut state = CartState::new();

        for entry in entries {
            state.add(&entry.product, entry.quantity)?;
        }

        Ok(state)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartEntry] {
        &self.items
    }

    /// The running total.
    #[must_use]
    pub fn total(&self) -> Price {
        self.total
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items
            .iter()
            .map(|entry| u64::from(entry.quantity()))
            .sum()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn get(&self, product_id: &str) -> Option<&CartEntry> {
        self.items
            .iter()
            .find(|entry| entry.product.id.as_str() == product_id)
    }

    fn position(&self, product_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|entry| entry.product.id.as_str() == product_id)
    }

    /// Add `quantity` of `product`, merging with an existing entry.
    ///
    /// A merged entry keeps its original snapshot and position.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] and leaves the state untouched if the
    /// quantity or total would overflow.
    pub fn add(&mut self, product: &Product, quantity: NonZeroU32) -> Result<(), CartError> {
        let position = self.position(product.id.as_str());
        let unit_price = position
            .and_then(|idx| self.items.get(idx))
            .map_or(product.price, |entry| entry.product.price);

        let delta = line_total(unit_price, quantity.get())
            .map_err(|_overflow| CartError::Overflow(product.id.clone()))?;
        let total = self
            .total
            .checked_add(delta)
            .ok_or_else(|| CartError::Overflow(product.id.clone()))?;

        match position.and_then(|idx| self.items.get_mut(idx)) {
            Some(entry) => {
                entry.quantity = entry
                    .quantity
                    .checked_add(quantity.get())
                    .ok_or_else(|| CartError::Overflow(product.id.clone()))?;
            }
            None => self.items.push(CartEntry::new(product.clone(), quantity)),
        }

        self.total = total;

        Ok(())
    }

    /// Replace the quantity for a product. Zero removes the entry.
    ///
    /// Unknown products are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] and leaves the state untouched if the
    /// total would overflow.
    pub fn update(&mut self, product_id: &str, quantity: u32) -> Result<QuantityChange, CartError> {
        let Some(idx) = self.position(product_id) else {
            return Ok(QuantityChange::NotInCart);
        };

        let Some(quantity) = NonZeroU32::new(quantity) else {
            self.remove(product_id);
            return Ok(QuantityChange::Removed);
        };

        let Some(entry) = self.items.get_mut(idx) else {
            return Ok(QuantityChange::NotInCart);
        };

        let from = entry.quantity.get();
        let to = quantity.get();
        let price = entry.product.price;
        let overflow = || CartError::Overflow(entry.product.id.clone());

        let total = if to >= from {
            let delta = line_total(price, to - from).map_err(|_overflow| overflow())?;
            self.total.checked_add(delta).ok_or_else(overflow)?
        } else {
            let delta = line_total(price, from - to).map_err(|_overflow| overflow())?;
            self.total.checked_sub(delta).ok_or_else(overflow)?
        };

        entry.quantity = quantity;
        self.total = total;

        Ok(QuantityChange::Updated { from, to })
    }

    /// Remove the entry for a product, returning it if it was present.
    pub fn remove(&mut self, product_id: &str) -> Option<CartEntry> {
        let idx = self.position(product_id)?;
        let entry = self.items.remove(idx);

        // The entry's contribution can never exceed the total while it is consistent.
        let contribution = entry.line_total().unwrap_or(self.total);
        self.total = self.total.checked_sub(contribution).unwrap_or(Price::ZERO);

        Some(entry)
    }

    /// Remove every entry and zero the total.
    pub fn clear(&mut self) {
        self.items.clear();
        self.total = Price::ZERO;
    }

    /// Recompute the total from the entries.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the sum overflows.
    pub fn recomputed_total(&self) -> Result<Price, PricingError> {
        total_price(&self.items)
    }

    /// Whether the total matches the entries and every product appears once.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let unique = self
            .items
            .iter()
            .enumerate()
            .all(|(idx, entry)| self.position(entry.product.id.as_str()) == Some(idx));

        unique && self.recomputed_total() == Ok(self.total)
    }

    /// Rebuild the state so it is consistent, merging duplicate entries and
    /// recomputing the total.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the rebuilt state would overflow.
    pub fn normalized(self) -> Result<Self, CartError> {
        CartState::from_entries(self.items)
    }
}
