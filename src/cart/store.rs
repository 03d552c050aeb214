//! Cart store

use std::num::NonZeroU32;

use tracing::{debug, warn};

use crate::{
    cart::{CartEntry, CartError, CartState, QuantityChange},
    prices::Price,
    products::Product,
    storage::{Storage, StorageError},
};

/// Storage key the cart document is persisted under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// The authoritative, persisted record of what the visitor intends to buy.
///
/// Every mutator durably writes the full state before returning. A failed write
/// is logged and the in-memory state keeps serving reads and writes.
#[derive(Debug)]
pub struct CartStore<S: Storage> {
    storage: S,
    state: CartState,
    degraded: bool,
}

impl<S: Storage> CartStore<S> {
    /// Open the store, rehydrating any persisted cart.
    ///
    /// Missing, unreadable or corrupt documents start an empty cart.
    pub fn open(storage: S) -> Self {
        let (state, degraded) = match load_state(&storage) {
            Ok(state) => (state, false),
            Err(err) => {
                warn!(error = %err, "could not rehydrate cart; starting empty");
                (CartState::new(), true)
            }
        };

        debug!(
            items = state.len(),
            total = *state.total(),
            "opened cart store"
        );

        CartStore {
            storage,
            state,
            degraded,
        }
    }

    /// Add `quantity` of `product` to the cart, merging with an existing entry.
    ///
    /// A quantity of zero is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the cart would overflow; nothing changes.
    #[tracing::instrument(skip_all, fields(product_id = %product.id, quantity = quantity))]
    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        let Some(quantity) = NonZeroU32::new(quantity) else {
            debug!("ignoring add with zero quantity");
            return Ok(());
        };

        self.state.add(product, quantity)?;
        self.persist();

        Ok(())
    }

    /// Replace the quantity of a product already in the cart.
    ///
    /// Unknown products are ignored. A quantity of zero removes the entry.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the cart would overflow; nothing changes.
    #[tracing::instrument(skip(self))]
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        quantity: u32,
    ) -> Result<QuantityChange, CartError> {
        let change = self.state.update(product_id, quantity)?;

        match change {
            QuantityChange::NotInCart => debug!("product not in cart; nothing to update"),
            QuantityChange::Updated { .. } | QuantityChange::Removed => {
                self.persist();
            }
        }

        Ok(change)
    }

    /// Remove a product from the cart, returning its entry if present.
    #[tracing::instrument(skip(self))]
    pub fn remove_from_cart(&mut self, product_id: &str) -> Option<CartEntry> {
        let removed = self.state.remove(product_id);

        if removed.is_some() {
            self.persist();
        } else {
            debug!("product not in cart; nothing to remove");
        }

        removed
    }

    /// Empty the cart.
    #[tracing::instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.state.clear();
        self.persist();
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.state.count()
    }

    /// The running total.
    #[must_use]
    pub fn total(&self) -> Price {
        self.state.total()
    }

    /// Entries in display order.
    #[must_use]
    pub fn items(&self) -> &[CartEntry] {
        self.state.items()
    }

    /// The full cart state.
    #[must_use]
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Look up the entry for a product.
    #[must_use]
    pub fn get(&self, product_id: &str) -> Option<&CartEntry> {
        self.state.get(product_id)
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Whether the last durable write (or the initial load) failed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// The underlying storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Tear the store down, returning its storage.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Durably write the current state.
    ///
    /// Returns `true` if the write completed. Failures are logged and leave the
    /// store in degraded mode until a later write succeeds.
    pub fn persist(&mut self) -> bool {
        let result = serde_json::to_string(&self.state)
            .map_err(|err| StorageError::Unavailable(err.to_string()))
            .and_then(|json| self.storage.write(CART_STORAGE_KEY, &json));

        match result {
            Ok(()) => {
                if self.degraded {
                    debug!("cart persistence recovered");
                }
                self.degraded = false;
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to persist cart; continuing in memory");
                self.degraded = true;
                false
            }
        }
    }
}

/// Errors reading a persisted cart.
#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("corrupt cart document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Cart(#[from] CartError),
}

fn load_state<S: Storage>(storage: &S) -> Result<CartState, LoadError> {
    let Some(json) = storage.read(CART_STORAGE_KEY)? else {
        return Ok(CartState::new());
    };

    let state: CartState = serde_json::from_str(&json)?;

    if state.is_consistent() {
        return Ok(state);
    }

    warn!("persisted cart total out of sync with entries; recomputing");

    state.normalized().map_err(LoadError::from)
}
