//! Trousseau prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{CART_STORAGE_KEY, CartEntry, CartError, CartState, CartStore, QuantityChange},
    catalog::{Catalog, CatalogError, ProductQuery, SortOrder},
    checkout::{
        Checkout, CheckoutError, CheckoutForm, CheckoutState, Field, FieldError, HandOff,
        HandOffError, HandOffLink, Outbox, PlacedOrder, ShopSettings, ValidationErrors,
        WriterHandOff,
    },
    orders::{
        CustomerDetails, MY_ORDERS_KEY, ORDERS_KEY, Order, OrderId, OrderIdGenerator, OrderItem,
        OrderLog, OrderLogError, OrderStatus, OrderSummary, PaymentMethod, PreferredContact,
    },
    prices::Price,
    pricing::{OrderTotals, PricingError},
    products::{Category, Product, ProductAttributes, ProductId},
    receipt::{Receipt, ReceiptError},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    wishlist::{WISHLIST_STORAGE_KEY, WishlistStore},
};
