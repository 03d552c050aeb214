//! Trousseau
//!
//! Trousseau is the cart and checkout core of a bridal-wear storefront: a persisted
//! cart whose total is always the sum of its lines, and the order submission flow
//! that turns it into an order handed off to the shop over a chat deep link.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod storage;
pub mod wishlist;
