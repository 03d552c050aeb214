//! Prices

use std::{fmt, ops::Deref};

use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::{Deserialize, Serialize};

/// The currency every storefront price is denominated in.
pub fn currency() -> &'static Currency {
    iso::INR
}

/// Represents a price in paise (minor units of INR).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price {
    value: u64,
}

impl Price {
    /// A zero price.
    pub const ZERO: Price = Price { value: 0 };

    /// Creates a new Price from minor units.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Price { value }
    }

    /// Creates a new Price from whole rupees, if it fits.
    #[must_use]
    pub fn from_major(rupees: u64) -> Option<Self> {
        rupees.checked_mul(100).map(Price::new)
    }

    /// Returns the price in minor units.
    #[must_use]
    pub const fn minor_units(self) -> u64 {
        self.value
    }

    /// Adds two prices, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Price) -> Option<Price> {
        self.value.checked_add(other.value).map(Price::new)
    }

    /// Subtracts `other`, returning `None` if the result would be negative.
    #[must_use]
    pub fn checked_sub(self, other: Price) -> Option<Price> {
        self.value.checked_sub(other.value).map(Price::new)
    }

    /// Multiplies the price by a quantity, returning `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Price> {
        self.value.checked_mul(u64::from(quantity)).map(Price::new)
    }

    /// Converts the price to a [`Money`] value for display and arithmetic.
    ///
    /// Values above `i64::MAX` paise are clamped.
    #[must_use]
    pub fn to_money(self) -> Money<'static, Currency> {
        Money::from_minor(i64::try_from(self.value).unwrap_or(i64::MAX), currency())
    }
}

impl Deref for Price {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_money(), f)
    }
}
