//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{cart::CartEntry, prices::Price};

/// Errors that can occur while calculating prices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// A sum or product did not fit in the price range.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was negative")]
    PercentConversion,
}

/// Calculates `price × quantity` for one line.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the line total does not fit.
pub fn line_total(price: Price, quantity: u32) -> Result<Price, PricingError> {
    price.checked_mul(quantity).ok_or(PricingError::Overflow)
}

/// Calculates the total price of a list of cart entries.
///
/// An empty list totals zero.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the total does not fit.
pub fn total_price(entries: &[CartEntry]) -> Result<Price, PricingError> {
    entries.iter().try_fold(Price::ZERO, |acc, entry| {
        acc.checked_add(entry.line_total()?)
            .ok_or(PricingError::Overflow)
    })
}

/// Calculates `percent` of an amount in minor units, rounded half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the result cannot be represented.
pub fn percent_of_minor(percent: Percentage, minor: u64) -> Result<u64, PricingError> {
    let percent = percent * Decimal::ONE;

    let Some(applied) = percent.checked_mul(Decimal::from(minor)) else {
        return Err(PricingError::PercentConversion);
    };

    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let Some(rounded) = rounded.to_u64() else {
        return Err(PricingError::PercentConversion);
    };

    Ok(rounded)
}

/// Billing breakdown for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    /// Sum of all line totals
    pub subtotal: Price,

    /// Tax charged on the subtotal
    pub tax: Price,

    /// Shipping charge
    pub shipping: Price,

    /// `subtotal + tax + shipping`
    pub total: Price,
}

impl OrderTotals {
    /// Computes tax and grand total for a subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the tax cannot be represented or the total overflows.
    pub fn from_subtotal(
        subtotal: Price,
        tax_rate: Decimal,
        shipping: Price,
    ) -> Result<Self, PricingError> {
        let tax = Price::new(percent_of_minor(Percentage::from(tax_rate), *subtotal)?);

        let total = subtotal
            .checked_add(tax)
            .and_then(|sum| sum.checked_add(shipping))
            .ok_or(PricingError::Overflow)?;

        Ok(OrderTotals {
            subtotal,
            tax,
            shipping,
            total,
        })
    }
}
