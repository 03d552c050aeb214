//! Receipt
//!
//! Renders a cart as a table with its billing summary.

use std::io;

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartEntry,
    pricing::{OrderTotals, PricingError},
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line total could not be computed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// A cart and its billing breakdown, ready to print.
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    entries: &'a [CartEntry],
    totals: OrderTotals,
    tax_label: &'a str,
}

impl<'a> Receipt<'a> {
    /// Create a receipt for `entries`. `tax_label` names the tax line, e.g. `GST (18%)`.
    pub fn new(entries: &'a [CartEntry], totals: OrderTotals, tax_label: &'a str) -> Self {
        Receipt {
            entries,
            totals,
            tax_label,
        }
    }

    /// Billing breakdown
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        self.totals
    }

    /// Writes the receipt.
    ///
    /// # Errors
    ///
    /// Returns an error if a line total overflows or the writer fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Category", "Qty", "Unit Price", "Line Total"]);

        for (idx, entry) in self.entries.iter().enumerate() {
            let product = entry.product();

            builder.push_record([
                format!("#{:<3}", idx + 1),
                product.name.clone(),
                product.category.to_string(),
                entry.quantity().to_string(),
                product.price.to_string(),
                entry.line_total()?.to_string(),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "\n{table}")?;

        let shipping = if self.totals.shipping.minor_units() == 0 {
            format!("{} (FREE)", self.totals.shipping)
        } else {
            self.totals.shipping.to_string()
        };

        let lines = [
            ("Subtotal:", self.totals.subtotal.to_string()),
            (self.tax_label, self.totals.tax.to_string()),
            ("Shipping:", shipping),
            ("Total:", self.totals.total.to_string()),
        ];

        let label_width = lines
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or_default();

        let value_width = lines
            .iter()
            .map(|(_, value)| value.chars().count())
            .max()
            .unwrap_or_default();

        for (label, value) in lines {
            writeln!(out, " {label:>label_width$} {value:>value_width$}")?;
        }

        writeln!(out)?;

        Ok(())
    }
}
