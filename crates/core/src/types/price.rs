//! Decimal pricing helpers.
//!
//! All money in Stockroom is a [`Decimal`] in US dollars. Amounts are kept
//! exact internally and only rounded when formatted for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat sales tax applied to every order (10%).
pub const SALES_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Subtotal, tax and grand total for a prospective or placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OrderTotals {
    /// Sum of line prices before tax.
    pub subtotal: Decimal,
    /// Tax charged on the subtotal.
    pub tax: Decimal,
    /// Amount charged: subtotal plus tax.
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals for a subtotal at [`SALES_TAX_RATE`].
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal) -> Self {
        let tax = subtotal * SALES_TAX_RATE;
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Format an amount as dollars with two decimal places (e.g. `$22.00`).
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}
