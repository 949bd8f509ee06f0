//! Order records and the line items shared with the cart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{OrderId, OrderStatus, ProductId};

/// One product line in a cart or an order.
///
/// `price_at_add` is the product's price when it first went into the cart,
/// so an order keeps its historical value after catalog price changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price_at_add: Decimal,
}

impl LineItem {
    /// Line value at the captured price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price_at_add * Decimal::from(self.quantity)
    }
}

/// A placed order.
///
/// Only `status` and `completed_at` change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Store-assigned order ID.
    pub id: OrderId,
    /// Ordered line items.
    pub items: Vec<LineItem>,
    /// Amount charged, tax included.
    pub total_amount: Decimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Set when the order transitions to completed.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

/// Input for creating an order. The store assigns everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
}
