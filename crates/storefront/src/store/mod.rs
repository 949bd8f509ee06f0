//! Product and order store abstractions.
//!
//! The services in this crate talk to persistence only through the
//! [`ProductStore`] and [`OrderStore`] traits, so the backend can be swapped
//! (in-memory for tests and demos, `PostgreSQL` for hosted data) without
//! touching checkout or lifecycle code.

pub mod memory;

pub use memory::{InMemoryOrderStore, InMemoryProductStore};

use async_trait::async_trait;

use stockroom_core::{Order, OrderDraft, OrderId, OrderStatus, Product, ProductDraft, ProductId};

use crate::error::{StoreError, StoreResult};

/// CRUD access to the product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products.
    async fn get_all(&self) -> StoreResult<Vec<Product>>;

    /// One product by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product does not exist.
    async fn get_by_id(&self, id: ProductId) -> StoreResult<Product>;

    /// Create a product. The store assigns its ID and timestamps.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for an invalid draft and
    /// `StoreError::Conflict` if the SKU is taken.
    async fn create(&self, draft: ProductDraft) -> StoreResult<Product>;

    /// Replace a product's fields, keeping its ID and creation time.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound`, `StoreError::Validation` or
    /// `StoreError::Conflict`.
    async fn update(&self, id: ProductId, draft: ProductDraft) -> StoreResult<Product>;

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product does not exist.
    async fn delete(&self, id: ProductId) -> StoreResult<()>;

    /// Set the units on hand.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for a negative or oversized quantity
    /// and `StoreError::NotFound` if the product does not exist.
    async fn update_quantity(&self, id: ProductId, quantity: i64) -> StoreResult<Product>;

    /// Products with some stock at or below their threshold.
    async fn low_stock(&self) -> StoreResult<Vec<Product>>;

    /// Distinct categories, sorted.
    async fn categories(&self) -> StoreResult<Vec<String>>;
}

/// CRUD access to placed orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders.
    async fn get_all(&self) -> StoreResult<Vec<Order>>;

    /// One order by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order does not exist.
    async fn get_by_id(&self, id: OrderId) -> StoreResult<Order>;

    /// Create an order: the store assigns the ID, sets status `pending`,
    /// stamps the creation time and leaves the completion time unset.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Validation` for an order without lines.
    async fn create(&self, draft: OrderDraft) -> StoreResult<Order>;

    /// Write a new status. Moving to `completed` stamps `completed_at`.
    ///
    /// This is the raw store write and accepts any status; lifecycle rules are
    /// enforced by [`crate::lifecycle::OrderLifecycle`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order does not exist.
    async fn update_status(&self, id: OrderId, status: OrderStatus) -> StoreResult<Order>;

    /// Delete an order (administrative only).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order does not exist.
    async fn delete(&self, id: OrderId) -> StoreResult<()>;

    /// Orders with the given status.
    async fn by_status(&self, status: OrderStatus) -> StoreResult<Vec<Order>>;

    /// Up to `limit` orders, newest first.
    async fn recent(&self, limit: usize) -> StoreResult<Vec<Order>>;
}

/// Check a product draft before it reaches a backend.
///
/// # Errors
///
/// Returns `StoreError::Validation` describing the first problem found.
pub fn validate_product_draft(draft: &ProductDraft) -> StoreResult<()> {
    if draft.name.trim().is_empty() {
        return Err(StoreError::Validation("product name cannot be empty".to_string()));
    }
    if draft.sku.trim().is_empty() {
        return Err(StoreError::Validation("SKU cannot be empty".to_string()));
    }
    if draft.price.is_sign_negative() {
        return Err(StoreError::Validation("price cannot be negative".to_string()));
    }
    Ok(())
}

/// Convert a requested stock quantity into a storable one.
///
/// # Errors
///
/// Returns `StoreError::Validation` if the quantity is negative or too large.
pub fn validate_quantity(quantity: i64) -> StoreResult<u32> {
    if quantity < 0 {
        return Err(StoreError::Validation(format!(
            "quantity cannot be negative (got {quantity})"
        )));
    }
    u32::try_from(quantity)
        .map_err(|_| StoreError::Validation(format!("quantity {quantity} is too large")))
}

/// Check an order draft before it reaches a backend.
///
/// # Errors
///
/// Returns `StoreError::Validation` for an empty order, zero-unit lines or a
/// negative total.
pub fn validate_order_draft(draft: &OrderDraft) -> StoreResult<()> {
    if draft.items.is_empty() {
        return Err(StoreError::Validation("order has no line items".to_string()));
    }
    if draft.items.iter().any(|item| item.quantity == 0) {
        return Err(StoreError::Validation(
            "line item quantity must be positive".to_string(),
        ));
    }
    if draft.total_amount.is_sign_negative() {
        return Err(StoreError::Validation("order total cannot be negative".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use stockroom_core::LineItem;

    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Desk Lamp".to_string(),
            description: String::new(),
            sku: "LAMP-01".to_string(),
            category: "Lighting".to_string(),
            price: Decimal::new(3999, 2),
            quantity: 5,
            low_stock_threshold: 2,
            image_url: String::new(),
        }
    }

    #[test]
    fn test_valid_product_draft() {
        assert!(validate_product_draft(&draft()).is_ok());
    }

    #[test]
    fn test_product_draft_rejects_blank_name_and_sku() {
        let mut blank_name = draft();
        blank_name.name = "  ".to_string();
        assert!(matches!(
            validate_product_draft(&blank_name),
            Err(StoreError::Validation(_))
        ));

        let mut blank_sku = draft();
        blank_sku.sku = String::new();
        assert!(validate_product_draft(&blank_sku).is_err());
    }

    #[test]
    fn test_product_draft_rejects_negative_price() {
        let mut negative = draft();
        negative.price = Decimal::new(-1, 0);
        assert!(validate_product_draft(&negative).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(0).ok(), Some(0));
        assert_eq!(validate_quantity(12).ok(), Some(12));
        assert!(matches!(validate_quantity(-1), Err(StoreError::Validation(_))));
        assert!(validate_quantity(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_order_draft_validation() {
        let item = LineItem {
            product_id: ProductId::new(1),
            quantity: 1,
            price_at_add: Decimal::ONE,
        };
        let ok = OrderDraft {
            items: vec![item],
            total_amount: Decimal::new(11, 1),
        };
        assert!(validate_order_draft(&ok).is_ok());

        let empty = OrderDraft {
            items: Vec::new(),
            total_amount: Decimal::ZERO,
        };
        assert!(validate_order_draft(&empty).is_err());

        let zero_units = OrderDraft {
            items: vec![LineItem { quantity: 0, ..item }],
            total_amount: Decimal::ZERO,
        };
        assert!(validate_order_draft(&zero_units).is_err());
    }
}
