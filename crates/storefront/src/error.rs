//! Unified error types for stores and checkout.
//!
//! Store implementations map their backend failures into [`StoreError`];
//! services above the stores only ever see this taxonomy.

use thiserror::Error;

use stockroom_core::{OrderId, ProductId};

/// Errors returned by product and order stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced product or order does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity kind (`product` or `order`).
        entity: &'static str,
        /// The ID that failed to resolve.
        id: i32,
    },

    /// Input was rejected (negative quantity, empty name, illegal transition).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Constraint violation (e.g., duplicate SKU).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A stored record could not be mapped back into a domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The underlying persistence call failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Shorthand for a missing product.
    #[must_use]
    pub const fn product_not_found(id: ProductId) -> Self {
        Self::NotFound {
            entity: "product",
            id: id.as_i32(),
        }
    }

    /// Shorthand for a missing order.
    #[must_use]
    pub const fn order_not_found(id: OrderId) -> Self {
        Self::NotFound {
            entity: "order",
            id: id.as_i32(),
        }
    }

    /// Whether retrying the same call could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Message suitable for showing to the person at the keyboard.
    ///
    /// Backend details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unavailable(_) | Self::DataCorruption(_) => {
                "The store is unavailable right now, please try again".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Self::Conflict(db_err.message().to_owned())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::DataCorruption(err.to_string())
            }
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Errors that abort a checkout.
///
/// Stock reconciliation failures are not here: they are logged per line and
/// never fail a checkout whose order was created.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The order store rejected or failed the order. The cart is unchanged.
    #[error("failed to place order: {0}")]
    OrderCreate(#[source] StoreError),
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::product_not_found(ProductId::new(7));
        assert_eq!(err.to_string(), "product 7 not found");

        let err = StoreError::order_not_found(OrderId::new(3));
        assert_eq!(err.to_string(), "order 3 not found");

        let err = StoreError::Validation("quantity must not be negative".to_string());
        assert_eq!(
            err.to_string(),
            "validation failed: quantity must not be negative"
        );
    }

    #[test]
    fn test_only_unavailable_is_retryable() {
        assert!(StoreError::Unavailable("timeout".to_string()).is_retryable());
        assert!(!StoreError::Validation("bad".to_string()).is_retryable());
        assert!(!StoreError::product_not_found(ProductId::new(1)).is_retryable());
    }

    #[test]
    fn test_user_message_hides_backend_details() {
        let err = StoreError::Unavailable("connection refused (os error 111)".to_string());
        assert!(!err.user_message().contains("os error"));

        let err = StoreError::Conflict("sku MUG-1 already exists".to_string());
        assert_eq!(err.user_message(), "constraint violation: sku MUG-1 already exists");
    }

    #[test]
    fn test_sqlx_row_not_found_is_unavailable() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_checkout_error_display() {
        let err = CheckoutError::OrderCreate(StoreError::Unavailable("down".to_string()));
        assert_eq!(err.to_string(), "failed to place order: store unavailable: down");
        assert_eq!(CheckoutError::EmptyCart.to_string(), "cart is empty");
    }
}
