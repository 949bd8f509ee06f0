//! Checkout: turn the cart into an order and reconcile stock.
//!
//! Order creation is the commit point. Once the order store has accepted the
//! order it is the durable record, whatever happens to the stock updates that
//! follow. Each line's stock decrement is attempted independently and a
//! failure is logged, not returned, so the cart is always cleared after a
//! successful create.
//!
//! The decrement is a read-then-write against the product store and is not
//! atomic: a concurrent stock edit between the two calls can be lost.

use tracing::{error, info, instrument, warn};

use stockroom_core::{LineItem, Order, OrderDraft, OrderTotals, Product, ProductId};

use crate::cart::Cart;
use crate::error::{CheckoutError, StoreError};
use crate::store::{OrderStore, ProductStore};

/// Outcome of a successful checkout.
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    /// The order as created by the order store.
    pub order: Order,
    /// Subtotal, tax and total charged.
    pub totals: OrderTotals,
    /// Products whose stock could not be decremented.
    pub unsynced: Vec<ProductId>,
}

impl CheckoutReceipt {
    /// Whether every line's stock was decremented.
    #[must_use]
    pub fn stock_synced(&self) -> bool {
        self.unsynced.is_empty()
    }
}

/// Places orders from a cart.
pub struct CheckoutService<'a> {
    products: &'a dyn ProductStore,
    orders: &'a dyn OrderStore,
}

impl<'a> CheckoutService<'a> {
    /// Create a checkout service over the given stores.
    #[must_use]
    pub const fn new(products: &'a dyn ProductStore, orders: &'a dyn OrderStore) -> Self {
        Self { products, orders }
    }

    /// Place an order for everything in `cart`.
    ///
    /// Totals are computed from `catalog` prices with the flat sales tax. On
    /// success the cart is cleared and the created order returned.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if there is nothing to order, and
    /// `CheckoutError::OrderCreate` if the order store fails. In both cases
    /// the cart is left untouched and no order exists.
    #[instrument(skip_all, fields(lines = cart.entries().len()))]
    pub async fn place_order(
        &self,
        cart: &mut Cart,
        catalog: &[Product],
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = cart.summary(catalog);
        let draft = OrderDraft {
            items: cart.line_items(),
            total_amount: totals.total,
        };

        let order = self.orders.create(draft).await.map_err(|e| {
            error!(error = %e, "Order creation failed, cart kept");
            CheckoutError::OrderCreate(e)
        })?;
        info!(order_id = %order.id, total = %order.total_amount, "Order placed");

        let unsynced = self.reconcile_stock(&order).await;
        if !unsynced.is_empty() {
            warn!(
                order_id = %order.id,
                failed_lines = unsynced.len(),
                "Order placed with unsynced stock"
            );
        }

        cart.clear();

        Ok(CheckoutReceipt {
            order,
            totals,
            unsynced,
        })
    }

    /// Decrement stock for every line of `order`, returning the products
    /// whose update failed.
    async fn reconcile_stock(&self, order: &Order) -> Vec<ProductId> {
        let mut unsynced = Vec::new();
        for item in &order.items {
            if let Err(e) = self.decrement_stock(item).await {
                error!(
                    order_id = %order.id,
                    product_id = %item.product_id,
                    error = %e,
                    "Error updating product quantity"
                );
                unsynced.push(item.product_id);
            }
        }
        unsynced
    }

    async fn decrement_stock(&self, item: &LineItem) -> Result<(), StoreError> {
        let product = self.products.get_by_id(item.product_id).await?;
        let remaining = i64::from(product.quantity) - i64::from(item.quantity);
        if remaining < 0 {
            warn!(
                product_id = %item.product_id,
                on_hand = product.quantity,
                ordered = item.quantity,
                "Product oversold, stock clamped to zero"
            );
        }
        self.products
            .update_quantity(item.product_id, remaining.max(0))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use stockroom_core::{OrderStatus, ProductDraft};

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::{InMemoryOrderStore, InMemoryProductStore};

    async fn stocked(store: &InMemoryProductStore, sku: &str, price: Decimal, qty: u32) -> Product {
        store
            .create(ProductDraft {
                name: sku.to_string(),
                description: String::new(),
                sku: sku.to_string(),
                category: "General".to_string(),
                price,
                quantity: qty,
                low_stock_threshold: 1,
                image_url: String::new(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_checkout_places_order_and_decrements_stock() {
        let products = InMemoryProductStore::new();
        let orders = InMemoryOrderStore::new();
        let a = stocked(&products, "A", Decimal::new(1000, 2), 5).await;

        let mut cart = Cart::load(Arc::new(MemoryStorage::new()));
        cart.add(&a, 2);

        let catalog = products.get_all().await.unwrap();
        let receipt = CheckoutService::new(&products, &orders)
            .place_order(&mut cart, &catalog)
            .await
            .unwrap();

        assert_eq!(receipt.totals.subtotal, Decimal::new(20, 0));
        assert_eq!(receipt.totals.tax, Decimal::new(2, 0));
        assert_eq!(receipt.order.total_amount, Decimal::new(22, 0));
        assert_eq!(receipt.order.status, OrderStatus::Pending);
        assert!(receipt.order.completed_at.is_none());
        assert!(receipt.stock_synced());
        assert!(cart.is_empty());
        assert_eq!(products.get_by_id(a.id).await.unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn test_checkout_of_empty_cart_is_rejected() {
        let products = InMemoryProductStore::new();
        let orders = InMemoryOrderStore::new();
        let mut cart = Cart::load(Arc::new(MemoryStorage::new()));

        let err = CheckoutService::new(&products, &orders)
            .place_order(&mut cart, &[])
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(orders.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_product_does_not_block_checkout() {
        let products = InMemoryProductStore::new();
        let orders = InMemoryOrderStore::new();
        let a = stocked(&products, "A", Decimal::ONE, 5).await;
        let b = stocked(&products, "B", Decimal::ONE, 5).await;

        let mut cart = Cart::load(Arc::new(MemoryStorage::new()));
        cart.add(&a, 1);
        cart.add(&b, 1);
        products.delete(a.id).await.unwrap();

        let catalog = products.get_all().await.unwrap();
        let receipt = CheckoutService::new(&products, &orders)
            .place_order(&mut cart, &catalog)
            .await
            .unwrap();

        assert_eq!(receipt.unsynced, vec![a.id]);
        assert_eq!(receipt.order.items.len(), 2);
        assert_eq!(receipt.totals.subtotal, Decimal::ONE);
        assert_eq!(products.get_by_id(b.id).await.unwrap().quantity, 4);
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_oversold_stock_clamps_to_zero() {
        let products = InMemoryProductStore::new();
        let orders = InMemoryOrderStore::new();
        let a = stocked(&products, "A", Decimal::ONE, 1).await;

        let mut cart = Cart::load(Arc::new(MemoryStorage::new()));
        cart.add(&a, 3);

        let catalog = products.get_all().await.unwrap();
        let receipt = CheckoutService::new(&products, &orders)
            .place_order(&mut cart, &catalog)
            .await
            .unwrap();

        assert!(receipt.stock_synced());
        assert_eq!(products.get_by_id(a.id).await.unwrap().quantity, 0);
    }
}
