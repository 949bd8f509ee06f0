//! Manager dashboard figures.

use rust_decimal::Decimal;
use serde::Serialize;

use stockroom_core::{Order, OrderStatus, Product, StockLevel};

use crate::error::StoreResult;
use crate::store::{OrderStore, ProductStore};

/// How many recent orders the dashboard shows.
pub const RECENT_ORDER_LIMIT: usize = 5;

/// Inventory and order headline numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct DashboardStats {
    pub total_products: usize,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    /// Σ price × quantity over the catalog.
    pub inventory_value: Decimal,
    /// Pending orders among the recent orders.
    pub pending_orders: usize,
    /// Processing orders among the recent orders.
    pub processing_orders: usize,
}

impl DashboardStats {
    #[must_use]
    pub fn compute(products: &[Product], recent_orders: &[Order]) -> Self {
        let count_level = |level: StockLevel| {
            products
                .iter()
                .filter(|p| p.stock_level() == level)
                .count()
        };
        let count_status =
            |status: OrderStatus| recent_orders.iter().filter(|o| o.status == status).count();

        Self {
            total_products: products.len(),
            low_stock_count: count_level(StockLevel::LowStock),
            out_of_stock_count: count_level(StockLevel::OutOfStock),
            inventory_value: products.iter().map(Product::inventory_value).sum(),
            pending_orders: count_status(OrderStatus::Pending),
            processing_orders: count_status(OrderStatus::Processing),
        }
    }

    /// Whether the inventory alert banner should show.
    #[must_use]
    pub const fn needs_attention(&self) -> bool {
        self.low_stock_count > 0 || self.out_of_stock_count > 0
    }
}

/// Everything the dashboard view renders.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub low_stock: Vec<Product>,
    pub recent_orders: Vec<Order>,
}

impl Dashboard {
    /// Load the catalog and recent orders and compute the dashboard.
    ///
    /// # Errors
    ///
    /// Returns the first store error encountered.
    pub async fn load(products: &dyn ProductStore, orders: &dyn OrderStore) -> StoreResult<Self> {
        let (catalog, recent_orders) =
            tokio::try_join!(products.get_all(), orders.recent(RECENT_ORDER_LIMIT))?;

        let stats = DashboardStats::compute(&catalog, &recent_orders);
        let low_stock = catalog
            .into_iter()
            .filter(|p| p.stock_level() == StockLevel::LowStock)
            .collect();

        Ok(Self {
            stats,
            low_stock,
            recent_orders,
        })
    }
}

/// Order counts per status, as shown on the order list filter tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct StatusCounts {
    pub all: usize,
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn tally(orders: &[Order]) -> Self {
        orders.iter().fold(
            Self {
                all: orders.len(),
                ..Self::default()
            },
            |mut counts, order| {
                match order.status {
                    OrderStatus::Pending => counts.pending += 1,
                    OrderStatus::Processing => counts.processing += 1,
                    OrderStatus::Completed => counts.completed += 1,
                    OrderStatus::Cancelled => counts.cancelled += 1,
                }
                counts
            },
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use stockroom_core::{LineItem, OrderDraft, OrderId, ProductDraft, ProductId};

    use super::*;
    use crate::store::{InMemoryOrderStore, InMemoryProductStore};

    fn product(id: i32, price: i64, quantity: u32, threshold: u32) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            name: format!("P{id}"),
            description: String::new(),
            sku: format!("P{id}"),
            category: "General".to_string(),
            price: Decimal::new(price, 0),
            quantity,
            low_stock_threshold: threshold,
            image_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn order(id: i32, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            items: Vec::new(),
            total_amount: Decimal::ZERO,
            status,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    #[test]
    fn test_stats_compute() {
        let products = vec![
            product(1, 10, 0, 5),
            product(2, 2, 3, 5),
            product(3, 1, 20, 5),
        ];
        let orders = vec![
            order(1, OrderStatus::Pending),
            order(2, OrderStatus::Pending),
            order(3, OrderStatus::Processing),
            order(4, OrderStatus::Completed),
        ];

        let stats = DashboardStats::compute(&products, &orders);
        assert_eq!(stats.total_products, 3);
        assert_eq!(stats.low_stock_count, 1);
        assert_eq!(stats.out_of_stock_count, 1);
        assert_eq!(stats.inventory_value, Decimal::new(26, 0));
        assert_eq!(stats.pending_orders, 2);
        assert_eq!(stats.processing_orders, 1);
        assert!(stats.needs_attention());
    }

    #[test]
    fn test_empty_stats() {
        let stats = DashboardStats::compute(&[], &[]);
        assert_eq!(stats, DashboardStats::default());
        assert!(!stats.needs_attention());
    }

    #[test]
    fn test_status_counts() {
        let orders = vec![
            order(1, OrderStatus::Pending),
            order(2, OrderStatus::Cancelled),
            order(3, OrderStatus::Cancelled),
        ];
        let counts = StatusCounts::tally(&orders);
        assert_eq!(counts.all, 3);
        assert_eq!(counts.pending, 1);
        assert_eq!(counts.cancelled, 2);
        assert_eq!(counts.completed, 0);
    }

    #[tokio::test]
    async fn test_dashboard_load() {
        let products = InMemoryProductStore::new();
        let orders = InMemoryOrderStore::new();
        products
            .create(ProductDraft {
                name: "Candle".to_string(),
                description: String::new(),
                sku: "CANDLE".to_string(),
                category: "Home".to_string(),
                price: Decimal::new(8, 0),
                quantity: 2,
                low_stock_threshold: 3,
                image_url: String::new(),
            })
            .await
            .unwrap();
        for _ in 0..7 {
            orders
                .create(OrderDraft {
                    items: vec![LineItem {
                        product_id: ProductId::new(1),
                        quantity: 1,
                        price_at_add: Decimal::ONE,
                    }],
                    total_amount: Decimal::new(11, 1),
                })
                .await
                .unwrap();
        }

        let dashboard = Dashboard::load(&products, &orders).await.unwrap();
        assert_eq!(dashboard.low_stock.len(), 1);
        assert_eq!(dashboard.recent_orders.len(), RECENT_ORDER_LIMIT);
        assert_eq!(dashboard.stats.pending_orders, RECENT_ORDER_LIMIT);
        assert_eq!(dashboard.stats.inventory_value, Decimal::new(16, 0));
    }
}
