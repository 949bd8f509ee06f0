//! In-memory stores.
//!
//! Each store owns its records behind a lock and can delay every call by a
//! fixed latency to mimic a remote backend. IDs are assigned as one more than
//! the largest ID currently held.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use stockroom_core::{
    Order, OrderDraft, OrderId, OrderStatus, Product, ProductDraft, ProductId, StockLevel,
};

use super::{
    OrderStore, ProductStore, validate_order_draft, validate_product_draft, validate_quantity,
};
use crate::error::{StoreError, StoreResult};

/// Sleep for the configured latency, if any.
async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

/// One more than the largest of `ids`, or 1 when there are none.
fn next_id(ids: impl Iterator<Item = i32>, entity: &str) -> StoreResult<i32> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| StoreError::Conflict(format!("no {entity} IDs left")))
}

// =============================================================================
// Products
// =============================================================================

/// Product store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
    latency: Duration,
}

impl InMemoryProductStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding existing products (e.g. a saved snapshot).
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
            latency: Duration::ZERO,
        }
    }

    /// Delay every call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Copy of every product, for persisting the store.
    pub async fn snapshot(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }
}

fn ensure_unique_sku(
    products: &[Product],
    sku: &str,
    except: Option<ProductId>,
) -> StoreResult<()> {
    let taken = products.iter().any(|p| p.sku == sku && Some(p.id) != except);
    if taken {
        return Err(StoreError::Conflict(format!("SKU {sku} already exists")));
    }
    Ok(())
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn get_all(&self) -> StoreResult<Vec<Product>> {
        simulate_latency(self.latency).await;
        Ok(self.products.read().await.clone())
    }

    async fn get_by_id(&self, id: ProductId) -> StoreResult<Product> {
        simulate_latency(self.latency).await;
        self.products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::product_not_found(id))
    }

    async fn create(&self, draft: ProductDraft) -> StoreResult<Product> {
        simulate_latency(self.latency).await;
        validate_product_draft(&draft)?;

        let mut products = self.products.write().await;
        ensure_unique_sku(&products, &draft.sku, None)?;

        let id = next_id(products.iter().map(|p| p.id.as_i32()), "product")?;
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(id),
            name: draft.name,
            description: draft.description,
            sku: draft.sku,
            category: draft.category,
            price: draft.price,
            quantity: draft.quantity,
            low_stock_threshold: draft.low_stock_threshold,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        };
        products.push(product.clone());
        debug!(product_id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    async fn update(&self, id: ProductId, draft: ProductDraft) -> StoreResult<Product> {
        simulate_latency(self.latency).await;
        validate_product_draft(&draft)?;

        let mut products = self.products.write().await;
        ensure_unique_sku(&products, &draft.sku, Some(id))?;

        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::product_not_found(id))?;
        product.name = draft.name;
        product.description = draft.description;
        product.sku = draft.sku;
        product.category = draft.category;
        product.price = draft.price;
        product.quantity = draft.quantity;
        product.low_stock_threshold = draft.low_stock_threshold;
        product.image_url = draft.image_url;
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> StoreResult<()> {
        simulate_latency(self.latency).await;
        let mut products = self.products.write().await;
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::product_not_found(id))?;
        products.remove(index);
        Ok(())
    }

    async fn update_quantity(&self, id: ProductId, quantity: i64) -> StoreResult<Product> {
        simulate_latency(self.latency).await;
        let quantity = validate_quantity(quantity)?;

        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::product_not_found(id))?;
        product.quantity = quantity;
        product.updated_at = Utc::now();
        Ok(product.clone())
    }

    async fn low_stock(&self) -> StoreResult<Vec<Product>> {
        simulate_latency(self.latency).await;
        Ok(self
            .products
            .read()
            .await
            .iter()
            .filter(|p| p.stock_level() == StockLevel::LowStock)
            .cloned()
            .collect())
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        simulate_latency(self.latency).await;
        let mut categories: Vec<String> = self
            .products
            .read()
            .await
            .iter()
            .map(|p| p.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Order store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
    latency: Duration,
}

impl InMemoryOrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding existing orders (e.g. a saved snapshot).
    #[must_use]
    pub fn with_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: RwLock::new(orders),
            latency: Duration::ZERO,
        }
    }

    /// Delay every call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Copy of every order, for persisting the store.
    pub async fn snapshot(&self) -> Vec<Order> {
        self.orders.read().await.clone()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get_all(&self) -> StoreResult<Vec<Order>> {
        simulate_latency(self.latency).await;
        Ok(self.orders.read().await.clone())
    }

    async fn get_by_id(&self, id: OrderId) -> StoreResult<Order> {
        simulate_latency(self.latency).await;
        self.orders
            .read()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| StoreError::order_not_found(id))
    }

    async fn create(&self, draft: OrderDraft) -> StoreResult<Order> {
        simulate_latency(self.latency).await;
        validate_order_draft(&draft)?;

        let mut orders = self.orders.write().await;
        let id = next_id(orders.iter().map(|o| o.id.as_i32()), "order")?;
        let order = Order {
            id: OrderId::new(id),
            items: draft.items,
            total_amount: draft.total_amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        };
        orders.push(order.clone());
        debug!(order_id = %order.id, "Order created");
        Ok(order)
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> StoreResult<Order> {
        simulate_latency(self.latency).await;
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::order_not_found(id))?;
        order.status = status;
        if status == OrderStatus::Completed {
            order.completed_at = Some(Utc::now());
        }
        Ok(order.clone())
    }

    async fn delete(&self, id: OrderId) -> StoreResult<()> {
        simulate_latency(self.latency).await;
        let mut orders = self.orders.write().await;
        let index = orders
            .iter()
            .position(|o| o.id == id)
            .ok_or_else(|| StoreError::order_not_found(id))?;
        orders.remove(index);
        Ok(())
    }

    async fn by_status(&self, status: OrderStatus) -> StoreResult<Vec<Order>> {
        simulate_latency(self.latency).await;
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| o.status == status)
            .cloned()
            .collect())
    }

    async fn recent(&self, limit: usize) -> StoreResult<Vec<Order>> {
        simulate_latency(self.latency).await;
        let mut orders = self.orders.read().await.clone();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        orders.truncate(limit);
        Ok(orders)
    }
}
