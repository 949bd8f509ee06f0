//! Integration tests for Stockroom.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stockroom-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout_flow` - Cart to order, stock reconciliation, failure paths
//! - `order_lifecycle` - Status transitions and order queries
//! - `cart_persistence` - Cart and view mode across client restarts
//!
//! Everything runs against the in-memory stores. The fakes in this module
//! wrap them to inject backend failures.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;

use stockroom_core::{Order, OrderDraft, OrderId, OrderStatus, Product, ProductDraft, ProductId};
use stockroom_storefront::store::{InMemoryProductStore, OrderStore, ProductStore};
use stockroom_storefront::{StoreError, StoreResult};

// =============================================================================
// Fixtures
// =============================================================================

/// A valid product draft.
#[must_use]
pub fn draft(sku: &str, price: Decimal, quantity: u32) -> ProductDraft {
    ProductDraft {
        name: format!("Product {sku}"),
        description: String::new(),
        sku: sku.to_owned(),
        category: "General".to_owned(),
        price,
        quantity,
        low_stock_threshold: 2,
        image_url: String::new(),
    }
}

/// A scratch directory removed on drop.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    #[must_use]
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("stockroom-it-{}", uuid::Uuid::new_v4()));
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TempDir {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

// =============================================================================
// Fault-injecting stores
// =============================================================================

fn unavailable() -> StoreError {
    StoreError::Unavailable("injected failure".to_owned())
}

/// Order store whose every call fails. Counts create attempts.
#[derive(Debug, Default)]
pub struct FailingOrderStore {
    create_attempts: AtomicUsize,
}

impl FailingOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn create_attempts(&self) -> usize {
        self.create_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderStore for FailingOrderStore {
    async fn get_all(&self) -> StoreResult<Vec<Order>> {
        Err(unavailable())
    }

    async fn get_by_id(&self, _id: OrderId) -> StoreResult<Order> {
        Err(unavailable())
    }

    async fn create(&self, _draft: OrderDraft) -> StoreResult<Order> {
        self.create_attempts.fetch_add(1, Ordering::SeqCst);
        Err(unavailable())
    }

    async fn update_status(&self, _id: OrderId, _status: OrderStatus) -> StoreResult<Order> {
        Err(unavailable())
    }

    async fn delete(&self, _id: OrderId) -> StoreResult<()> {
        Err(unavailable())
    }

    async fn by_status(&self, _status: OrderStatus) -> StoreResult<Vec<Order>> {
        Err(unavailable())
    }

    async fn recent(&self, _limit: usize) -> StoreResult<Vec<Order>> {
        Err(unavailable())
    }
}

/// Product store that fails `update_quantity` for chosen products and
/// delegates everything else to an in-memory store.
#[derive(Debug)]
pub struct StockWriteFailures {
    inner: InMemoryProductStore,
    failing: Vec<ProductId>,
}

impl StockWriteFailures {
    #[must_use]
    pub const fn new(inner: InMemoryProductStore, failing: Vec<ProductId>) -> Self {
        Self { inner, failing }
    }

    #[must_use]
    pub const fn inner(&self) -> &InMemoryProductStore {
        &self.inner
    }
}

#[async_trait]
impl ProductStore for StockWriteFailures {
    async fn get_all(&self) -> StoreResult<Vec<Product>> {
        self.inner.get_all().await
    }

    async fn get_by_id(&self, id: ProductId) -> StoreResult<Product> {
        self.inner.get_by_id(id).await
    }

    async fn create(&self, draft: ProductDraft) -> StoreResult<Product> {
        self.inner.create(draft).await
    }

    async fn update(&self, id: ProductId, draft: ProductDraft) -> StoreResult<Product> {
        self.inner.update(id, draft).await
    }

    async fn delete(&self, id: ProductId) -> StoreResult<()> {
        self.inner.delete(id).await
    }

    async fn update_quantity(&self, id: ProductId, quantity: i64) -> StoreResult<Product> {
        if self.failing.contains(&id) {
            return Err(unavailable());
        }
        self.inner.update_quantity(id, quantity).await
    }

    async fn low_stock(&self) -> StoreResult<Vec<Product>> {
        self.inner.low_stock().await
    }

    async fn categories(&self) -> StoreResult<Vec<String>> {
        self.inner.categories().await
    }
}
