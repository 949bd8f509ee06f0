//! Integration tests for checkout: cart to order, then stock reconciliation.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;

use stockroom_core::{OrderStatus, ProductDraft, SALES_TAX_RATE};
use stockroom_integration_tests::{FailingOrderStore, StockWriteFailures, TempDir, draft};
use stockroom_storefront::storage::{ClientStorage, FileStorage, MemoryStorage};
use stockroom_storefront::store::{
    InMemoryOrderStore, InMemoryProductStore, OrderStore, ProductStore,
};
use stockroom_storefront::{Cart, CheckoutError, CheckoutService, StoreError};

fn dollars(amount: i64) -> Decimal {
    Decimal::new(amount, 0)
}

// =============================================================================
// Happy Path
// =============================================================================

#[tokio::test]
async fn test_two_at_ten_dollars_checks_out_at_twenty_two() {
    let products = InMemoryProductStore::new();
    let orders = InMemoryOrderStore::new();
    let product = products
        .create(draft("TEN", Decimal::new(1000, 2), 5))
        .await
        .unwrap();

    let mut cart = Cart::load(Arc::new(MemoryStorage::new()));
    cart.add(&product, 2);

    let catalog = products.get_all().await.unwrap();
    let receipt = CheckoutService::new(&products, &orders)
        .place_order(&mut cart, &catalog)
        .await
        .unwrap();

    let order = &receipt.order;
    assert_eq!(order.total_amount, dollars(22));
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.completed_at.is_none());
    assert_eq!(order.items.len(), 1);
    let item = order.items.first().unwrap();
    assert_eq!(item.product_id, product.id);
    assert_eq!(item.quantity, 2);
    assert_eq!(item.price_at_add, dollars(10));

    assert!(cart.is_empty());
    assert_eq!(products.get_by_id(product.id).await.unwrap().quantity, 3);
    assert_eq!(orders.get_all().await.unwrap(), vec![order.clone()]);
}

#[tokio::test]
async fn test_order_total_is_subtotal_plus_ten_percent() {
    let products = InMemoryProductStore::new();
    let orders = InMemoryOrderStore::new();
    let a = products.create(draft("A", Decimal::new(1999, 2), 10)).await.unwrap();
    let b = products.create(draft("B", Decimal::new(550, 2), 10)).await.unwrap();

    let mut cart = Cart::load(Arc::new(MemoryStorage::new()));
    cart.add(&a, 3);
    cart.add(&b, 1);
    let catalog = products.get_all().await.unwrap();
    let subtotal = cart.total(&catalog);

    let receipt = CheckoutService::new(&products, &orders)
        .place_order(&mut cart, &catalog)
        .await
        .unwrap();

    assert_eq!(subtotal, Decimal::new(6547, 2));
    assert_eq!(receipt.totals.subtotal, subtotal);
    assert_eq!(receipt.totals.tax, subtotal * SALES_TAX_RATE);
    assert_eq!(receipt.order.total_amount, subtotal + subtotal * SALES_TAX_RATE);
}

#[tokio::test]
async fn test_totals_follow_catalog_price_but_lines_keep_price_at_add() {
    let products = InMemoryProductStore::new();
    let orders = InMemoryOrderStore::new();
    let product = products.create(draft("MOVER", dollars(10), 5)).await.unwrap();

    let mut cart = Cart::load(Arc::new(MemoryStorage::new()));
    cart.add(&product, 1);

    let repriced = ProductDraft {
        price: dollars(12),
        ..ProductDraft::from(product.clone())
    };
    products.update(product.id, repriced).await.unwrap();

    let catalog = products.get_all().await.unwrap();
    let receipt = CheckoutService::new(&products, &orders)
        .place_order(&mut cart, &catalog)
        .await
        .unwrap();

    assert_eq!(receipt.totals.subtotal, dollars(12));
    assert_eq!(receipt.order.items.first().unwrap().price_at_add, dollars(10));
}

// =============================================================================
// Failure Paths
// =============================================================================

#[tokio::test]
async fn test_failed_order_create_keeps_cart_and_stock() {
    let dir = TempDir::new();
    let storage: Arc<dyn ClientStorage> = Arc::new(FileStorage::open(dir.path()).unwrap());
    let products = InMemoryProductStore::new();
    let orders = FailingOrderStore::new();
    let product = products.create(draft("KEEP", dollars(4), 6)).await.unwrap();

    let mut cart = Cart::load(storage.clone());
    cart.add(&product, 2);
    let before = cart.entries().to_vec();

    let catalog = products.get_all().await.unwrap();
    let err = CheckoutService::new(&products, &orders)
        .place_order(&mut cart, &catalog)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::OrderCreate(StoreError::Unavailable(_))
    ));
    assert_eq!(orders.create_attempts(), 1);
    assert_eq!(cart.entries(), before.as_slice());
    assert_eq!(Cart::load(storage).entries(), before.as_slice());
    assert_eq!(products.get_by_id(product.id).await.unwrap().quantity, 6);
}

#[tokio::test]
async fn test_empty_cart_never_reaches_the_order_store() {
    let products = InMemoryProductStore::new();
    let orders = FailingOrderStore::new();
    let mut cart = Cart::load(Arc::new(MemoryStorage::new()));

    let err = CheckoutService::new(&products, &orders)
        .place_order(&mut cart, &[])
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert_eq!(orders.create_attempts(), 0);
}

#[tokio::test]
async fn test_stock_write_failure_still_completes_checkout() {
    let inner = InMemoryProductStore::new();
    let flaky = inner.create(draft("FLAKY", dollars(3), 9)).await.unwrap();
    let steady = inner.create(draft("STEADY", dollars(2), 9)).await.unwrap();
    let products = StockWriteFailures::new(inner, vec![flaky.id]);
    let orders = InMemoryOrderStore::new();

    let mut cart = Cart::load(Arc::new(MemoryStorage::new()));
    cart.add(&flaky, 1);
    cart.add(&steady, 4);

    let catalog = products.get_all().await.unwrap();
    let receipt = CheckoutService::new(&products, &orders)
        .place_order(&mut cart, &catalog)
        .await
        .unwrap();

    assert!(!receipt.stock_synced());
    assert_eq!(receipt.unsynced, vec![flaky.id]);
    assert!(cart.is_empty());
    assert_eq!(orders.get_all().await.unwrap().len(), 1);

    let store = products.inner();
    assert_eq!(store.get_by_id(flaky.id).await.unwrap().quantity, 9);
    assert_eq!(store.get_by_id(steady.id).await.unwrap().quantity, 5);
}

#[tokio::test]
async fn test_checkout_persists_the_emptied_cart() {
    let dir = TempDir::new();
    let storage: Arc<dyn ClientStorage> = Arc::new(FileStorage::open(dir.path()).unwrap());
    let products = InMemoryProductStore::new();
    let orders = InMemoryOrderStore::new();
    let product = products.create(draft("GONE", dollars(1), 3)).await.unwrap();

    let mut cart = Cart::load(storage.clone());
    cart.add(&product, 1);
    let catalog = products.get_all().await.unwrap();
    CheckoutService::new(&products, &orders)
        .place_order(&mut cart, &catalog)
        .await
        .unwrap();

    assert!(Cart::load(storage).is_empty());
}
