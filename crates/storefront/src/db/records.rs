//! Hosted-database record shapes and their mapping to domain types.
//!
//! The hosted schema names every column with a `_c` suffix and camelCase
//! (`lowStockThreshold_c`). Those names stay in this module: records are
//! converted to and from [`Product`] / [`Order`] at the storage boundary and
//! nothing else in the crate sees them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use stockroom_core::{LineItem, Order, OrderId, OrderStatus, Product, ProductId};

use crate::error::StoreError;

/// Column list for `product_c`, in [`ProductRecord`] order.
pub const PRODUCT_COLUMNS: &str = r#""Id_c", "name_c", "description_c", "sku_c", "category_c", "price_c", "quantity_c", "lowStockThreshold_c", "imageUrl_c", "createdAt_c", "updatedAt_c""#;

/// Column list for `order_c`, in [`OrderRecord`] order.
pub const ORDER_COLUMNS: &str =
    r#""Id_c", "items_c", "totalAmount_c", "status_c", "createdAt_c", "completedAt_c""#;

/// A `product_c` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductRecord {
    #[serde(rename = "Id_c")]
    #[sqlx(rename = "Id_c")]
    pub id: i32,
    #[serde(rename = "name_c")]
    #[sqlx(rename = "name_c")]
    pub name: String,
    #[serde(rename = "description_c")]
    #[sqlx(rename = "description_c")]
    pub description: String,
    #[serde(rename = "sku_c")]
    #[sqlx(rename = "sku_c")]
    pub sku: String,
    #[serde(rename = "category_c")]
    #[sqlx(rename = "category_c")]
    pub category: String,
    #[serde(rename = "price_c")]
    #[sqlx(rename = "price_c")]
    pub price: Decimal,
    #[serde(rename = "quantity_c")]
    #[sqlx(rename = "quantity_c")]
    pub quantity: i32,
    #[serde(rename = "lowStockThreshold_c")]
    #[sqlx(rename = "lowStockThreshold_c")]
    pub low_stock_threshold: i32,
    #[serde(rename = "imageUrl_c")]
    #[sqlx(rename = "imageUrl_c")]
    pub image_url: String,
    #[serde(rename = "createdAt_c")]
    #[sqlx(rename = "createdAt_c")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt_c")]
    #[sqlx(rename = "updatedAt_c")]
    pub updated_at: DateTime<Utc>,
}

/// Convert a stored count into a domain count.
fn stored_count(value: i32, column: &str, id: i32) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| {
        StoreError::DataCorruption(format!("negative {column} ({value}) on record {id}"))
    })
}

/// Convert a domain count into a storable column value.
pub(crate) fn storable_count(value: u32, what: &str) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| StoreError::Validation(format!("{what} {value} is too large")))
}

impl TryFrom<ProductRecord> for Product {
    type Error = StoreError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::new(record.id),
            quantity: stored_count(record.quantity, "quantity_c", record.id)?,
            low_stock_threshold: stored_count(
                record.low_stock_threshold,
                "lowStockThreshold_c",
                record.id,
            )?,
            name: record.name,
            description: record.description,
            sku: record.sku,
            category: record.category,
            price: record.price,
            image_url: record.image_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl TryFrom<&Product> for ProductRecord {
    type Error = StoreError;

    fn try_from(product: &Product) -> Result<Self, Self::Error> {
        Ok(Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: product.description.clone(),
            sku: product.sku.clone(),
            category: product.category.clone(),
            price: product.price,
            quantity: storable_count(product.quantity, "quantity")?,
            low_stock_threshold: storable_count(product.low_stock_threshold, "threshold")?,
            image_url: product.image_url.clone(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        })
    }
}

/// An `order_c` row. Line items are stored as a JSON array.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRecord {
    #[sqlx(rename = "Id_c")]
    pub id: i32,
    #[sqlx(rename = "items_c")]
    pub items: Json<Vec<LineItem>>,
    #[sqlx(rename = "totalAmount_c")]
    pub total_amount: Decimal,
    #[sqlx(rename = "status_c")]
    pub status: String,
    #[sqlx(rename = "createdAt_c")]
    pub created_at: DateTime<Utc>,
    #[sqlx(rename = "completedAt_c")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<OrderRecord> for Order {
    type Error = StoreError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let status = record.status.parse::<OrderStatus>().map_err(|e| {
            StoreError::DataCorruption(format!("{e} on order {}", record.id))
        })?;
        Ok(Self {
            id: OrderId::new(record.id),
            items: record.items.0,
            total_amount: record.total_amount,
            status,
            created_at: record.created_at,
            completed_at: record.completed_at,
        })
    }
}

impl From<&Order> for OrderRecord {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i32(),
            items: Json(order.items.clone()),
            total_amount: order.total_amount,
            status: order.status.as_str().to_owned(),
            created_at: order.created_at,
            completed_at: order.completed_at,
        }
    }
}
