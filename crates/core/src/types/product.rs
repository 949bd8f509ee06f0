//! Product records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Longer description shown on the product card.
    pub description: String,
    /// Stock keeping unit, unique within a store.
    pub sku: String,
    /// Catalog category.
    pub category: String,
    /// Current unit price.
    pub price: Decimal,
    /// Units on hand.
    pub quantity: u32,
    /// At or below this many units the product counts as low stock.
    pub low_stock_threshold: u32,
    /// Product image URL.
    pub image_url: String,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Classify the product's stock level.
    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.quantity, self.low_stock_threshold)
    }

    /// Value of the units on hand at the current price.
    #[must_use]
    pub fn inventory_value(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Case-insensitive match of `term` against name, description and SKU.
    #[must_use]
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.name, &self.description, &self.sku]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Catalog browse filter: free-text search plus an exact category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ProductFilter {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .filter(|term| !term.is_empty())
            .is_none_or(|term| product.matches_search(term));
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| product.category == category);
        search_ok && category_ok
    }

    /// Keep the products matching this filter, in order.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Stock classification used for badges and dashboard alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// No units on hand.
    OutOfStock,
    /// Some units, at or below the threshold.
    LowStock,
    /// Above the threshold.
    InStock,
}

impl StockLevel {
    /// Classify a quantity against a low-stock threshold.
    #[must_use]
    pub const fn classify(quantity: u32, threshold: u32) -> Self {
        if quantity == 0 {
            Self::OutOfStock
        } else if quantity <= threshold {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}

impl std::fmt::Display for StockLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfStock => write!(f, "Out of Stock"),
            Self::LowStock => write!(f, "Low Stock"),
            Self::InStock => write!(f, "In Stock"),
        }
    }
}

/// Input for creating or replacing a product.
///
/// The store assigns the ID and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sku: String,
    pub category: String,
    pub price: Decimal,
    pub quantity: u32,
    pub low_stock_threshold: u32,
    #[serde(default)]
    pub image_url: String,
}

impl From<Product> for ProductDraft {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            description: product.description,
            sku: product.sku,
            category: product.category,
            price: product.price,
            quantity: product.quantity,
            low_stock_threshold: product.low_stock_threshold,
            image_url: product.image_url,
        }
    }
}
