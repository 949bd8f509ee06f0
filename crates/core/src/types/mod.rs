//! Core types for Stockroom.
//!
//! This module provides type-safe wrappers for the storefront's domain.

pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use id::*;
pub use order::{LineItem, Order, OrderDraft};
pub use price::{OrderTotals, SALES_TAX_RATE, format_usd};
pub use product::{Product, ProductDraft, ProductFilter, StockLevel};
pub use status::*;
