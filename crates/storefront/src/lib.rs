//! Stockroom storefront library.
//!
//! Cart state, checkout, order lifecycle and the product/order stores behind
//! them. The CLI in `stockroom-cli` is a thin shell over this crate.
//!
//! # Modules
//!
//! - [`cart`] - Client-side cart persisted in [`storage`]
//! - [`checkout`] - Cart to order, then stock reconciliation
//! - [`lifecycle`] - Validated order status changes
//! - [`dashboard`] - Manager summary figures
//! - [`store`] - Store traits and the in-memory backend
//! - [`db`] - `PostgreSQL` backend

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod storage;
pub mod store;

pub use cart::Cart;
pub use checkout::{CheckoutReceipt, CheckoutService};
pub use config::{Backend, ConfigError, StockroomConfig};
pub use error::{CheckoutError, StoreError, StoreResult};
pub use lifecycle::OrderLifecycle;
