//! Stockroom Core - Shared domain types.
//!
//! This crate provides the records every Stockroom component agrees on:
//! - `storefront` - Stores, cart state, checkout and order lifecycle
//! - `cli` - Command-line front end for shoppers and managers
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no database
//! access, no storage. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, products, orders, statuses and pricing helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
