//! `PostgreSQL` backend for the product and order stores.
//!
//! # Tables
//!
//! - `product_c` - Catalog, one row per product
//! - `order_c` - Placed orders, line items as JSONB
//!
//! Column names follow the hosted schema (`_c` suffix, camelCase); see
//! [`records`] for the mapping.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p stockroom-cli -- migrate
//! ```

pub mod orders;
pub mod products;
pub mod records;

pub use orders::PgOrderStore;
pub use products::PgProductStore;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
