//! CLI error type.

use thiserror::Error;

use stockroom_storefront::storage::StorageError;
use stockroom_storefront::{CheckoutError, ConfigError, StoreError};

/// Errors that end a `stockroom` command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{}", .0.user_message())]
    Store(#[from] StoreError),

    #[error("Checkout failed: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Client storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid seed catalog: {0}")]
    Seed(#[from] serde_yaml::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A manager command was run in customer view.
    #[error("`{0}` requires manager view (run `stockroom view-mode manager`)")]
    ManagerOnly(&'static str),

    #[error("{0} is out of stock")]
    OutOfStock(String),

    #[error("only {available} of {name} in stock")]
    ExceedsStock { name: String, available: u32 },

    #[error("`migrate` needs the postgres backend (set STOCKROOM_BACKEND=postgres)")]
    NotPostgres,
}
