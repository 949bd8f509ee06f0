//! Database migrations.
//!
//! # Usage
//!
//! ```bash
//! STOCKROOM_BACKEND=postgres STOCKROOM_DATABASE_URL=postgres://... stockroom migrate
//! ```
//!
//! Migration files live in `crates/storefront/migrations/`.

use tracing::info;

use stockroom_storefront::{Backend, ConfigError, StockroomConfig, db};

use crate::error::CommandError;

/// Apply pending migrations to the configured database.
///
/// # Errors
///
/// Returns `CommandError::NotPostgres` for the memory backend, or the
/// connection/migration error.
pub async fn run(config: &StockroomConfig) -> Result<(), CommandError> {
    if config.backend != Backend::Postgres {
        return Err(CommandError::NotPostgres);
    }
    let url = config
        .database_url
        .as_ref()
        .ok_or_else(|| ConfigError::MissingEnvVar("STOCKROOM_DATABASE_URL".to_string()))?;

    info!("Connecting to database...");
    let pool = db::create_pool(url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    info!("Migrations complete");
    Ok(())
}
