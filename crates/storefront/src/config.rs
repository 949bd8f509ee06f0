//! Stockroom configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOCKROOM_BACKEND` - `memory` (default) or `postgres`
//! - `STOCKROOM_DATABASE_URL` - `PostgreSQL` connection string (required for
//!   the `postgres` backend, falls back to `DATABASE_URL`)
//! - `STOCKROOM_DATA_DIR` - Client storage and snapshot directory (default: `.stockroom`)
//! - `STOCKROOM_LATENCY_MS` - Artificial delay of in-memory store calls (default: 0)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which persistence backend the stores use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Process-local stores seeded from the bundled catalog.
    #[default]
    Memory,
    /// Hosted `PostgreSQL` database.
    Postgres,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(format!("expected `memory` or `postgres`, got `{s}`")),
        }
    }
}

/// Stockroom application configuration.
#[derive(Debug, Clone)]
pub struct StockroomConfig {
    /// Persistence backend
    pub backend: Backend,
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// Directory holding client storage slots and memory snapshots
    pub data_dir: PathBuf,
    /// Delay applied to each in-memory store call
    pub simulated_latency: Duration,
}

impl StockroomConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid, or if the `postgres`
    /// backend is selected without a database URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`StockroomConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = lookup("STOCKROOM_BACKEND")
            .map(|value| value.parse::<Backend>())
            .transpose()
            .map_err(|e| ConfigError::InvalidEnvVar("STOCKROOM_BACKEND".to_string(), e))?
            .unwrap_or_default();

        let database_url = lookup("STOCKROOM_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .map(SecretString::from);
        if backend == Backend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "STOCKROOM_DATABASE_URL".to_string(),
            ));
        }

        let data_dir = lookup("STOCKROOM_DATA_DIR")
            .map_or_else(|| PathBuf::from(".stockroom"), PathBuf::from);

        let latency_ms = lookup("STOCKROOM_LATENCY_MS")
            .unwrap_or_else(|| "0".to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOCKROOM_LATENCY_MS".to_string(), e.to_string())
            })?;

        Ok(Self {
            backend,
            database_url,
            data_dir,
            simulated_latency: Duration::from_millis(latency_ms),
        })
    }
}
