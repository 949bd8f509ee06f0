//! Store and client-storage wiring for one CLI invocation.
//!
//! With the memory backend the catalog and orders live in JSON snapshots in
//! the data directory, seeded from the bundled catalog on first run. With the
//! postgres backend the stores go straight to the database.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use stockroom_core::{Order, Product, ProductDraft, ViewMode};
use stockroom_storefront::db::{self, PgOrderStore, PgProductStore};
use stockroom_storefront::storage::{self, ClientStorage, FileStorage};
use stockroom_storefront::store::{
    InMemoryOrderStore, InMemoryProductStore, OrderStore, ProductStore,
};
use stockroom_storefront::{Backend, Cart, ConfigError, StockroomConfig};

use crate::error::CommandError;

const PRODUCTS_SNAPSHOT: &str = "products.json";
const ORDERS_SNAPSHOT: &str = "orders.json";

/// Starter catalog for the memory backend.
const SEED_CATALOG: &str = include_str!("../seed/catalog.yaml");

/// Parse the bundled starter catalog.
///
/// # Errors
///
/// Returns `serde_yaml::Error` if the catalog is malformed.
pub fn seed_catalog() -> Result<Vec<ProductDraft>, serde_yaml::Error> {
    serde_yaml::from_str(SEED_CATALOG)
}

enum Stores {
    Memory {
        products: InMemoryProductStore,
        orders: InMemoryOrderStore,
    },
    Postgres {
        products: PgProductStore,
        orders: PgOrderStore,
    },
}

/// Everything a command needs: stores plus the client's storage slots.
pub struct Workspace {
    data_dir: PathBuf,
    storage: Arc<FileStorage>,
    stores: Stores,
}

impl Workspace {
    /// Open the configured backend and client storage.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if the data directory, a snapshot or the
    /// database cannot be opened.
    pub async fn open(config: &StockroomConfig) -> Result<Self, CommandError> {
        let storage = Arc::new(FileStorage::open(&config.data_dir)?);

        let stores = match config.backend {
            Backend::Memory => {
                let (products, orders) =
                    load_memory_stores(&config.data_dir, config.simulated_latency).await?;
                Stores::Memory { products, orders }
            }
            Backend::Postgres => {
                let url = config.database_url.as_ref().ok_or_else(|| {
                    ConfigError::MissingEnvVar("STOCKROOM_DATABASE_URL".to_string())
                })?;
                let pool = db::create_pool(url).await?;
                info!("Connected to database");
                Stores::Postgres {
                    products: PgProductStore::new(pool.clone()),
                    orders: PgOrderStore::new(pool),
                }
            }
        };

        Ok(Self {
            data_dir: config.data_dir.clone(),
            storage,
            stores,
        })
    }

    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        match &self.stores {
            Stores::Memory { products, .. } => products,
            Stores::Postgres { products, .. } => products,
        }
    }

    #[must_use]
    pub fn orders(&self) -> &dyn OrderStore {
        match &self.stores {
            Stores::Memory { orders, .. } => orders,
            Stores::Postgres { orders, .. } => orders,
        }
    }

    #[must_use]
    pub fn storage(&self) -> &dyn ClientStorage {
        self.storage.as_ref()
    }

    /// The client's saved cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        Cart::load(self.storage.clone())
    }

    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        storage::load_view_mode(self.storage())
    }

    /// Fail unless the client is in manager view.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::ManagerOnly` in customer view.
    pub fn require_manager(&self, command: &'static str) -> Result<(), CommandError> {
        if self.view_mode() == ViewMode::Manager {
            Ok(())
        } else {
            Err(CommandError::ManagerOnly(command))
        }
    }

    /// Persist the memory stores to their snapshots. No-op for postgres.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` if a snapshot cannot be written.
    pub async fn save(&self) -> Result<(), CommandError> {
        if let Stores::Memory { products, orders } = &self.stores {
            write_snapshot(&self.data_dir.join(PRODUCTS_SNAPSHOT), &products.snapshot().await)
                .await?;
            write_snapshot(&self.data_dir.join(ORDERS_SNAPSHOT), &orders.snapshot().await).await?;
            debug!(dir = %self.data_dir.display(), "Snapshots saved");
        }
        Ok(())
    }
}

async fn load_memory_stores(
    data_dir: &Path,
    latency: Duration,
) -> Result<(InMemoryProductStore, InMemoryOrderStore), CommandError> {
    let products = match read_snapshot::<Vec<Product>>(&data_dir.join(PRODUCTS_SNAPSHOT)).await? {
        Some(saved) => InMemoryProductStore::with_products(saved),
        None => {
            let store = InMemoryProductStore::new();
            let drafts = seed_catalog()?;
            let count = drafts.len();
            for draft in drafts {
                store.create(draft).await?;
            }
            info!(products = count, "Seeded catalog");
            store
        }
    };
    let orders = read_snapshot::<Vec<Order>>(&data_dir.join(ORDERS_SNAPSHOT))
        .await?
        .map_or_else(InMemoryOrderStore::new, InMemoryOrderStore::with_orders);

    Ok((products.with_latency(latency), orders.with_latency(latency)))
}

async fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CommandError> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_snapshot<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CommandError> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, serde_json::to_vec_pretty(value)?).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use stockroom_core::StockLevel;

    use super::*;

    fn temp_config() -> StockroomConfig {
        StockroomConfig {
            backend: Backend::Memory,
            database_url: None,
            data_dir: std::env::temp_dir().join(format!("stockroom-cli-{}", uuid::Uuid::new_v4())),
            simulated_latency: Duration::ZERO,
        }
    }

    #[test]
    fn test_seed_catalog_parses() {
        let drafts = seed_catalog().unwrap();
        assert!(!drafts.is_empty());

        let skus: HashSet<_> = drafts.iter().map(|d| d.sku.as_str()).collect();
        assert_eq!(skus.len(), drafts.len(), "seed SKUs must be unique");
    }

    #[test]
    fn test_seed_catalog_covers_every_stock_level() {
        let levels: HashSet<_> = seed_catalog()
            .unwrap()
            .iter()
            .map(|d| StockLevel::classify(d.quantity, d.low_stock_threshold))
            .collect();
        assert_eq!(levels.len(), 3);
    }

    #[tokio::test]
    async fn test_memory_workspace_round_trips_through_snapshots() {
        let config = temp_config();

        let workspace = Workspace::open(&config).await.unwrap();
        let seeded = workspace.products().get_all().await.unwrap();
        assert_eq!(seeded.len(), seed_catalog().unwrap().len());

        let first = seeded.first().unwrap();
        workspace
            .products()
            .update_quantity(first.id, 99)
            .await
            .unwrap();
        workspace.save().await.unwrap();

        let reopened = Workspace::open(&config).await.unwrap();
        assert_eq!(
            reopened.products().get_by_id(first.id).await.unwrap().quantity,
            99
        );

        std::fs::remove_dir_all(&config.data_dir).ok();
    }

    #[tokio::test]
    async fn test_customer_view_blocks_manager_commands() {
        let config = temp_config();
        let workspace = Workspace::open(&config).await.unwrap();

        assert!(matches!(
            workspace.require_manager("dashboard"),
            Err(CommandError::ManagerOnly("dashboard"))
        ));

        storage::save_view_mode(workspace.storage(), ViewMode::Manager).unwrap();
        assert!(workspace.require_manager("dashboard").is_ok());

        std::fs::remove_dir_all(&config.data_dir).ok();
    }
}
