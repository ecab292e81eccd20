//! Configuration loading and representation.
//!
//! Everything comes from environment variables with logged defaults:
//!
//! | variable | default |
//! |---|---|
//! | `WAREHOUSE_STORE` | `file` (`memory`, `file`, `sqlite`) |
//! | `WAREHOUSE_DATA_DIR` | `./data` |
//! | `WAREHOUSE_DATABASE_URL` | `sqlite://warehouse.db` |
//! | `WAREHOUSE_LOW_STOCK_MAX` | `15` |
//! | `WAREHOUSE_MEDIUM_STOCK_MAX` | `30` |

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use warehouse_inventory::StockLevelThresholds;

use crate::store::{
    InMemoryRecordStore, JsonFileRecordStore, RecordStore, SqliteRecordStore, StoreError,
};

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://warehouse.db";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown store backend: {0:?} (expected memory, file or sqlite)")]
    InvalidBackend(String),
}

/// Which [`RecordStore`] adapter to open.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum StoreBackend {
    Memory,
    #[default]
    File,
    Sqlite,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" | "json" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::InvalidBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
    pub database_url: String,
    pub thresholds: StockLevelThresholds,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            thresholds: StockLevelThresholds::default(),
        }
    }
}

impl WarehouseConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Invalid values are logged and
    /// replaced by defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("WAREHOUSE_STORE") {
            match raw.parse() {
                Ok(backend) => config.backend = backend,
                Err(err) => tracing::warn!(error = %err, "ignoring WAREHOUSE_STORE; using file store"),
            }
        }

        if let Some(dir) = lookup("WAREHOUSE_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(url) = lookup("WAREHOUSE_DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            config.database_url = url;
        }

        let low = threshold(&lookup, "WAREHOUSE_LOW_STOCK_MAX", StockLevelThresholds::DEFAULT_LOW_MAX);
        let medium = threshold(
            &lookup,
            "WAREHOUSE_MEDIUM_STOCK_MAX",
            StockLevelThresholds::DEFAULT_MEDIUM_MAX,
        );
        match StockLevelThresholds::new(low, medium) {
            Ok(t) => config.thresholds = t,
            Err(err) => tracing::warn!(error = %err, "invalid stock thresholds; using defaults"),
        }

        config
    }

    /// Open the configured store adapter.
    pub async fn open_store(&self) -> Result<Arc<dyn RecordStore>, StoreError> {
        let store: Arc<dyn RecordStore> = match self.backend {
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store; records are not persisted");
                Arc::new(InMemoryRecordStore::new())
            }
            StoreBackend::File => Arc::new(JsonFileRecordStore::new(&self.data_dir)),
            StoreBackend::Sqlite => Arc::new(SqliteRecordStore::connect(&self.database_url).await?),
        };
        tracing::info!(backend = ?self.backend, "record store opened");
        Ok(store)
    }
}

fn threshold(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> u64 {
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %raw, default, "not a box count; using default");
            default
        }),
    }
}
