//! Record store boundary.
//!
//! Collections are stored whole under a fixed key and every write replaces the
//! previous value (single owner, last write wins). Adapters deal in JSON
//! values; [`load`] and [`save`] add the typed layer on top.

pub mod file;
pub mod memory;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use thiserror::Error;

pub use file::JsonFileRecordStore;
pub use memory::InMemoryRecordStore;
pub use sqlite::SqliteRecordStore;

/// Keys of the collections the engines read and write.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Deliveries,
    Products,
    StockUnits,
    OutgoingDocuments,
    /// Derived box-stock snapshot; overwritten on every reconciliation.
    BoxStock,
}

impl RecordKey {
    pub const ALL: [RecordKey; 5] = [
        RecordKey::Deliveries,
        RecordKey::Products,
        RecordKey::StockUnits,
        RecordKey::OutgoingDocuments,
        RecordKey::BoxStock,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordKey::Deliveries => "deliveries",
            RecordKey::Products => "products",
            RecordKey::StockUnits => "stock_units",
            RecordKey::OutgoingDocuments => "outgoing_stock",
            RecordKey::BoxStock => "box_stock",
        }
    }
}

impl core::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Key-addressed storage of whole record collections.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Stored value for `key`, or `None` if nothing was ever saved.
    async fn load_raw(&self, key: RecordKey) -> Result<Option<JsonValue>, StoreError>;

    /// Replace the value stored under `key`.
    async fn save_raw(&self, key: RecordKey, value: JsonValue) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    async fn load_raw(&self, key: RecordKey) -> Result<Option<JsonValue>, StoreError> {
        (**self).load_raw(key).await
    }

    async fn save_raw(&self, key: RecordKey, value: JsonValue) -> Result<(), StoreError> {
        (**self).save_raw(key, value).await
    }
}

/// How a collection read went.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing was ever saved under the key.
    Missing,
    /// The stored list was read; some records may still have been rejected.
    Read,
    /// The store failed or the stored value is not a list.
    Failed,
}

/// A typed collection together with what could not be decoded.
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    /// Number of stored records skipped because they did not decode.
    pub rejected: usize,
    pub status: LoadStatus,
}

impl<T> Loaded<T> {
    fn empty(status: LoadStatus) -> Self {
        Self {
            records: Vec::new(),
            rejected: 0,
            status,
        }
    }

    /// Every stored record made it into `records`.
    pub fn is_complete(&self) -> bool {
        self.status != LoadStatus::Failed && self.rejected == 0
    }
}

/// Load a typed collection record by record.
///
/// A record that fails to decode (bad date, negative quantity) is logged and
/// skipped; the rest of the collection is kept.
pub async fn load_records<T, S>(store: &S, key: RecordKey) -> Loaded<T>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    let raw = match store.load_raw(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Loaded::empty(LoadStatus::Missing),
        Err(err) => {
            tracing::error!(key = %key, error = %err, "failed to read records");
            return Loaded::empty(LoadStatus::Failed);
        }
    };

    let JsonValue::Array(values) = raw else {
        tracing::error!(key = %key, "stored value is not a list of records");
        return Loaded::empty(LoadStatus::Failed);
    };

    let mut loaded = Loaded {
        records: Vec::with_capacity(values.len()),
        rejected: 0,
        status: LoadStatus::Read,
    };
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(record) => loaded.records.push(record),
            Err(err) => {
                tracing::warn!(key = %key, index, error = %err, "skipping undecodable record");
                loaded.rejected += 1;
            }
        }
    }
    loaded
}

/// Load a typed collection.
///
/// Missing keys and unreadable collections yield `default`; undecodable
/// records are skipped. Failures are logged here so callers never see them.
pub async fn load<T, S>(store: &S, key: RecordKey, default: Vec<T>) -> Vec<T>
where
    T: DeserializeOwned,
    S: RecordStore + ?Sized,
{
    let loaded = load_records(store, key).await;
    match loaded.status {
        LoadStatus::Read => loaded.records,
        LoadStatus::Missing | LoadStatus::Failed => default,
    }
}

/// Save a typed collection, replacing whatever was stored under `key`.
pub async fn save<T, S>(store: &S, key: RecordKey, records: &[T]) -> Result<(), StoreError>
where
    T: Serialize + Sync,
    S: RecordStore + ?Sized,
{
    let value = serde_json::to_value(records)?;
    store.save_raw(key, value).await
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    #[async_trait]
    impl RecordStore for BrokenStore {
        async fn load_raw(&self, _key: RecordKey) -> Result<Option<JsonValue>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk on fire")))
        }

        async fn save_raw(&self, _key: RecordKey, _value: JsonValue) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk on fire")))
        }
    }

    #[test]
    fn keys_are_distinct() {
        let mut names: Vec<&str> = RecordKey::ALL.iter().map(|k| k.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), RecordKey::ALL.len());
    }

    #[tokio::test]
    async fn load_falls_back_to_default_on_read_failure() {
        let records: Vec<String> = load(&BrokenStore, RecordKey::Products, vec!["x".to_string()]).await;
        assert_eq!(records, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn load_falls_back_to_default_on_bad_payload() {
        let store = InMemoryRecordStore::new();
        store
            .save_raw(RecordKey::Products, serde_json::json!({"not": "a list"}))
            .await
            .unwrap();

        let records: Vec<u64> = load(&store, RecordKey::Products, Vec::new()).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn load_skips_only_the_undecodable_records() {
        let store = InMemoryRecordStore::new();
        store
            .save_raw(RecordKey::StockUnits, serde_json::json!([1, -2, "three", 4]))
            .await
            .unwrap();

        let loaded: Loaded<u64> = load_records(&store, RecordKey::StockUnits).await;
        assert_eq!(loaded.records, vec![1, 4]);
        assert_eq!(loaded.rejected, 2);
        assert_eq!(loaded.status, LoadStatus::Read);
        assert!(!loaded.is_complete());

        let records: Vec<u64> = load(&store, RecordKey::StockUnits, vec![9]).await;
        assert_eq!(records, vec![1, 4]);
    }

    #[tokio::test]
    async fn missing_and_failed_collections_are_told_apart() {
        let missing: Loaded<u64> = load_records(&InMemoryRecordStore::new(), RecordKey::Products).await;
        assert_eq!(missing.status, LoadStatus::Missing);
        assert!(missing.is_complete());

        let failed: Loaded<u64> = load_records(&BrokenStore, RecordKey::Products).await;
        assert_eq!(failed.status, LoadStatus::Failed);
        assert!(!failed.is_complete());
    }

    #[tokio::test]
    async fn save_surfaces_write_failures() {
        let err = save(&BrokenStore, RecordKey::BoxStock, &[1u64, 2]).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[tokio::test]
    async fn typed_round_trip_through_arc() {
        let store: Arc<dyn RecordStore> = Arc::new(InMemoryRecordStore::new());
        save(&store, RecordKey::StockUnits, &[3u64, 4]).await.unwrap();
        let back: Vec<u64> = load(&store, RecordKey::StockUnits, Vec::new()).await;
        assert_eq!(back, vec![3, 4]);
    }
}
