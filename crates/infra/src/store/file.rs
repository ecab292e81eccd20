//! JSON-file record store: one `<key>.json` file per collection.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use super::{RecordKey, RecordStore, StoreError};

/// Directory-backed record store.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader never observes a half-written collection.
#[derive(Debug, Clone)]
pub struct JsonFileRecordStore {
    dir: PathBuf,
}

impl JsonFileRecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: RecordKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

#[async_trait]
impl RecordStore for JsonFileRecordStore {
    async fn load_raw(&self, key: RecordKey) -> Result<Option<JsonValue>, StoreError> {
        let bytes = match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn save_raw(&self, key: RecordKey, value: JsonValue) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(&value)?;

        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(key = %key, path = %path.display(), "records written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileRecordStore::new(dir.path());
        assert_eq!(store.load_raw(RecordKey::Deliveries).await.unwrap(), None);
    }

    #[tokio::test]
    async fn writes_one_file_per_key_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileRecordStore::new(dir.path().join("nested"));

        store.save_raw(RecordKey::BoxStock, json!([{"sku": "A"}])).await.unwrap();
        store.save_raw(RecordKey::BoxStock, json!([{"sku": "B"}])).await.unwrap();

        assert!(store.dir().join("box_stock.json").exists());
        assert!(!store.dir().join("box_stock.json.tmp").exists());
        assert_eq!(
            store.load_raw(RecordKey::BoxStock).await.unwrap(),
            Some(json!([{"sku": "B"}]))
        );
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("products.json"), b"{ not json").unwrap();

        let store = JsonFileRecordStore::new(dir.path());
        let err = store.load_raw(RecordKey::Products).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
