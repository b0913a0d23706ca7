//! Single-value JSON storage under one namespaced key.

use std::marker::PhantomData;
use std::sync::Arc;

use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::backend::KeyValueBackend;
use crate::error::Result;

/// Stores one JSON-serialized value of type `T` under one namespaced key.
///
/// "Nothing stored" is reported as `Ok(None)`, distinct from a read or parse
/// failure. Failures are surfaced verbatim; there are no retries.
pub struct KvStorage<T> {
    backend: Arc<dyn KeyValueBackend>,
    storage_key: String,
    _phantom: PhantomData<T>,
}

impl<T> KvStorage<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a storage bound to `<prefix>_<key>` on the given backend.
    pub fn new(backend: Arc<dyn KeyValueBackend>, prefix: &str, key: &str) -> Self {
        Self {
            backend,
            storage_key: format!("{prefix}_{key}"),
            _phantom: PhantomData,
        }
    }

    /// The namespaced key this storage reads and writes.
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Read the stored value, `Ok(None)` when nothing is stored.
    pub async fn get(&self) -> Result<Option<T>> {
        match self.backend.get_item(&self.storage_key).await? {
            Some(raw) => {
                let value: T = serde_json::from_str(&raw)?;
                debug!("[{}] get returned a value", self.storage_key);
                Ok(Some(value))
            }
            None => {
                debug!("[{}] get found nothing stored", self.storage_key);
                Ok(None)
            }
        }
    }

    /// Serialize and store the value, replacing any previous one.
    pub async fn set(&self, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set_item(&self.storage_key, &raw).await?;
        debug!("[{}] set successful", self.storage_key);
        Ok(())
    }

    /// Delete the key entirely. Idempotent.
    pub async fn remove(&self) -> Result<()> {
        self.backend.remove_item(&self.storage_key).await?;
        debug!("[{}] remove successful", self.storage_key);
        Ok(())
    }

    /// Shallow-merge a JSON object into the stored object and write back.
    ///
    /// When nothing is stored the partial becomes the stored value. A
    /// non-object partial replaces the stored value wholesale.
    pub async fn merge(&self, partial: Value) -> Result<()> {
        let mut current: Value = match self.backend.get_item(&self.storage_key).await? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Value::Object(serde_json::Map::new()),
        };

        match (&mut current, partial) {
            (Value::Object(base), Value::Object(patch)) => {
                for (field, value) in patch {
                    base.insert(field, value);
                }
            }
            (slot, other) => *slot = other,
        }

        let raw = serde_json::to_string(&current)?;
        self.backend.set_item(&self.storage_key, &raw).await?;
        debug!("[{}] merge successful", self.storage_key);
        Ok(())
    }

    /// Whether any value is stored. Reports `false` on failure.
    pub async fn exists(&self) -> bool {
        matches!(self.backend.get_item(&self.storage_key).await, Ok(Some(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Settings {
        theme: String,
        volume: u32,
    }

    fn create_storage() -> KvStorage<Settings> {
        KvStorage::new(Arc::new(MemoryBackend::new()), "app", "settings")
    }

    #[test]
    fn test_storage_key_is_namespaced() {
        let storage = create_storage();
        assert_eq!(storage.storage_key(), "app_settings");
    }

    #[tokio::test]
    async fn test_get_when_empty_returns_none() {
        let storage = create_storage();
        assert_eq!(storage.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let storage = create_storage();
        let settings = Settings {
            theme: "dark".to_string(),
            volume: 7,
        };

        storage.set(&settings).await.unwrap();
        assert_eq!(storage.get().await.unwrap(), Some(settings));
    }

    #[tokio::test]
    async fn test_remove_clears_value() {
        let storage = create_storage();
        storage
            .set(&Settings {
                theme: "light".to_string(),
                volume: 3,
            })
            .await
            .unwrap();

        storage.remove().await.unwrap();
        assert_eq!(storage.get().await.unwrap(), None);
        assert!(!storage.exists().await);
    }

    #[tokio::test]
    async fn test_exists() {
        let storage = create_storage();
        assert!(!storage.exists().await);

        storage
            .set(&Settings {
                theme: "dark".to_string(),
                volume: 1,
            })
            .await
            .unwrap();
        assert!(storage.exists().await);
    }

    #[tokio::test]
    async fn test_merge_shallow_merges_objects() {
        let storage = create_storage();
        storage
            .set(&Settings {
                theme: "dark".to_string(),
                volume: 7,
            })
            .await
            .unwrap();

        storage.merge(json!({ "volume": 9 })).await.unwrap();

        let merged = storage.get().await.unwrap().unwrap();
        assert_eq!(merged.theme, "dark");
        assert_eq!(merged.volume, 9);
    }

    #[tokio::test]
    async fn test_merge_into_empty_storage() {
        let backend = Arc::new(MemoryBackend::new());
        let storage: KvStorage<serde_json::Value> = KvStorage::new(backend, "app", "blob");

        storage.merge(json!({ "a": 1 })).await.unwrap();

        assert_eq!(storage.get().await.unwrap(), Some(json!({ "a": 1 })));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_json_error() {
        let backend = Arc::new(MemoryBackend::new());
        backend.set_item("app_settings", "{not json").await.unwrap();

        let storage: KvStorage<Settings> =
            KvStorage::new(backend, "app", "settings");

        let err = storage.get().await.unwrap_err();
        assert!(matches!(err, crate::error::TasbeehError::Json(_)));
    }
}
