//! Key-value backend trait and implementations.
//!
//! The backend is the raw on-device storage primitive: string values under
//! string keys, no interpretation of the payload.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::fs;

use crate::error::{Result, TasbeehError};

/// Asynchronous string-per-key storage primitive.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Read the raw value stored under a key, `None` when nothing is stored.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write the raw value for a key, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Removing an absent key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;
}

/// File-per-key backend rooted at a base directory.
///
/// Each key is stored as `<base_dir>/<key>.json`.
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Create a backend rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueBackend for FileBackend {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.base_dir).await?;
        fs::write(self.key_path(key), value).await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory backend for tests and ephemeral use.
#[derive(Default)]
pub struct MemoryBackend {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self
            .items
            .read()
            .map_err(|e| TasbeehError::Storage(e.to_string()))?;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| TasbeehError::Storage(e.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self
            .items
            .write()
            .map_err(|e| TasbeehError::Storage(e.to_string()))?;
        items.remove(key);
        Ok(())
    }
}
