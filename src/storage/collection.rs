//! Collection storage over a single key-value slot.

use std::sync::Arc;

use log::debug;
use serde::{Serialize, de::DeserializeOwned};

use super::backend::KeyValueBackend;
use super::kv::KvStorage;
use crate::error::{Result, TasbeehError};

/// Trait for records that carry a unique string identifier.
pub trait HasId {
    /// Get the record's unique identifier.
    fn id(&self) -> &str;
}

/// Stores an insertion-ordered sequence of id-keyed records as one JSON array.
///
/// Every mutation materializes the whole sequence, mutates the in-memory
/// copy and persists it back. Reads are O(n) scans; there is no index.
pub struct CollectionStorage<T> {
    storage: KvStorage<Vec<T>>,
}

impl<T> CollectionStorage<T>
where
    T: HasId + Serialize + DeserializeOwned + Clone,
{
    /// Create a collection bound to `<prefix>_<key>` on the given backend.
    pub fn new(backend: Arc<dyn KeyValueBackend>, prefix: &str, key: &str) -> Self {
        Self {
            storage: KvStorage::new(backend, prefix, key),
        }
    }

    /// The namespaced key the collection is stored under.
    pub fn storage_key(&self) -> &str {
        self.storage.storage_key()
    }

    /// All records, in insertion order. Empty when nothing is stored.
    pub async fn get_all(&self) -> Result<Vec<T>> {
        Ok(self.storage.get().await?.unwrap_or_default())
    }

    /// The record with the given id, if present.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<T>> {
        Ok(self.get_all().await?.into_iter().find(|item| item.id() == id))
    }

    /// Append a record and persist; returns the resulting sequence.
    pub async fn add(&self, item: T) -> Result<Vec<T>> {
        let mut items = self.get_all().await?;
        items.push(item);
        self.storage.set(&items).await?;
        debug!("[{}] added 1 item", self.storage_key());
        Ok(items)
    }

    /// Append several records and persist; returns the resulting sequence.
    pub async fn add_many(&self, new_items: Vec<T>) -> Result<Vec<T>> {
        let added = new_items.len();
        let mut items = self.get_all().await?;
        items.extend(new_items);
        self.storage.set(&items).await?;
        debug!("[{}] added {} items", self.storage_key(), added);
        Ok(items)
    }

    /// Mutate the record with the given id in place and persist.
    ///
    /// Fails with [`TasbeehError::NotFound`] when the id is absent.
    pub async fn update<F>(&self, id: &str, apply: F) -> Result<Vec<T>>
    where
        F: FnOnce(&mut T),
    {
        let mut items = self.get_all().await?;
        match items.iter_mut().find(|item| item.id() == id) {
            Some(item) => apply(item),
            None => return Err(TasbeehError::NotFound(id.to_string())),
        }
        self.storage.set(&items).await?;
        debug!("[{}] updated item {}", self.storage_key(), id);
        Ok(items)
    }

    /// Replace the record with the given id wholesale and persist.
    ///
    /// Fails with [`TasbeehError::NotFound`] when the id is absent.
    pub async fn replace(&self, id: &str, new_item: T) -> Result<Vec<T>> {
        let mut items = self.get_all().await?;
        match items.iter_mut().find(|item| item.id() == id) {
            Some(slot) => *slot = new_item,
            None => return Err(TasbeehError::NotFound(id.to_string())),
        }
        self.storage.set(&items).await?;
        debug!("[{}] replaced item {}", self.storage_key(), id);
        Ok(items)
    }

    /// Remove the record with the given id and persist.
    ///
    /// Persists regardless of whether anything matched; removing an absent
    /// id is a successful no-op.
    pub async fn remove(&self, id: &str) -> Result<Vec<T>> {
        let mut items = self.get_all().await?;
        items.retain(|item| item.id() != id);
        self.storage.set(&items).await?;
        debug!("[{}] removed item {}", self.storage_key(), id);
        Ok(items)
    }

    /// Remove every record whose id appears in `ids` and persist.
    pub async fn remove_many(&self, ids: &[String]) -> Result<Vec<T>> {
        let mut items = self.get_all().await?;
        items.retain(|item| !ids.iter().any(|id| id == item.id()));
        self.storage.set(&items).await?;
        debug!("[{}] removed {} ids", self.storage_key(), ids.len());
        Ok(items)
    }

    /// Delete the underlying key entirely.
    pub async fn clear(&self) -> Result<()> {
        self.storage.remove().await
    }

    /// Replace the entire collection with the given sequence.
    pub async fn save_all(&self, items: Vec<T>) -> Result<()> {
        self.storage.set(&items).await
    }

    /// Number of stored records.
    pub async fn count(&self) -> Result<usize> {
        Ok(self.get_all().await?.len())
    }

    /// Whether a record with the given id is stored.
    pub async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    /// All records matching a predicate, in insertion order.
    pub async fn find<P>(&self, predicate: P) -> Result<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|item| predicate(item))
            .collect())
    }

    /// The first record matching a predicate.
    pub async fn find_one<P>(&self, predicate: P) -> Result<Option<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self.get_all().await?.into_iter().find(|item| predicate(item)))
    }
}
