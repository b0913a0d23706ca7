//! Tasbeeh-specific storage service.

use std::sync::Arc;

use log::debug;

use super::backend::KeyValueBackend;
use super::collection::CollectionStorage;
use crate::domain::{Period, Tasbeeh, TasbeehInput, TasbeehUpdate};
use crate::error::{Result, TasbeehError};
use crate::id::timestamp;

/// Collection key for the tasbeeh list.
pub const TASBEEH_COLLECTION: &str = "tasbeeh_list";

/// Domain storage service for tasbeeh records.
///
/// Binds the generic collection storage to the tasbeeh collection and adds
/// the counter semantics on top. Performs no input validation; that lives in
/// the caller-facing layer.
pub struct TasbeehStorage {
    collection: CollectionStorage<Tasbeeh>,
}

impl TasbeehStorage {
    /// Create a storage service over the given backend and key prefix.
    pub fn new(backend: Arc<dyn KeyValueBackend>, key_prefix: &str) -> Self {
        Self {
            collection: CollectionStorage::new(backend, key_prefix, TASBEEH_COLLECTION),
        }
    }

    /// The namespaced key the collection is stored under.
    pub fn storage_key(&self) -> &str {
        self.collection.storage_key()
    }

    /// All records in insertion order.
    pub async fn load_all(&self) -> Result<Vec<Tasbeeh>> {
        self.collection.get_all().await
    }

    /// Single record lookup.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Tasbeeh>> {
        self.collection.get_by_id(id).await
    }

    /// Replace the entire collection.
    pub async fn save_all(&self, tasbeehs: Vec<Tasbeeh>) -> Result<()> {
        self.collection.save_all(tasbeehs).await
    }

    /// Create a new record: stamps id and timestamps, zeroes the count.
    pub async fn create(&self, input: TasbeehInput) -> Result<Tasbeeh> {
        let tasbeeh = Tasbeeh::new(input);
        self.collection.add(tasbeeh.clone()).await?;
        debug!("created tasbeeh {}", tasbeeh.id);
        Ok(tasbeeh)
    }

    /// Merge a patch into an existing record and refresh its timestamp.
    pub async fn update(&self, id: &str, updates: TasbeehUpdate) -> Result<Tasbeeh> {
        let mut existing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| TasbeehError::NotFound(id.to_string()))?;

        existing.apply(updates);
        existing.touch();

        self.collection.replace(id, existing.clone()).await?;
        Ok(existing)
    }

    /// Delete a record. Deleting an absent id is a successful no-op.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.collection.remove(id).await?;
        Ok(())
    }

    /// Delete several records at once.
    pub async fn delete_many(&self, ids: &[String]) -> Result<()> {
        self.collection.remove_many(ids).await?;
        Ok(())
    }

    /// Drop the whole collection.
    pub async fn clear(&self) -> Result<()> {
        self.collection.clear().await
    }

    /// Increase a counter. Saturates at `u32::MAX`.
    pub async fn increment_count(&self, id: &str, amount: u32) -> Result<Tasbeeh> {
        let existing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| TasbeehError::NotFound(id.to_string()))?;

        self.update(
            id,
            TasbeehUpdate {
                current_count: Some(existing.current_count.saturating_add(amount)),
                ..Default::default()
            },
        )
        .await
    }

    /// Decrease a counter, clamped at zero.
    pub async fn decrement_count(&self, id: &str, amount: u32) -> Result<Tasbeeh> {
        let existing = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| TasbeehError::NotFound(id.to_string()))?;

        self.update(
            id,
            TasbeehUpdate {
                current_count: Some(existing.current_count.saturating_sub(amount)),
                ..Default::default()
            },
        )
        .await
    }

    /// Reset a single counter to zero.
    pub async fn reset_count(&self, id: &str) -> Result<Tasbeeh> {
        self.update(
            id,
            TasbeehUpdate {
                current_count: Some(0),
                ..Default::default()
            },
        )
        .await
    }

    /// Reset every counter to zero in one bulk write.
    ///
    /// All records share one refreshed timestamp and the collection is
    /// written back as a single replace, not per-record updates.
    pub async fn reset_all_counts(&self) -> Result<()> {
        let mut tasbeehs = self.load_all().await?;
        let now = timestamp();
        for tasbeeh in &mut tasbeehs {
            tasbeeh.current_count = 0;
            tasbeeh.updated_at = now.clone();
        }
        self.save_all(tasbeehs).await
    }

    /// Records with the given recurrence period.
    pub async fn get_by_period(&self, period: Period) -> Result<Vec<Tasbeeh>> {
        self.collection.find(|t| t.period == period).await
    }

    /// Records whose count has reached the target.
    pub async fn get_completed(&self) -> Result<Vec<Tasbeeh>> {
        self.collection.find(Tasbeeh::is_complete).await
    }

    /// Records still short of their target.
    pub async fn get_incomplete(&self) -> Result<Vec<Tasbeeh>> {
        self.collection.find(|t| !t.is_complete()).await
    }

    /// Case-insensitive substring search over record names.
    pub async fn search_by_name(&self, query: &str) -> Result<Vec<Tasbeeh>> {
        let needle = query.to_lowercase();
        self.collection
            .find(|t| t.name.to_lowercase().contains(&needle))
            .await
    }

    /// Number of stored records.
    pub async fn total_count(&self) -> Result<usize> {
        self.collection.count().await
    }

    /// Whether a record with the given id exists.
    pub async fn exists(&self, id: &str) -> Result<bool> {
        self.collection.exists(id).await
    }
}
