//! In-memory reactive store backed by durable storage.
//!
//! The store mirrors the persisted collection in memory and broadcasts a
//! [`StoreEvent`] for every mutation. Each action updates memory, notifies
//! subscribers, then awaits the persisted write and returns its result, so a
//! failed write reaches the caller instead of being dropped. Memory is not
//! rolled back on a failed write; the next `load_from_storage` of a fresh
//! store re-reads the durable state.
//!
//! The store is an explicit instance owned by the composition root; there is
//! no global singleton.

use std::sync::RwLock;

use log::debug;
use tokio::sync::broadcast;

use crate::domain::{Tasbeeh, TasbeehInput, TasbeehUpdate};
use crate::error::{Result, TasbeehError};
use crate::id::timestamp;
use crate::storage::TasbeehStorage;

/// Change notifications emitted to subscribers.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// Initial hydration from storage completed
    Loaded,
    /// A record was created
    Added(Tasbeeh),
    /// A record was modified
    Updated(Tasbeeh),
    /// A record was removed
    Deleted(String),
    /// Every counter was reset in one bulk write
    Reset,
    /// The whole collection was dropped
    Cleared,
}

#[derive(Debug, Default)]
struct StoreState {
    tasbeehs: Vec<Tasbeeh>,
    loaded: bool,
}

/// Reactive tasbeeh store.
pub struct TasbeehStore {
    state: RwLock<StoreState>,
    storage: TasbeehStorage,
    event_tx: broadcast::Sender<StoreEvent>,
}

impl TasbeehStore {
    /// Create a store over the given storage service.
    pub fn new(storage: TasbeehStorage) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            state: RwLock::new(StoreState::default()),
            storage,
            event_tx,
        }
    }

    /// Get a receiver for change events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    fn broadcast(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    fn read_state(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|e| TasbeehError::Storage(e.to_string()))
    }

    fn write_state(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|e| TasbeehError::Storage(e.to_string()))
    }

    /// Whether the initial load has completed.
    pub fn is_loaded(&self) -> bool {
        self.read_state().map(|s| s.loaded).unwrap_or(false)
    }

    /// Synchronous lookup against the in-memory sequence; never touches
    /// storage.
    pub fn get(&self, id: &str) -> Option<Tasbeeh> {
        self.read_state()
            .ok()
            .and_then(|s| s.tasbeehs.iter().find(|t| t.id == id).cloned())
    }

    /// A copy of the in-memory sequence.
    pub fn snapshot(&self) -> Vec<Tasbeeh> {
        self.read_state()
            .map(|s| s.tasbeehs.clone())
            .unwrap_or_default()
    }

    /// Hydrate memory from storage. Idempotent; a second call when already
    /// loaded is a no-op.
    pub async fn load_from_storage(&self) -> Result<()> {
        if self.is_loaded() {
            return Ok(());
        }

        let tasbeehs = self.storage.load_all().await?;
        {
            let mut state = self.write_state()?;
            if state.loaded {
                return Ok(());
            }
            state.tasbeehs = tasbeehs;
            state.loaded = true;
        }
        debug!("store loaded from {}", self.storage.storage_key());
        self.broadcast(StoreEvent::Loaded);
        Ok(())
    }

    async fn persist(&self, tasbeehs: Vec<Tasbeeh>) -> Result<()> {
        // Memory already holds the new state; a failed write leaves the two
        // out of sync until the next hydration.
        self.storage.save_all(tasbeehs).await
    }

    /// Create a record: memory first, then persisted.
    pub async fn add(&self, input: TasbeehInput) -> Result<Tasbeeh> {
        let tasbeeh = Tasbeeh::new(input);

        let updated_list = {
            let mut state = self.write_state()?;
            state.tasbeehs.push(tasbeeh.clone());
            state.tasbeehs.clone()
        };

        self.broadcast(StoreEvent::Added(tasbeeh.clone()));
        self.persist(updated_list).await?;
        Ok(tasbeeh)
    }

    /// Merge a patch into a record and refresh its timestamp.
    pub async fn update(&self, id: &str, updates: TasbeehUpdate) -> Result<Tasbeeh> {
        let updated_tasbeeh;
        let updated_list;
        {
            let mut state = self.write_state()?;
            let slot = state
                .tasbeehs
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| TasbeehError::NotFound(id.to_string()))?;
            slot.apply(updates);
            slot.touch();
            updated_tasbeeh = slot.clone();
            updated_list = state.tasbeehs.clone();
        }

        self.broadcast(StoreEvent::Updated(updated_tasbeeh.clone()));
        self.persist(updated_list).await?;
        Ok(updated_tasbeeh)
    }

    /// Remove a record. Returns `false` when the id was absent.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let updated_list = {
            let mut state = self.write_state()?;
            let before = state.tasbeehs.len();
            state.tasbeehs.retain(|t| t.id != id);
            if state.tasbeehs.len() == before {
                return Ok(false);
            }
            state.tasbeehs.clone()
        };

        self.broadcast(StoreEvent::Deleted(id.to_string()));
        self.persist(updated_list).await?;
        Ok(true)
    }

    /// Increase a counter. Saturates at `u32::MAX`.
    pub async fn increment_count(&self, id: &str, amount: u32) -> Result<Tasbeeh> {
        let current = self
            .get(id)
            .ok_or_else(|| TasbeehError::NotFound(id.to_string()))?;

        self.update(
            id,
            TasbeehUpdate {
                current_count: Some(current.current_count.saturating_add(amount)),
                ..Default::default()
            },
        )
        .await
    }

    /// Decrease a counter, clamped at zero.
    pub async fn decrement_count(&self, id: &str, amount: u32) -> Result<Tasbeeh> {
        let current = self
            .get(id)
            .ok_or_else(|| TasbeehError::NotFound(id.to_string()))?;

        self.update(
            id,
            TasbeehUpdate {
                current_count: Some(current.current_count.saturating_sub(amount)),
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

    /// Reset every counter in one bulk write with one shared timestamp.
    pub async fn reset_all(&self) -> Result<()> {
        let updated_list = {
            let mut state = self.write_state()?;
            let now = timestamp();
            for tasbeeh in &mut state.tasbeehs {
                tasbeeh.current_count = 0;
                tasbeeh.updated_at = now.clone();
            }
            state.tasbeehs.clone()
        };

        self.broadcast(StoreEvent::Reset);
        self.persist(updated_list).await
    }

    /// Drop every record and delete the underlying key.
    pub async fn clear(&self) -> Result<()> {
        {
            let mut state = self.write_state()?;
            state.tasbeehs.clear();
        }

        self.broadcast(StoreEvent::Cleared);
        self.storage.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Period;
    use crate::error::TasbeehError;
    use crate::storage::{FileBackend, KeyValueBackend, MemoryBackend, TasbeehStorage};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn sample_input(name: &str, target: u32) -> TasbeehInput {
        TasbeehInput {
            name: name.to_string(),
            arabic_text: None,
            translation: None,
            target_count: target,
            period: Period::Daily,
        }
    }

    fn create_store() -> TasbeehStore {
        let storage = TasbeehStorage::new(Arc::new(MemoryBackend::new()), "tasbeeh");
        TasbeehStore::new(storage)
    }

    /// Backend whose writes always fail, for persistence-error propagation.
    struct FailingBackend;

    #[async_trait]
    impl KeyValueBackend for FailingBackend {
        async fn get_item(&self, _key: &str) -> crate::error::Result<Option<String>> {
            Ok(None)
        }

        async fn set_item(&self, _key: &str, _value: &str) -> crate::error::Result<()> {
            Err(TasbeehError::Storage("disk full".to_string()))
        }

        async fn remove_item(&self, _key: &str) -> crate::error::Result<()> {
            Err(TasbeehError::Storage("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn test_load_from_storage_is_idempotent() {
        let store = create_store();
        assert!(!store.is_loaded());

        store.load_from_storage().await.unwrap();
        assert!(store.is_loaded());

        // Second load is a no-op
        store.load_from_storage().await.unwrap();
        assert!(store.is_loaded());
    }

    #[tokio::test]
    async fn test_add_then_get_is_synchronous() {
        let store = create_store();
        store.load_from_storage().await.unwrap();

        let added = store.add(sample_input("SubhanAllah", 33)).await.unwrap();

        let found = store.get(&added.id).unwrap();
        assert_eq!(found, added);
        assert_eq!(found.current_count, 0);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let store = create_store();
        assert_eq!(store.get("ghost"), None);
    }

    #[tokio::test]
    async fn test_update_refreshes_record() {
        let store = create_store();
        store.load_from_storage().await.unwrap();
        let added = store.add(sample_input("SubhanAllah", 33)).await.unwrap();

        let updated = store
            .update(
                &added.id,
                TasbeehUpdate {
                    target_count: Some(99),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.target_count, 99);
        assert_eq!(store.get(&added.id).unwrap().target_count, 99);
    }

    #[tokio::test]
    async fn test_update_unknown_id_fails() {
        let store = create_store();
        store.load_from_storage().await.unwrap();

        let result = store.update("ghost", TasbeehUpdate::default()).await;
        assert!(matches!(result, Err(TasbeehError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_returns_whether_removed() {
        let store = create_store();
        store.load_from_storage().await.unwrap();
        let added = store.add(sample_input("SubhanAllah", 33)).await.unwrap();

        assert!(store.delete(&added.id).await.unwrap());
        assert_eq!(store.get(&added.id), None);

        // Absent id reports false, not an error
        assert!(!store.delete(&added.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_increment_to_completion() {
        let store = create_store();
        store.load_from_storage().await.unwrap();
        let added = store.add(sample_input("SubhanAllah", 3)).await.unwrap();

        for _ in 0..3 {
            store.increment_count(&added.id, 1).await.unwrap();
        }

        let done = store.get(&added.id).unwrap();
        assert_eq!(done.current_count, 3);
        assert!(done.is_complete());
        assert_eq!(done.progress(), 100);
    }

    #[tokio::test]
    async fn test_decrement_clamps_at_zero() {
        let store = create_store();
        store.load_from_storage().await.unwrap();
        let added = store.add(sample_input("SubhanAllah", 33)).await.unwrap();

        store.increment_count(&added.id, 2).await.unwrap();
        let after = store.decrement_count(&added.id, 5).await.unwrap();

        assert_eq!(after.current_count, 0);
    }

    #[tokio::test]
    async fn test_reset_all_zeroes_every_counter() {
        let store = create_store();
        store.load_from_storage().await.unwrap();
        let a = store.add(sample_input("one", 10)).await.unwrap();
        let b = store.add(sample_input("two", 20)).await.unwrap();

        store.increment_count(&a.id, 4).await.unwrap();
        store.increment_count(&b.id, 9).await.unwrap();

        store.reset_all().await.unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.iter().all(|t| t.current_count == 0));
        assert_eq!(snapshot[0].name, "one");
        assert_eq!(snapshot[1].name, "two");
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let store = create_store();
        store.load_from_storage().await.unwrap();
        store.add(sample_input("one", 10)).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_observe_mutations() {
        let store = create_store();
        let mut events = store.subscribe();

        store.load_from_storage().await.unwrap();
        let added = store.add(sample_input("SubhanAllah", 33)).await.unwrap();
        store.increment_count(&added.id, 1).await.unwrap();
        store.delete(&added.id).await.unwrap();

        assert!(matches!(events.try_recv().unwrap(), StoreEvent::Loaded));
        match events.try_recv().unwrap() {
            StoreEvent::Added(t) => assert_eq!(t.id, added.id),
            other => panic!("expected Added, got {other:?}"),
        }
        match events.try_recv().unwrap() {
            StoreEvent::Updated(t) => assert_eq!(t.current_count, 1),
            other => panic!("expected Updated, got {other:?}"),
        }
        match events.try_recv().unwrap() {
            StoreEvent::Deleted(id) => assert_eq!(id, added.id),
            other => panic!("expected Deleted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mutations_reach_durable_storage() {
        let temp_dir = TempDir::new().unwrap();

        let added = {
            let storage =
                TasbeehStorage::new(Arc::new(FileBackend::new(temp_dir.path())), "tasbeeh");
            let store = TasbeehStore::new(storage);
            store.load_from_storage().await.unwrap();
            store.add(sample_input("SubhanAllah", 33)).await.unwrap()
        };

        // A fresh store over the same directory sees the record
        let storage = TasbeehStorage::new(Arc::new(FileBackend::new(temp_dir.path())), "tasbeeh");
        let store = TasbeehStore::new(storage);
        store.load_from_storage().await.unwrap();

        let found = store.get(&added.id).unwrap();
        assert_eq!(found.name, "SubhanAllah");
    }

    #[tokio::test]
    async fn test_persist_failure_propagates_to_caller() {
        let storage = TasbeehStorage::new(Arc::new(FailingBackend), "tasbeeh");
        let store = TasbeehStore::new(storage);
        store.load_from_storage().await.unwrap();

        let result = store.add(sample_input("SubhanAllah", 33)).await;
        assert!(matches!(result, Err(TasbeehError::Storage(_))));
    }
}
