use crate::traits::{PersistenceMetadata, PersistenceStore, StoreSnapshot};
use kanban_core::{KanbanError, KanbanResult};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// Store that keeps the snapshot in process memory. Used by tests and by
/// servers started without a data file.
#[derive(Debug)]
pub struct MemoryStore {
    snapshot: Mutex<Option<StoreSnapshot>>,
    instance_id: Uuid,
    fail_writes: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            snapshot: Mutex::new(None),
            instance_id: Uuid::new_v4(),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every following `save` fail with a persistence error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl PersistenceStore for MemoryStore {
    async fn save(&self, mut snapshot: StoreSnapshot) -> KanbanResult<PersistenceMetadata> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KanbanError::Persistence(
                "memory store is refusing writes".to_string(),
            ));
        }
        snapshot.metadata.instance_id = self.instance_id;
        snapshot.metadata.saved_at = chrono::Utc::now();
        let metadata = snapshot.metadata.clone();
        *self.snapshot.lock() = Some(snapshot);
        Ok(metadata)
    }

    async fn load(&self) -> KanbanResult<(StoreSnapshot, PersistenceMetadata)> {
        self.snapshot
            .lock()
            .clone()
            .map(|snapshot| {
                let metadata = snapshot.metadata.clone();
                (snapshot, metadata)
            })
            .ok_or_else(|| KanbanError::NotFound("memory snapshot".to_string()))
    }

    async fn exists(&self) -> bool {
        self.snapshot.lock().is_some()
    }

    fn path(&self) -> &Path {
        Path::new(":memory:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StoreSnapshot {
        StoreSnapshot {
            data: b"{}".to_vec(),
            metadata: PersistenceMetadata::new(1, Uuid::nil()),
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemoryStore::new();
        assert!(!store.exists().await);

        store.save(snapshot()).await.unwrap();

        let (loaded, metadata) = store.load().await.unwrap();
        assert_eq!(loaded.data, b"{}");
        assert_eq!(metadata.instance_id, store.instance_id);
    }

    #[tokio::test]
    async fn test_failing_writes_keep_previous_snapshot() {
        let store = MemoryStore::new();
        store.save(snapshot()).await.unwrap();
        store.set_fail_writes(true);

        let mut changed = snapshot();
        changed.data = b"[]".to_vec();
        let err = store.save(changed).await.unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(store.load().await.unwrap().0.data, b"{}");
    }
}
