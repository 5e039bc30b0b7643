use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kanban_core::{KanbanResult, Repository};
use kanban_domain::{ActivityRecord, BoardDocument, BoardId, UserId, UserSummary};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Metadata for persistence operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceMetadata {
    /// Version of the persistence format
    pub format_version: u32,
    /// ID of the process that performed the save
    pub instance_id: Uuid,
    /// When this data was saved
    pub saved_at: DateTime<Utc>,
}

impl PersistenceMetadata {
    pub fn new(format_version: u32, instance_id: Uuid) -> Self {
        Self {
            format_version,
            instance_id,
            saved_at: Utc::now(),
        }
    }
}

/// Point-in-time snapshot of everything the store holds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Raw JSON bytes of the whole dataset
    pub data: Vec<u8>,
    pub metadata: PersistenceMetadata,
}

/// Backend that holds one snapshot at a time (a file, memory, ...).
/// `save` replaces the previous snapshot as a whole or not at all.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    async fn save(&self, snapshot: StoreSnapshot) -> KanbanResult<PersistenceMetadata>;

    async fn load(&self) -> KanbanResult<(StoreSnapshot, PersistenceMetadata)>;

    async fn exists(&self) -> bool;

    /// Where the snapshot lives, for log messages
    fn path(&self) -> &Path;
}

/// Serialization strategy for snapshot payloads
pub trait Serializer<T: Send + Sync>: Send + Sync {
    fn serialize(&self, data: &T) -> KanbanResult<Vec<u8>>;

    fn deserialize(&self, bytes: &[u8]) -> KanbanResult<T>;
}

/// Board documents keyed by board id. Each `save` replaces one whole board
/// (columns and cards included) and returns it with its version bumped.
pub trait BoardRepository: Repository<BoardDocument, BoardId> {}

impl<R> BoardRepository for R where R: Repository<BoardDocument, BoardId> {}

/// Append-only activity trail.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn record(&self, record: ActivityRecord) -> KanbanResult<()>;

    /// Most recent first
    async fn recent(&self, board_id: BoardId, limit: usize) -> KanbanResult<Vec<ActivityRecord>>;
}

/// Display information for user ids.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// One summary per id, in the same order. Unknown ids get a placeholder.
    async fn summaries(&self, ids: &[UserId]) -> KanbanResult<Vec<UserSummary>>;

    async fn register(&self, user: UserSummary) -> KanbanResult<()>;
}
