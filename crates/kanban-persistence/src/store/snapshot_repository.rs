//! Repository over a single snapshot store.
//!
//! The whole dataset (boards, activity, users) is held in memory and written
//! back as one snapshot on every change. A write is applied to a copy first
//! and only becomes visible once the store accepted it, so a failed save
//! leaves nothing half-applied.

use async_trait::async_trait;
use kanban_core::{KanbanError, KanbanResult, Repository};
use kanban_domain::{ActivityRecord, BoardDocument, BoardId, UserId, UserSummary};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::serialization::JsonSerializer;
use crate::store::json_file_store::FORMAT_VERSION;
use crate::traits::{
    ActivityLog, PersistenceMetadata, PersistenceStore, Serializer, StoreSnapshot, UserDirectory,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub boards: Vec<BoardDocument>,
    #[serde(default)]
    pub activity: Vec<ActivityRecord>,
    #[serde(default)]
    pub users: Vec<UserSummary>,
}

pub struct SnapshotRepository<S> {
    store: S,
    state: RwLock<Dataset>,
}

impl<S: PersistenceStore> SnapshotRepository<S> {
    /// Load the dataset from `store` (empty if nothing was saved yet) and
    /// repair any board whose derived fields disagree with its column arrays.
    pub async fn open(store: S) -> KanbanResult<Self> {
        let dataset = if store.exists().await {
            let (snapshot, metadata) = store.load().await?;
            let mut dataset: Dataset = JsonSerializer.deserialize(&snapshot.data)?;
            for doc in dataset.boards.iter_mut() {
                let report = doc.reconcile();
                if !report.is_clean() {
                    tracing::warn!(
                        board_id = %doc.id(),
                        ?report,
                        "Repaired inconsistent board on load"
                    );
                }
            }
            tracing::info!(
                boards = dataset.boards.len(),
                saved_at = %metadata.saved_at,
                "Opened data at {}",
                store.path().display()
            );
            dataset
        } else {
            tracing::debug!("No data at {}, starting empty", store.path().display());
            Dataset::default()
        };

        Ok(Self {
            store,
            state: RwLock::new(dataset),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn persist(&self, dataset: &Dataset) -> KanbanResult<()> {
        let data = JsonSerializer.serialize(dataset)?;
        self.store
            .save(StoreSnapshot {
                data,
                metadata: PersistenceMetadata::new(FORMAT_VERSION, Uuid::nil()),
            })
            .await?;
        Ok(())
    }

    /// Apply `mutate` to a copy, save it, then publish it.
    async fn commit<F, T>(&self, mutate: F) -> KanbanResult<T>
    where
        F: FnOnce(&mut Dataset) -> KanbanResult<T> + Send,
        T: Send,
    {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let output = mutate(&mut next)?;
        if let Err(e) = self.persist(&next).await {
            tracing::error!("Failed to save to {}: {}", self.store.path().display(), e);
            return Err(e);
        }
        *state = next;
        Ok(output)
    }
}

#[async_trait]
impl<S: PersistenceStore> Repository<BoardDocument, BoardId> for SnapshotRepository<S> {
    async fn find_by_id(&self, id: BoardId) -> KanbanResult<Option<BoardDocument>> {
        let state = self.state.read().await;
        Ok(state.boards.iter().find(|doc| doc.id() == id).cloned())
    }

    async fn find_all(&self) -> KanbanResult<Vec<BoardDocument>> {
        Ok(self.state.read().await.boards.clone())
    }

    async fn save(&self, entity: &BoardDocument) -> KanbanResult<BoardDocument> {
        let violations = entity.violations();
        if !violations.is_empty() {
            tracing::error!(board_id = %entity.id(), ?violations, "Refusing to save inconsistent board");
            return Err(KanbanError::Internal(format!(
                "board {} is inconsistent",
                entity.id()
            )));
        }

        self.commit(|dataset| {
            let mut saved = entity.clone();
            match dataset.boards.iter_mut().find(|doc| doc.id() == entity.id()) {
                Some(existing) => {
                    saved.version = existing.version + 1;
                    *existing = saved.clone();
                }
                None => {
                    saved.version = 1;
                    dataset.boards.push(saved.clone());
                }
            }
            tracing::debug!(board_id = %saved.id(), version = saved.version, "Saved board");
            Ok(saved)
        })
        .await
    }

    async fn delete(&self, id: BoardId) -> KanbanResult<()> {
        self.commit(|dataset| {
            let before = dataset.boards.len();
            dataset.boards.retain(|doc| doc.id() != id);
            if dataset.boards.len() == before {
                return Err(KanbanError::NotFound(format!("board {}", id)));
            }
            dataset.activity.retain(|record| record.board_id != id);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl<S: PersistenceStore> ActivityLog for SnapshotRepository<S> {
    async fn record(&self, record: ActivityRecord) -> KanbanResult<()> {
        self.commit(|dataset| {
            dataset.activity.push(record);
            Ok(())
        })
        .await
    }

    async fn recent(&self, board_id: BoardId, limit: usize) -> KanbanResult<Vec<ActivityRecord>> {
        let state = self.state.read().await;
        let mut records: Vec<ActivityRecord> = state
            .activity
            .iter()
            .filter(|record| record.board_id == board_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for equal timestamps; reverse for newest first.
        records.sort_by_key(|record| record.created_at);
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }
}

#[async_trait]
impl<S: PersistenceStore> UserDirectory for SnapshotRepository<S> {
    async fn summaries(&self, ids: &[UserId]) -> KanbanResult<Vec<UserSummary>> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .map(|id| {
                state
                    .users
                    .iter()
                    .find(|user| user.id == *id)
                    .cloned()
                    .unwrap_or_else(|| UserSummary::unknown(*id))
            })
            .collect())
    }

    async fn register(&self, user: UserSummary) -> KanbanResult<()> {
        self.commit(|dataset| {
            match dataset.users.iter_mut().find(|u| u.id == user.id) {
                Some(existing) => *existing = user,
                None => dataset.users.push(user),
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonEnvelope, JsonFileStore, MemoryStore};
    use kanban_domain::{ActivityAction, Board, Card, Column};
    use tempfile::tempdir;

    fn board_with_cards(titles: &[&str]) -> BoardDocument {
        let mut doc = BoardDocument::new(Board::new("Board".to_string(), Uuid::new_v4()));
        let column = Column::new(doc.id(), "Todo".to_string(), 1.0);
        let column_id = column.id;
        doc.columns.push(column);
        for title in titles {
            let position = doc.next_card_position(column_id);
            doc.push_card(Card::new(doc.id(), column_id, title.to_string(), position));
        }
        doc
    }

    #[tokio::test]
    async fn test_save_bumps_version_and_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boards.json");
        let doc = board_with_cards(&["A", "B"]);

        let repo = SnapshotRepository::open(JsonFileStore::new(&path)).await.unwrap();
        let first = repo.save(&doc).await.unwrap();
        let second = repo.save(&first).await.unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);

        let reopened = SnapshotRepository::open(JsonFileStore::new(&path)).await.unwrap();
        let loaded = reopened.find_by_id(doc.id()).await.unwrap().unwrap();
        assert_eq!(loaded, second);
    }

    #[tokio::test]
    async fn test_open_repairs_inconsistent_board() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("boards.json");
        let mut doc = board_with_cards(&["A", "B"]);
        let ghost = Uuid::new_v4();
        doc.columns[0].card_ids.push(ghost);
        doc.cards[1].position = 0.0;

        let dataset = Dataset {
            boards: vec![doc.clone()],
            ..Default::default()
        };
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            metadata: PersistenceMetadata::new(FORMAT_VERSION, Uuid::new_v4()),
            data: serde_json::to_value(&dataset).unwrap(),
        };
        std::fs::write(&path, serde_json::to_vec(&envelope).unwrap()).unwrap();

        let repo = SnapshotRepository::open(JsonFileStore::new(&path)).await.unwrap();
        let loaded = repo.find_by_id(doc.id()).await.unwrap().unwrap();

        assert!(loaded.violations().is_empty());
        assert!(!loaded.columns[0].card_ids.contains(&ghost));
    }

    #[tokio::test]
    async fn test_inconsistent_board_is_not_saved() {
        let repo = SnapshotRepository::open(MemoryStore::new()).await.unwrap();
        let mut doc = board_with_cards(&["A"]);
        doc.columns[0].card_ids.clear();

        let err = repo.save(&doc).await.unwrap_err();

        assert!(matches!(err, KanbanError::Internal(_)));
        assert!(repo.find_by_id(doc.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_write_is_not_visible() {
        let repo = SnapshotRepository::open(MemoryStore::new()).await.unwrap();
        let doc = repo.save(&board_with_cards(&["A"])).await.unwrap();

        repo.store().set_fail_writes(true);
        let mut changed = doc.clone();
        changed.board.update_title("Renamed".to_string());
        let err = repo.save(&changed).await.unwrap_err();

        assert!(err.is_retryable());
        let stored = repo.find_by_id(doc.id()).await.unwrap().unwrap();
        assert_eq!(stored.board.title, "Board");
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_board() {
        let repo = SnapshotRepository::open(MemoryStore::new()).await.unwrap();
        let err = repo.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, KanbanError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_recent_activity_is_newest_first_and_limited() {
        let repo = SnapshotRepository::open(MemoryStore::new()).await.unwrap();
        let board_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        for index in 0..5 {
            repo.record(ActivityRecord::new(
                board_id,
                user_id,
                ActivityAction::CardMoved,
                serde_json::json!({ "n": index }),
            ))
            .await
            .unwrap();
        }
        repo.record(ActivityRecord::new(
            Uuid::new_v4(),
            user_id,
            ActivityAction::BoardCreated,
            serde_json::Value::Null,
        ))
        .await
        .unwrap();

        let recent = repo.recent(board_id, 3).await.unwrap();

        let numbers: Vec<i64> = recent
            .iter()
            .map(|r| r.payload["n"].as_i64().unwrap())
            .collect();
        assert_eq!(numbers, vec![4, 3, 2]);
    }

    #[tokio::test]
    async fn test_summaries_fall_back_for_unknown_users() {
        let repo = SnapshotRepository::open(MemoryStore::new()).await.unwrap();
        let known = UserSummary {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            avatar_url: None,
        };
        repo.register(known.clone()).await.unwrap();
        let stranger = Uuid::new_v4();

        let summaries = repo.summaries(&[stranger, known.id]).await.unwrap();

        assert_eq!(summaries[0], UserSummary::unknown(stranger));
        assert_eq!(summaries[1], known);
    }
}
