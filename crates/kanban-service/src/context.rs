use kanban_core::{KanbanError, KanbanResult, Repository};
use kanban_domain::commands::{Command, CommandContext};
use kanban_domain::{
    ActivityAction, ActivityRecord, Actor, BoardDocument, BoardId, BoardRole, CardId, CardView,
    ListView, UserId, UserSummary,
};
use kanban_persistence::{ActivityLog, BoardRepository, PersistenceStore, SnapshotRepository, UserDirectory};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

use crate::config::ServiceConfig;
use crate::locks::BoardLocks;

/// Collaborators shared by the board service and the move coordinator.
pub struct ServiceContext {
    pub boards: Arc<dyn BoardRepository>,
    pub activity: Arc<dyn ActivityLog>,
    pub users: Arc<dyn UserDirectory>,
    pub config: ServiceConfig,
    locks: BoardLocks,
}

impl ServiceContext {
    pub fn new(
        boards: Arc<dyn BoardRepository>,
        activity: Arc<dyn ActivityLog>,
        users: Arc<dyn UserDirectory>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            boards,
            activity,
            users,
            locks: BoardLocks::new(config.serialize_moves),
            config,
        }
    }

    /// All three collaborators served by one snapshot repository.
    pub fn backed_by<S>(repository: Arc<SnapshotRepository<S>>, config: ServiceConfig) -> Self
    where
        S: PersistenceStore + 'static,
    {
        Self::new(repository.clone(), repository.clone(), repository, config)
    }

    pub async fn lock(&self, board_id: BoardId) -> Option<OwnedMutexGuard<()>> {
        self.locks.acquire(board_id).await
    }

    pub(crate) fn forget_lock(&self, board_id: BoardId) {
        self.locks.forget(board_id);
    }

    pub async fn load(&self, board_id: BoardId) -> KanbanResult<BoardDocument> {
        self.boards
            .find_by_id(board_id)
            .await?
            .ok_or_else(|| KanbanError::NotFound(format!("board {}", board_id)))
    }

    /// Load a board the actor belongs to, with the actor's role on it.
    pub async fn load_for(&self, actor: &Actor, board_id: BoardId) -> KanbanResult<(BoardDocument, BoardRole)> {
        let doc = self.load(board_id).await?;
        let role = actor.require_member(&doc.board)?;
        Ok((doc, role))
    }

    pub fn execute(&self, doc: &mut BoardDocument, command: Box<dyn Command>) -> KanbanResult<()> {
        tracing::debug!(board_id = %doc.id(), "{}", command.description());
        command.execute(&mut CommandContext::new(doc))
    }

    pub async fn save(&self, doc: &BoardDocument) -> KanbanResult<BoardDocument> {
        self.boards.save(doc).await
    }

    /// Write an activity record. Failures are logged and swallowed.
    pub async fn log(&self, board_id: BoardId, actor: &Actor, action: ActivityAction, payload: Value) {
        let record = ActivityRecord::new(board_id, actor.user_id, action, payload);
        if let Err(e) = self.activity.record(record).await {
            tracing::warn!(%board_id, %action, "Failed to record activity: {}", e);
        }
    }

    async fn summaries(&self, ids: &BTreeSet<UserId>) -> HashMap<UserId, UserSummary> {
        let ids: Vec<UserId> = ids.iter().copied().collect();
        let summaries = match self.users.summaries(&ids).await {
            Ok(summaries) => summaries,
            Err(e) => {
                tracing::warn!("Failed to resolve assignees: {}", e);
                ids.iter().copied().map(UserSummary::unknown).collect()
            }
        };
        summaries.into_iter().map(|s| (s.id, s)).collect()
    }

    fn card_view_with(
        doc: &BoardDocument,
        card_id: CardId,
        summaries: &HashMap<UserId, UserSummary>,
    ) -> Option<CardView> {
        let card = doc.card(card_id)?;
        let assignees = card
            .assignees
            .iter()
            .map(|id| summaries.get(id).cloned().unwrap_or_else(|| UserSummary::unknown(*id)))
            .collect();
        Some(CardView::new(card, assignees))
    }

    pub async fn card_view(&self, doc: &BoardDocument, card_id: CardId) -> KanbanResult<CardView> {
        let card = doc
            .card(card_id)
            .ok_or_else(|| KanbanError::NotFound(format!("card {}", card_id)))?;
        let summaries = self.summaries(&card.assignees).await;
        Self::card_view_with(doc, card_id, &summaries)
            .ok_or_else(|| KanbanError::NotFound(format!("card {}", card_id)))
    }

    /// Lists in display order, each with its cards in array order.
    pub async fn hydrate(&self, doc: &BoardDocument) -> KanbanResult<Vec<ListView>> {
        let assignees: BTreeSet<UserId> = doc
            .cards
            .iter()
            .flat_map(|card| card.assignees.iter().copied())
            .collect();
        let summaries = self.summaries(&assignees).await;

        Ok(doc
            .ordered_columns()
            .into_iter()
            .map(|column| ListView {
                id: column.id,
                board_id: doc.id(),
                title: column.title.clone(),
                position: column.position,
                cards: column
                    .card_ids
                    .iter()
                    .filter_map(|id| Self::card_view_with(doc, *id, &summaries))
                    .collect(),
            })
            .collect())
    }
}
