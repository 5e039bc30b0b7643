use async_trait::async_trait;
use kanban_core::KanbanResult;
use kanban_domain::{
    ActivityRecord, Actor, Board, BoardId, BoardRole, CardId, CardUpdate, CardView, ColumnId,
    ListView, MoveOutcome, MoveRequest, NewCard, UserId,
};
use kanban_persistence::{PersistenceStore, SnapshotRepository};
use std::sync::Arc;

use crate::{BoardService, MoveCoordinator, ServiceConfig, ServiceContext};

/// Every board operation the outer surfaces expose.
/// The HTTP server, the CLI and the in-process client transport all go
/// through this trait, so adding an operation here forces all of them to
/// handle it.
#[async_trait]
pub trait KanbanOperations: Send + Sync {
    // Board operations
    async fn create_board(
        &self,
        actor: &Actor,
        title: String,
        description: Option<String>,
        background: Option<String>,
    ) -> KanbanResult<Board>;
    async fn boards(&self, actor: &Actor) -> KanbanResult<Vec<Board>>;
    async fn delete_board(&self, actor: &Actor, board_id: BoardId) -> KanbanResult<()>;
    async fn invite_member(
        &self,
        actor: &Actor,
        board_id: BoardId,
        user_id: UserId,
        role: BoardRole,
    ) -> KanbanResult<Board>;
    async fn activity(
        &self,
        actor: &Actor,
        board_id: BoardId,
        limit: Option<usize>,
    ) -> KanbanResult<Vec<ActivityRecord>>;

    // List operations
    async fn board_lists(&self, actor: &Actor, board_id: BoardId) -> KanbanResult<Vec<ListView>>;
    async fn create_list(&self, actor: &Actor, board_id: BoardId, title: String) -> KanbanResult<ListView>;
    async fn delete_list(&self, actor: &Actor, board_id: BoardId, list_id: ColumnId) -> KanbanResult<()>;
    async fn reorder_lists(
        &self,
        actor: &Actor,
        board_id: BoardId,
        ordered_ids: Vec<ColumnId>,
    ) -> KanbanResult<Vec<ListView>>;

    // Card operations
    async fn create_card(
        &self,
        actor: &Actor,
        board_id: BoardId,
        list_id: ColumnId,
        card: NewCard,
    ) -> KanbanResult<CardView>;
    async fn update_card(
        &self,
        actor: &Actor,
        board_id: BoardId,
        card_id: CardId,
        updates: CardUpdate,
    ) -> KanbanResult<CardView>;
    async fn delete_card(&self, actor: &Actor, board_id: BoardId, card_id: CardId) -> KanbanResult<()>;
    async fn move_card(&self, actor: &Actor, board_id: BoardId, request: MoveRequest) -> KanbanResult<MoveOutcome>;
    async fn reorder_card(
        &self,
        actor: &Actor,
        board_id: BoardId,
        list_id: ColumnId,
        card_id: CardId,
        new_index: usize,
    ) -> KanbanResult<MoveOutcome>;
}

/// [`KanbanOperations`] backed by a [`BoardService`] and a [`MoveCoordinator`]
/// sharing one context.
pub struct KanbanService {
    boards: BoardService,
    moves: MoveCoordinator,
}

impl KanbanService {
    pub fn new(context: Arc<ServiceContext>) -> Self {
        Self {
            boards: BoardService::new(context.clone()),
            moves: MoveCoordinator::new(context),
        }
    }

    /// Open `store` and serve everything from it.
    pub async fn open<S>(store: S, config: ServiceConfig) -> KanbanResult<Self>
    where
        S: PersistenceStore + 'static,
    {
        let repository = Arc::new(SnapshotRepository::open(store).await?);
        Ok(Self::new(Arc::new(ServiceContext::backed_by(repository, config))))
    }
}

#[async_trait]
impl KanbanOperations for KanbanService {
    async fn create_board(
        &self,
        actor: &Actor,
        title: String,
        description: Option<String>,
        background: Option<String>,
    ) -> KanbanResult<Board> {
        self.boards.create_board(actor, title, description, background).await
    }

    async fn boards(&self, actor: &Actor) -> KanbanResult<Vec<Board>> {
        self.boards.boards(actor).await
    }

    async fn delete_board(&self, actor: &Actor, board_id: BoardId) -> KanbanResult<()> {
        self.boards.delete_board(actor, board_id).await
    }

    async fn invite_member(
        &self,
        actor: &Actor,
        board_id: BoardId,
        user_id: UserId,
        role: BoardRole,
    ) -> KanbanResult<Board> {
        self.boards.invite_member(actor, board_id, user_id, role).await
    }

    async fn activity(
        &self,
        actor: &Actor,
        board_id: BoardId,
        limit: Option<usize>,
    ) -> KanbanResult<Vec<ActivityRecord>> {
        self.boards.activity(actor, board_id, limit).await
    }

    async fn board_lists(&self, actor: &Actor, board_id: BoardId) -> KanbanResult<Vec<ListView>> {
        self.boards.board_lists(actor, board_id).await
    }

    async fn create_list(&self, actor: &Actor, board_id: BoardId, title: String) -> KanbanResult<ListView> {
        self.boards.create_list(actor, board_id, title).await
    }

    async fn delete_list(&self, actor: &Actor, board_id: BoardId, list_id: ColumnId) -> KanbanResult<()> {
        self.boards.delete_list(actor, board_id, list_id).await
    }

    async fn reorder_lists(
        &self,
        actor: &Actor,
        board_id: BoardId,
        ordered_ids: Vec<ColumnId>,
    ) -> KanbanResult<Vec<ListView>> {
        self.boards.reorder_lists(actor, board_id, ordered_ids).await
    }

    async fn create_card(
        &self,
        actor: &Actor,
        board_id: BoardId,
        list_id: ColumnId,
        card: NewCard,
    ) -> KanbanResult<CardView> {
        self.boards.create_card(actor, board_id, list_id, card).await
    }

    async fn update_card(
        &self,
        actor: &Actor,
        board_id: BoardId,
        card_id: CardId,
        updates: CardUpdate,
    ) -> KanbanResult<CardView> {
        self.boards.update_card(actor, board_id, card_id, updates).await
    }

    async fn delete_card(&self, actor: &Actor, board_id: BoardId, card_id: CardId) -> KanbanResult<()> {
        self.boards.delete_card(actor, board_id, card_id).await
    }

    async fn move_card(&self, actor: &Actor, board_id: BoardId, request: MoveRequest) -> KanbanResult<MoveOutcome> {
        self.moves.move_card(actor, board_id, request).await
    }

    async fn reorder_card(
        &self,
        actor: &Actor,
        board_id: BoardId,
        list_id: ColumnId,
        card_id: CardId,
        new_index: usize,
    ) -> KanbanResult<MoveOutcome> {
        self.moves
            .reorder_within(actor, board_id, list_id, card_id, new_index)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_persistence::MemoryStore;

    #[tokio::test]
    async fn test_operations_share_one_board_state() {
        let service = KanbanService::open(MemoryStore::new(), ServiceConfig::default())
            .await
            .unwrap();
        let ops: &dyn KanbanOperations = &service;
        let actor = Actor::new(uuid::Uuid::new_v4());

        let board = ops
            .create_board(&actor, "Board".to_string(), None, None)
            .await
            .unwrap();
        let todo = ops.create_list(&actor, board.id, "Todo".to_string()).await.unwrap();
        let done = ops.create_list(&actor, board.id, "Done".to_string()).await.unwrap();
        let card = ops
            .create_card(&actor, board.id, todo.id, NewCard::titled("Ship"))
            .await
            .unwrap();

        let outcome = ops
            .move_card(&actor, board.id, MoveRequest::to_index(card.id, todo.id, done.id, 0))
            .await
            .unwrap();

        assert_eq!(outcome.card.column_id, done.id);
        let lists = ops.board_lists(&actor, board.id).await.unwrap();
        assert_eq!(lists, outcome.lists);
    }
}
