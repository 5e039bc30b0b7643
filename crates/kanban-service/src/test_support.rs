//! Shared fixtures for the service tests.

use async_trait::async_trait;
use kanban_core::{KanbanResult, Repository};
use kanban_domain::{
    ActivityRecord, Actor, BoardDocument, BoardId, BoardRole, CardId, ColumnId, NewCard,
};
use kanban_persistence::{ActivityLog, MemoryStore, SnapshotRepository};
use std::sync::Arc;
use uuid::Uuid;

use crate::{BoardService, MoveCoordinator, ServiceConfig, ServiceContext};

mockall::mock! {
    pub Activity {}

    #[async_trait]
    impl ActivityLog for Activity {
        async fn record(&self, record: ActivityRecord) -> KanbanResult<()>;
        async fn recent(&self, board_id: BoardId, limit: usize) -> KanbanResult<Vec<ActivityRecord>>;
    }
}

/// A memory-backed service with one board owned by `owner`.
pub struct Fixture {
    pub repository: Arc<SnapshotRepository<MemoryStore>>,
    pub context: Arc<ServiceContext>,
    pub owner: Actor,
    pub board_id: BoardId,
}

impl Fixture {
    pub async fn new() -> Self {
        let repository = Arc::new(
            SnapshotRepository::open(MemoryStore::new())
                .await
                .expect("open memory repository"),
        );
        let context = Arc::new(ServiceContext::backed_by(
            repository.clone(),
            ServiceConfig::default(),
        ));
        let owner = Actor::new(Uuid::new_v4());
        let board = BoardService::new(context.clone())
            .create_board(&owner, "Board".to_string(), None, None)
            .await
            .expect("create board");

        Self {
            repository,
            context,
            owner,
            board_id: board.id,
        }
    }

    pub fn service(&self) -> BoardService {
        BoardService::new(self.context.clone())
    }

    pub fn coordinator(&self) -> MoveCoordinator {
        MoveCoordinator::new(self.context.clone())
    }

    pub async fn column(&self, title: &str) -> ColumnId {
        self.column_on(self.board_id, title).await
    }

    pub async fn column_on(&self, board_id: BoardId, title: &str) -> ColumnId {
        self.service()
            .create_list(&self.owner, board_id, title.to_string())
            .await
            .expect("create list")
            .id
    }

    pub async fn card(&self, column_id: ColumnId, title: &str) -> CardId {
        self.service()
            .create_card(&self.owner, self.board_id, column_id, NewCard::titled(title))
            .await
            .expect("create card")
            .id
    }

    /// A second board in the same repository, owned by the same user.
    pub async fn other_board(&self) -> BoardId {
        self.service()
            .create_board(&self.owner, "Other".to_string(), None, None)
            .await
            .expect("create board")
            .id
    }

    /// A fresh user invited as a plain member.
    pub async fn member(&self) -> Actor {
        let member = Actor::new(Uuid::new_v4());
        self.service()
            .invite_member(&self.owner, self.board_id, member.user_id, BoardRole::Member)
            .await
            .expect("invite member");
        member
    }

    pub async fn document(&self) -> BoardDocument {
        self.repository
            .find_by_id(self.board_id)
            .await
            .expect("load board")
            .expect("board exists")
    }

    pub async fn activity(&self) -> Vec<ActivityRecord> {
        self.repository
            .recent(self.board_id, 100)
            .await
            .expect("load activity")
    }

    pub async fn assert_consistent(&self) {
        let doc = self.document().await;
        let violations = doc.violations();
        assert!(violations.is_empty(), "{:?}", violations);
    }
}
