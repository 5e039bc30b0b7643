use async_trait::async_trait;
use kanban_core::KanbanResult;
use kanban_domain::{Actor, BoardId, ListView, MoveOutcome, MoveRequest};
use kanban_service::KanbanOperations;
use std::sync::Arc;

/// The network collaborator a drag session talks to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MoveTransport: Send + Sync {
    async fn move_card(&self, board_id: BoardId, request: MoveRequest) -> KanbanResult<MoveOutcome>;
    async fn fetch_lists(&self, board_id: BoardId) -> KanbanResult<Vec<ListView>>;
}

/// In-process transport calling the service directly as one fixed user.
pub struct LocalTransport {
    ops: Arc<dyn KanbanOperations>,
    actor: Actor,
}

impl LocalTransport {
    pub fn new(ops: Arc<dyn KanbanOperations>, actor: Actor) -> Self {
        Self { ops, actor }
    }
}

#[async_trait]
impl MoveTransport for LocalTransport {
    async fn move_card(&self, board_id: BoardId, request: MoveRequest) -> KanbanResult<MoveOutcome> {
        self.ops.move_card(&self.actor, board_id, request).await
    }

    async fn fetch_lists(&self, board_id: BoardId) -> KanbanResult<Vec<ListView>> {
        self.ops.board_lists(&self.actor, board_id).await
    }
}
