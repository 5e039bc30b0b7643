use kanban_core::{KanbanError, KanbanResult};
use serde::{Deserialize, Serialize};

use crate::board::{Board, BoardRole, UserId};

/// The user a call is made on behalf of. Identity is established upstream;
/// the role always comes from the board's member list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
}

impl Actor {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn role_on(&self, board: &Board) -> Option<BoardRole> {
        board.role_of(self.user_id)
    }

    pub fn require_member(&self, board: &Board) -> KanbanResult<BoardRole> {
        self.role_on(board).ok_or_else(|| {
            KanbanError::Forbidden(format!("user {} is not a member of board {}", self.user_id, board.id))
        })
    }

    pub fn require_owner(&self, board: &Board) -> KanbanResult<()> {
        match self.require_member(board)? {
            BoardRole::Owner => Ok(()),
            BoardRole::Member => Err(KanbanError::Forbidden(format!(
                "only an owner of board {} may do this",
                board.id
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_roles() {
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();
        let mut board = Board::new("Roadmap".to_string(), owner);
        board.upsert_member(member, BoardRole::Member);

        assert!(Actor::new(owner).require_owner(&board).is_ok());
        assert_eq!(Actor::new(member).require_member(&board).unwrap(), BoardRole::Member);
        assert!(matches!(
            Actor::new(member).require_owner(&board),
            Err(KanbanError::Forbidden(_))
        ));
        assert!(matches!(
            Actor::new(Uuid::new_v4()).require_member(&board),
            Err(KanbanError::Forbidden(_))
        ));
    }
}
