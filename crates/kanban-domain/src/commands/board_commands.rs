use super::{Command, CommandContext};
use crate::board::{BoardRole, UserId};
use kanban_core::KanbanResult;

/// Add a user to the board. Existing members keep the role they have.
pub struct InviteMember {
    pub user_id: UserId,
    pub role: BoardRole,
}

impl Command for InviteMember {
    fn execute(&self, context: &mut CommandContext) -> KanbanResult<()> {
        let board = &mut context.document.board;
        if board.role_of(self.user_id).is_none() {
            board.upsert_member(self.user_id, self.role);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Invite {} as {:?}", self.user_id, self.role)
    }
}
