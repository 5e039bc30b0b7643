use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type BoardId = Uuid;
pub type UserId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardRole {
    Owner,
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Private,
    Workspace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: UserId,
    pub role: BoardRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub workspace_id: Option<Uuid>,
    /// Color or image reference.
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub members: Vec<Member>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(title: String, owner: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            visibility: Visibility::Private,
            workspace_id: None,
            background: None,
            members: vec![Member {
                user_id: owner,
                role: BoardRole::Owner,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn role_of(&self, user_id: UserId) -> Option<BoardRole> {
        self.members
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.role)
    }

    /// Add a member, or change the role of an existing one.
    pub fn upsert_member(&mut self, user_id: UserId, role: BoardRole) {
        match self.members.iter_mut().find(|m| m.user_id == user_id) {
            Some(member) => member.role = role,
            None => self.members.push(Member { user_id, role }),
        }
        self.updated_at = Utc::now();
    }

    pub fn update_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn update_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Utc::now();
    }

    pub fn set_background(&mut self, background: Option<String>) {
        self.background = background;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_is_owner() {
        let owner = Uuid::new_v4();
        let board = Board::new("Roadmap".to_string(), owner);

        assert_eq!(board.role_of(owner), Some(BoardRole::Owner));
        assert_eq!(board.role_of(Uuid::new_v4()), None);
    }

    #[test]
    fn test_upsert_member() {
        let owner = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let mut board = Board::new("Roadmap".to_string(), owner);

        board.upsert_member(guest, BoardRole::Member);
        assert_eq!(board.role_of(guest), Some(BoardRole::Member));
        assert_eq!(board.members.len(), 2);

        board.upsert_member(guest, BoardRole::Owner);
        assert_eq!(board.role_of(guest), Some(BoardRole::Owner));
        assert_eq!(board.members.len(), 2);
    }

    #[test]
    fn test_legacy_board_without_members_deserializes() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "title": "Old",
            "description": null,
            "created_at": Utc::now(),
            "updated_at": Utc::now(),
        });
        let board: Board = serde_json::from_value(json).unwrap();
        assert!(board.members.is_empty());
        assert_eq!(board.visibility, Visibility::Private);
    }
}
