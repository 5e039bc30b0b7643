use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::board::{BoardId, UserId};

pub type ActivityId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    BoardCreated,
    ListCreated,
    ListDeleted,
    ListsReordered,
    CardCreated,
    CardUpdated,
    CardDeleted,
    CardMoved,
    MemberInvited,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::BoardCreated => "board_created",
            ActivityAction::ListCreated => "list_created",
            ActivityAction::ListDeleted => "list_deleted",
            ActivityAction::ListsReordered => "lists_reordered",
            ActivityAction::CardCreated => "card_created",
            ActivityAction::CardUpdated => "card_updated",
            ActivityAction::CardDeleted => "card_deleted",
            ActivityAction::CardMoved => "card_moved",
            ActivityAction::MemberInvited => "member_invited",
        }
    }
}

impl std::fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a board's activity trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub board_id: BoardId,
    pub user_id: UserId,
    pub action: ActivityAction,
    #[serde(default)]
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

impl ActivityRecord {
    pub fn new(board_id: BoardId, user_id: UserId, action: ActivityAction, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            board_id,
            user_id,
            action,
            payload,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_wire_name_matches_as_str() {
        let value = serde_json::to_value(ActivityAction::CardMoved).unwrap();
        assert_eq!(value, json!("card_moved"));
        assert_eq!(ActivityAction::ListsReordered.to_string(), "lists_reordered");
    }

    #[test]
    fn test_record_carries_payload() {
        let record = ActivityRecord::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            ActivityAction::CardMoved,
            json!({ "destination_index": 0 }),
        );
        assert_eq!(record.payload["destination_index"], 0);
    }
}
