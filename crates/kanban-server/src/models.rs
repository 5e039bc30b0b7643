use chrono::{DateTime, Utc};
use kanban_domain::{BoardRole, CardId, CardUpdate, ColumnId, FieldUpdate, UserId};
use serde::Deserialize;
use std::collections::BTreeSet;

#[derive(Debug, Deserialize)]
pub struct CreateBoard {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InviteMember {
    pub user_id: UserId,
    #[serde(default = "default_role")]
    pub role: BoardRole,
}

fn default_role() -> BoardRole {
    BoardRole::Member
}

#[derive(Debug, Deserialize)]
pub struct CreateList {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ReorderLists {
    pub ordered_ids: Vec<ColumnId>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderCard {
    pub card_id: CardId,
    pub new_index: usize,
}

/// Partial card update. Optional fields are cleared with the matching
/// `clear_*` flag since a JSON `null` cannot be told apart from "absent".
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCard {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub clear_description: bool,
    pub labels: Option<BTreeSet<String>>,
    pub assignees: Option<BTreeSet<UserId>>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clear_due_date: bool,
}

impl From<UpdateCard> for CardUpdate {
    fn from(input: UpdateCard) -> Self {
        CardUpdate {
            title: input.title,
            description: FieldUpdate::from_parts(input.description, input.clear_description),
            labels: input.labels,
            assignees: input.assignees,
            due_date: FieldUpdate::from_parts(input.due_date, input.clear_due_date),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_card_clear_flags() {
        let input: UpdateCard = serde_json::from_value(serde_json::json!({
            "title": "Renamed",
            "clear_due_date": true
        }))
        .unwrap();

        let update = CardUpdate::from(input);
        assert_eq!(update.title.as_deref(), Some("Renamed"));
        assert_eq!(update.description, FieldUpdate::NoChange);
        assert_eq!(update.due_date, FieldUpdate::Clear);
    }

    #[test]
    fn test_invite_defaults_to_member() {
        let input: InviteMember = serde_json::from_value(serde_json::json!({
            "user_id": uuid::Uuid::new_v4()
        }))
        .unwrap();
        assert_eq!(input.role, BoardRole::Member);
    }
}
