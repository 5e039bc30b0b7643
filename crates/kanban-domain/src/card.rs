use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::board::{BoardId, UserId};
use crate::column::ColumnId;
use crate::field_update::FieldUpdate;

pub type CardId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    pub column_id: ColumnId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub assignees: BTreeSet<UserId>,
    pub due_date: Option<DateTime<Utc>>,
    pub position: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload of a card about to be created. Placement is always end of column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCard {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub assignees: BTreeSet<UserId>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl NewCard {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial update of a card's payload. Ordering fields are deliberately absent:
/// they only change through a move.
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub labels: Option<BTreeSet<String>>,
    pub assignees: Option<BTreeSet<UserId>>,
    pub due_date: FieldUpdate<DateTime<Utc>>,
}

impl CardUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && !self.description.is_change()
            && self.labels.is_none()
            && self.assignees.is_none()
            && !self.due_date.is_change()
    }
}

impl Card {
    pub fn new(board_id: BoardId, column_id: ColumnId, title: String, position: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            column_id,
            title,
            description: None,
            labels: BTreeSet::new(),
            assignees: BTreeSet::new(),
            due_date: None,
            position,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn move_to_column(&mut self, column_id: ColumnId, position: f64) {
        self.column_id = column_id;
        self.position = position;
        self.updated_at = Utc::now();
    }

    pub fn update(&mut self, updates: CardUpdate) {
        if let Some(title) = updates.title {
            self.title = title;
        }
        updates.description.apply_to(&mut self.description);
        if let Some(labels) = updates.labels {
            self.labels = labels;
        }
        if let Some(assignees) = updates.assignees {
            self.assignees = assignees;
        }
        updates.due_date.apply_to(&mut self.due_date);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Card {
        Card::new(Uuid::new_v4(), Uuid::new_v4(), "Write docs".to_string(), 1.0)
    }

    #[test]
    fn test_update_leaves_ordering_alone() {
        let mut card = card();
        let column_id = card.column_id;

        card.update(CardUpdate {
            title: Some("Write better docs".to_string()),
            labels: Some(BTreeSet::from(["docs".to_string()])),
            ..Default::default()
        });

        assert_eq!(card.title, "Write better docs");
        assert!(card.labels.contains("docs"));
        assert_eq!(card.column_id, column_id);
        assert_eq!(card.position, 1.0);
    }

    #[test]
    fn test_update_clears_due_date() {
        let mut card = card();
        card.due_date = Some(Utc::now());
        card.description = Some("details".to_string());

        card.update(CardUpdate {
            due_date: FieldUpdate::Clear,
            ..Default::default()
        });

        assert!(card.due_date.is_none());
        assert_eq!(card.description.as_deref(), Some("details"));
    }

    #[test]
    fn test_move_to_column() {
        let mut card = card();
        let target = Uuid::new_v4();
        card.move_to_column(target, 2.5);

        assert_eq!(card.column_id, target);
        assert_eq!(card.position, 2.5);
    }

    #[test]
    fn test_empty_update() {
        assert!(CardUpdate::default().is_empty());
        assert!(!CardUpdate {
            due_date: FieldUpdate::Clear,
            ..Default::default()
        }
        .is_empty());
    }
}
