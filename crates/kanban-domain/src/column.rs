use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::BoardId;
use crate::card::CardId;

pub type ColumnId = Uuid;

/// A list on a board. `card_ids` is the authoritative card order; each card's
/// `column_id` and `position` are derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub title: String,
    pub position: f64,
    #[serde(default)]
    pub card_ids: Vec<CardId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Column {
    pub fn new(board_id: BoardId, title: String, position: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            title,
            position,
            card_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn update_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn update_position(&mut self, position: f64) {
        self.position = position;
        self.updated_at = Utc::now();
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.card_ids.contains(&card_id)
    }

    pub fn index_of(&self, card_id: CardId) -> Option<usize> {
        self.card_ids.iter().position(|id| *id == card_id)
    }

    /// Remove a card id. Absent ids are a no-op; returns whether anything changed.
    pub fn remove_card(&mut self, card_id: CardId) -> bool {
        let before = self.card_ids.len();
        self.card_ids.retain(|id| *id != card_id);
        let removed = self.card_ids.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Append a card id unless already present.
    pub fn push_card(&mut self, card_id: CardId) {
        if !self.contains(card_id) {
            self.card_ids.push(card_id);
            self.updated_at = Utc::now();
        }
    }
}
