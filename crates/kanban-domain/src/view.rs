//! Read models returned to clients: lists with their ordered cards, and cards
//! with assignee ids resolved to display information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::board::{BoardId, UserId};
use crate::card::{Card, CardId};
use crate::column::ColumnId;

/// Anything the container index can order: it has an id and a position, and
/// can be placed into a container.
pub trait Positioned {
    fn id(&self) -> CardId;
    fn position(&self) -> f64;
    fn place(&mut self, column_id: ColumnId, position: f64);
}

impl Positioned for Card {
    fn id(&self) -> CardId {
        self.id
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn place(&mut self, column_id: ColumnId, position: f64) {
        self.move_to_column(column_id, position);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl UserSummary {
    /// Placeholder for an id the directory does not know.
    pub fn unknown(id: UserId) -> Self {
        Self {
            id,
            name: id.to_string(),
            avatar_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub id: CardId,
    pub column_id: ColumnId,
    pub position: f64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub assignees: Vec<UserSummary>,
    pub due_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl CardView {
    pub fn new(card: &Card, assignees: Vec<UserSummary>) -> Self {
        Self {
            id: card.id,
            column_id: card.column_id,
            position: card.position,
            title: card.title.clone(),
            description: card.description.clone(),
            labels: card.labels.clone(),
            assignees,
            due_date: card.due_date,
            updated_at: card.updated_at,
        }
    }
}

impl Positioned for CardView {
    fn id(&self) -> CardId {
        self.id
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn place(&mut self, column_id: ColumnId, position: f64) {
        self.column_id = column_id;
        self.position = position;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListView {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub title: String,
    pub position: f64,
    #[serde(default)]
    pub cards: Vec<CardView>,
}

/// Result of a committed move: the card as it now is, plus every list of the
/// board so the client can replace its provisional state wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub card: CardView,
    pub lists: Vec<ListView>,
}
