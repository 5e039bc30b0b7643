use serde::{de, Deserialize, Deserializer, Serialize};

use crate::card::CardId;
use crate::column::ColumnId;

/// Where a moved card should land in its destination column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Placement {
    /// 0-based index, counted after the card has left its old slot. Out of
    /// range values are clamped.
    Index { destination_index: usize },
    /// Between two named cards. Neither given means end of column.
    Neighbors {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        before_id: Option<CardId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        after_id: Option<CardId>,
    },
}

/// Wire fields of a placement. An index that is present must be a valid
/// `usize` and excludes neighbor ids.
#[derive(Deserialize)]
struct RawPlacement {
    #[serde(default)]
    destination_index: Option<usize>,
    #[serde(default)]
    before_id: Option<CardId>,
    #[serde(default)]
    after_id: Option<CardId>,
}

impl<'de> Deserialize<'de> for Placement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawPlacement::deserialize(deserializer)?;
        match (raw.destination_index, raw.before_id, raw.after_id) {
            (Some(destination_index), None, None) => Ok(Placement::Index { destination_index }),
            (Some(_), _, _) => Err(de::Error::custom(
                "destination_index cannot be combined with before_id or after_id",
            )),
            (None, before_id, after_id) => Ok(Placement::Neighbors { before_id, after_id }),
        }
    }
}

impl Placement {
    pub fn at(destination_index: usize) -> Self {
        Placement::Index { destination_index }
    }

    pub fn between(before_id: Option<CardId>, after_id: Option<CardId>) -> Self {
        Placement::Neighbors { before_id, after_id }
    }
}

/// A request to move one card. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub card_id: CardId,
    pub from_column_id: ColumnId,
    pub to_column_id: ColumnId,
    #[serde(flatten)]
    pub placement: Placement,
}

impl MoveRequest {
    pub fn to_index(
        card_id: CardId,
        from_column_id: ColumnId,
        to_column_id: ColumnId,
        destination_index: usize,
    ) -> Self {
        Self {
            card_id,
            from_column_id,
            to_column_id,
            placement: Placement::at(destination_index),
        }
    }

    pub fn is_reorder(&self) -> bool {
        self.from_column_id == self.to_column_id
    }

    pub fn destination_index(&self) -> Option<usize> {
        match self.placement {
            Placement::Index { destination_index } => Some(destination_index),
            Placement::Neighbors { .. } => None,
        }
    }
}
