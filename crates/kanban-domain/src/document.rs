//! A board together with its columns and cards, persisted as one unit.
//!
//! Keeping the whole board in one document means a move is a single-document
//! write: the column arrays and the card back-references can never be saved
//! half-way.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::board::{Board, BoardId};
use crate::card::{Card, CardId};
use crate::column::{Column, ColumnId};
use crate::position::PositionAllocator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardDocument {
    pub board: Board,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub cards: Vec<Card>,
    /// Bumped by the repository on every save.
    #[serde(default)]
    pub version: u64,
}

/// What [`BoardDocument::reconcile`] had to repair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub dangling_ids_dropped: usize,
    pub duplicate_ids_dropped: usize,
    pub orphans_attached: usize,
    pub orphans_dropped: usize,
    pub back_references_fixed: usize,
    pub columns_renumbered: usize,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

impl BoardDocument {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            columns: Vec::new(),
            cards: Vec::new(),
            version: 0,
        }
    }

    pub fn id(&self) -> BoardId {
        self.board.id
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == id)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Columns in display order (position, then id).
    pub fn ordered_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by(|a, b| a.position.total_cmp(&b.position).then(a.id.cmp(&b.id)));
        columns
    }

    /// The column whose array holds the card.
    pub fn column_holding(&self, card_id: CardId) -> Option<ColumnId> {
        self.columns
            .iter()
            .find(|c| c.contains(card_id))
            .map(|c| c.id)
    }

    pub fn next_column_position(&self) -> f64 {
        PositionAllocator::allocate_end(self.columns.iter().map(|c| c.position))
    }

    pub fn next_card_position(&self, column_id: ColumnId) -> f64 {
        let positions = self
            .column(column_id)
            .map(|column| {
                column
                    .card_ids
                    .iter()
                    .filter_map(|id| self.card(*id))
                    .map(|card| card.position)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        PositionAllocator::allocate_end(positions)
    }

    /// Append a card to the end of its column. The caller has already chosen
    /// `card.column_id` and `card.position`.
    pub fn push_card(&mut self, card: Card) -> bool {
        match self.column_mut(card.column_id) {
            Some(column) => {
                column.push_card(card.id);
                self.cards.push(card);
                true
            }
            None => false,
        }
    }

    /// Remove a card and every reference to it. Remaining cards keep their
    /// positions; the gap is harmless.
    pub fn remove_card(&mut self, card_id: CardId) -> Option<Card> {
        for column in self.columns.iter_mut() {
            column.remove_card(card_id);
        }
        let index = self.cards.iter().position(|c| c.id == card_id)?;
        Some(self.cards.remove(index))
    }

    /// Remove a column together with the cards it holds.
    pub fn remove_column(&mut self, column_id: ColumnId) -> Option<(Column, Vec<Card>)> {
        let index = self.columns.iter().position(|c| c.id == column_id)?;
        let column = self.columns.remove(index);
        let held: HashSet<CardId> = column.card_ids.iter().copied().collect();
        let (removed, kept): (Vec<Card>, Vec<Card>) = std::mem::take(&mut self.cards)
            .into_iter()
            .partition(|card| held.contains(&card.id) || card.column_id == column_id);
        self.cards = kept;
        Some((column, removed))
    }

    /// Make the derived fields agree with the column arrays.
    ///
    /// The arrays are the source of truth. Ids that point at missing cards or
    /// appear twice are dropped, cards no array mentions are appended to the
    /// column they reference (or the first column), `column_id` is rewritten
    /// from the arrays, and columns whose positions are not strictly
    /// increasing are renumbered `1..N`.
    pub fn reconcile(&mut self) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let known: HashSet<CardId> = self.cards.iter().map(|c| c.id).collect();
        let mut seen: HashSet<CardId> = HashSet::new();

        let mut order: Vec<usize> = (0..self.columns.len()).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&self.columns[a], &self.columns[b]);
            a.position.total_cmp(&b.position).then(a.id.cmp(&b.id))
        });

        for &i in &order {
            self.columns[i].card_ids.retain(|id| {
                if !known.contains(id) {
                    report.dangling_ids_dropped += 1;
                    false
                } else if !seen.insert(*id) {
                    report.duplicate_ids_dropped += 1;
                    false
                } else {
                    true
                }
            });
        }

        let orphans: Vec<(CardId, ColumnId)> = self
            .cards
            .iter()
            .filter(|c| !seen.contains(&c.id))
            .map(|c| (c.id, c.column_id))
            .collect();
        let mut dropped: HashSet<CardId> = HashSet::new();
        for (card_id, column_id) in orphans {
            let target = self
                .columns
                .iter()
                .position(|c| c.id == column_id)
                .or_else(|| order.first().copied());
            match target {
                Some(i) => {
                    self.columns[i].card_ids.push(card_id);
                    report.orphans_attached += 1;
                }
                None => {
                    dropped.insert(card_id);
                    report.orphans_dropped += 1;
                }
            }
        }
        self.cards.retain(|c| !dropped.contains(&c.id));

        let holders: HashMap<CardId, ColumnId> = self
            .columns
            .iter()
            .flat_map(|column| column.card_ids.iter().map(move |id| (*id, column.id)))
            .collect();
        for card in self.cards.iter_mut() {
            if let Some(&holder) = holders.get(&card.id) {
                if card.column_id != holder {
                    card.column_id = holder;
                    report.back_references_fixed += 1;
                }
            }
        }

        let slots: HashMap<CardId, usize> = self
            .cards
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();
        for column in &self.columns {
            let positions: Vec<f64> = column
                .card_ids
                .iter()
                .map(|id| self.cards[slots[id]].position)
                .collect();
            if PositionAllocator::is_strictly_increasing(positions) {
                continue;
            }
            for (id, position) in column
                .card_ids
                .iter()
                .zip(PositionAllocator::renumbered(column.card_ids.len()))
            {
                self.cards[slots[id]].position = position;
            }
            report.columns_renumbered += 1;
        }

        report
    }

    /// Every way the document breaks the ordering and membership invariants.
    /// Empty means consistent.
    pub fn violations(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut holders: HashMap<CardId, Vec<ColumnId>> = HashMap::new();

        for column in &self.columns {
            if column.board_id != self.board.id {
                problems.push(format!("column {} belongs to another board", column.id));
            }
            let mut previous: Option<f64> = None;
            for id in &column.card_ids {
                holders.entry(*id).or_default().push(column.id);
                let Some(card) = self.card(*id) else {
                    problems.push(format!("column {} lists missing card {}", column.id, id));
                    continue;
                };
                if card.column_id != column.id {
                    problems.push(format!(
                        "card {} is listed by column {} but points at {}",
                        id, column.id, card.column_id
                    ));
                }
                if previous.is_some_and(|p| card.position <= p) {
                    problems.push(format!(
                        "card {} in column {} is out of position order",
                        id, column.id
                    ));
                }
                previous = Some(card.position);
            }
        }

        for card in &self.cards {
            match holders.get(&card.id).map(Vec::as_slice) {
                None | Some([]) => problems.push(format!("card {} is in no column", card.id)),
                Some([_]) => {}
                Some(many) => problems.push(format!(
                    "card {} is listed by {} columns",
                    card.id,
                    many.len()
                )),
            }
        }

        problems
    }
}
