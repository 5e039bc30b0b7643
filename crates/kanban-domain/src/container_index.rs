//! In-memory view of one board: which container holds which items, in what
//! order.
//!
//! The server builds one from a [`BoardDocument`] for every move and writes
//! it back; the client builds one from the hydrated lists and mutates a copy
//! while a drag is in progress. Both go through [`ContainerIndex::move_item`],
//! so a reorder and a cross-container move share one code path.
//!
//! Invariant: inside each container, item positions are finite and strictly
//! increasing in array order.

use kanban_core::{KanbanError, KanbanResult};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::board::BoardId;
use crate::card::{Card, CardId};
use crate::column::ColumnId;
use crate::document::BoardDocument;
use crate::position::{Neighbors, PositionAllocator};
use crate::view::{CardView, ListView, Positioned};

#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub id: ColumnId,
    pub title: String,
    pub position: f64,
    items: Vec<CardId>,
}

impl Container {
    pub fn new(id: ColumnId, title: String, position: f64) -> Self {
        Self {
            id,
            title,
            position,
            items: Vec::new(),
        }
    }

    pub fn item_ids(&self) -> &[CardId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Where a moved item landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed {
    pub column_id: ColumnId,
    pub index: usize,
    pub position: f64,
    /// The destination had run out of room between neighbors and was
    /// renumbered `1..N` first.
    pub renumbered: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerIndex<T> {
    board_id: BoardId,
    containers: Vec<Container>,
    items: HashMap<CardId, T>,
}

fn slot_order<T: Positioned>(a: &T, b: &T) -> Ordering {
    a.position()
        .total_cmp(&b.position())
        .then_with(|| a.id().cmp(&b.id()))
}

impl<T: Positioned + Clone> ContainerIndex<T> {
    pub fn new(board_id: BoardId) -> Self {
        Self {
            board_id,
            containers: Vec::new(),
            items: HashMap::new(),
        }
    }

    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Containers in display order.
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn container(&self, id: ColumnId) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    pub fn item(&self, id: CardId) -> Option<&T> {
        self.items.get(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a container holding `items` in the given order. Positions that
    /// do not already increase strictly are renumbered.
    pub fn push_container(&mut self, mut container: Container, items: Vec<T>) {
        container.items = items.iter().map(Positioned::id).collect();
        let usable = PositionAllocator::is_strictly_increasing(items.iter().map(Positioned::position));
        for item in items {
            self.items.insert(item.id(), item);
        }
        self.containers.push(container);
        if !usable {
            self.renumber_at(self.containers.len() - 1);
        }
    }

    pub fn find_container_of(&self, item_id: CardId) -> KanbanResult<ColumnId> {
        self.index_of(item_id)
            .map(|(column_id, _)| column_id)
            .ok_or_else(|| KanbanError::NotFound(format!("card {}", item_id)))
    }

    pub fn index_of(&self, item_id: CardId) -> Option<(ColumnId, usize)> {
        self.containers.iter().find_map(|container| {
            container
                .items
                .iter()
                .position(|id| *id == item_id)
                .map(|index| (container.id, index))
        })
    }

    /// Items of a container in array order, which is the sort order: the
    /// array is kept ascending by position. Unknown containers yield nothing.
    pub fn ordered_items(&self, column_id: ColumnId) -> Vec<&T> {
        self.container(column_id)
            .map(|container| {
                container
                    .items
                    .iter()
                    .filter_map(|id| self.items.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every item id, container by container.
    pub fn all_item_ids(&self) -> Vec<CardId> {
        self.containers
            .iter()
            .flat_map(|c| c.items.iter().copied())
            .collect()
    }

    /// Detach an item. Absent ids are a no-op.
    pub fn remove_item(&mut self, item_id: CardId) -> Option<T> {
        for container in self.containers.iter_mut() {
            container.items.retain(|id| *id != item_id);
        }
        self.items.remove(&item_id)
    }

    /// Insert an item at the slot its position implies. Returns the index it
    /// landed at.
    pub fn insert_item(&mut self, mut item: T, column_id: ColumnId, position: f64) -> KanbanResult<usize> {
        let target = self.container_slot(column_id)?;
        self.remove_item(item.id());
        item.place(column_id, position);

        let items = &self.items;
        let index = self.containers[target].items.partition_point(|id| {
            items
                .get(id)
                .is_some_and(|existing| slot_order(existing, &item) == Ordering::Less)
        });
        self.containers[target].items.insert(index, item.id());
        self.items.insert(item.id(), item);
        Ok(index)
    }

    /// Move an item to `index` in `to` (clamped to the container length,
    /// counted after the item has left its old slot) and give it a position
    /// between its new neighbors.
    pub fn move_item(&mut self, item_id: CardId, to: ColumnId, index: usize) -> KanbanResult<Placed> {
        let target = self.container_slot(to)?;
        let item = self
            .remove_item(item_id)
            .ok_or_else(|| KanbanError::NotFound(format!("card {}", item_id)))?;
        Ok(self.place_at(item, target, index))
    }

    /// Move an item next to named neighbors in `to`. Fails with
    /// `StaleReference` without touching anything when a neighbor is not in
    /// `to` or the two are not adjacent.
    pub fn move_item_between(
        &mut self,
        item_id: CardId,
        to: ColumnId,
        before: Option<CardId>,
        after: Option<CardId>,
    ) -> KanbanResult<Placed> {
        let target = self.container_slot(to)?;
        if !self.items.contains_key(&item_id) {
            return Err(KanbanError::NotFound(format!("card {}", item_id)));
        }
        let index = self.resolve_slot(item_id, target, before, after)?;
        let item = self
            .remove_item(item_id)
            .ok_or_else(|| KanbanError::NotFound(format!("card {}", item_id)))?;
        Ok(self.place_at(item, target, index))
    }

    /// Reassign positions `1..N` in current order.
    pub fn renumber(&mut self, column_id: ColumnId) -> KanbanResult<()> {
        let target = self.container_slot(column_id)?;
        self.renumber_at(target);
        Ok(())
    }

    fn container_slot(&self, column_id: ColumnId) -> KanbanResult<usize> {
        self.containers
            .iter()
            .position(|c| c.id == column_id)
            .ok_or_else(|| KanbanError::InvalidContainer(format!("column {}", column_id)))
    }

    fn resolve_slot(
        &self,
        item_id: CardId,
        target: usize,
        before: Option<CardId>,
        after: Option<CardId>,
    ) -> KanbanResult<usize> {
        let members: Vec<CardId> = self.containers[target]
            .items
            .iter()
            .copied()
            .filter(|id| *id != item_id)
            .collect();
        let locate = |neighbor: CardId| {
            members
                .iter()
                .position(|id| *id == neighbor)
                .ok_or_else(|| KanbanError::StaleReference(format!("neighbor card {}", neighbor)))
        };

        match (before.map(locate).transpose()?, after.map(locate).transpose()?) {
            (None, None) => Ok(members.len()),
            (Some(b), None) => Ok(b + 1),
            (None, Some(a)) => Ok(a),
            (Some(b), Some(a)) if b + 1 == a => Ok(a),
            (Some(_), Some(_)) => Err(KanbanError::StaleReference(
                "neighbor cards are no longer adjacent".to_string(),
            )),
        }
    }

    fn neighbors_at(&self, target: usize, index: usize) -> Neighbors {
        let items = &self.containers[target].items;
        let position_of = |i: usize| items.get(i).and_then(|id| self.items.get(id)).map(Positioned::position);
        Neighbors::new(
            index.checked_sub(1).and_then(position_of),
            position_of(index),
        )
    }

    fn place_at(&mut self, mut item: T, target: usize, index: usize) -> Placed {
        let index = index.min(self.containers[target].items.len());
        let mut renumbered = false;
        let mut neighbors = self.neighbors_at(target, index);
        let mut position = PositionAllocator::allocate(neighbors);
        if !PositionAllocator::fits(neighbors, position) {
            self.renumber_at(target);
            renumbered = true;
            neighbors = self.neighbors_at(target, index);
            position = PositionAllocator::allocate(neighbors);
        }

        let column_id = self.containers[target].id;
        item.place(column_id, position);
        self.containers[target].items.insert(index, item.id());
        self.items.insert(item.id(), item);

        Placed {
            column_id,
            index,
            position,
            renumbered,
        }
    }

    fn renumber_at(&mut self, target: usize) {
        let container = &self.containers[target];
        for (id, position) in container
            .items
            .iter()
            .zip(PositionAllocator::renumbered(container.items.len()))
        {
            if let Some(item) = self.items.get_mut(id) {
                item.place(container.id, position);
            }
        }
    }
}

impl ContainerIndex<Card> {
    /// Build from a persisted board. Column arrays give the order.
    pub fn from_document(doc: &BoardDocument) -> Self {
        let cards: HashMap<CardId, &Card> = doc.cards.iter().map(|c| (c.id, c)).collect();
        let mut index = Self::new(doc.id());
        for column in doc.ordered_columns() {
            let items = column
                .card_ids
                .iter()
                .filter_map(|id| cards.get(id).map(|card| (*card).clone()))
                .collect();
            index.push_container(
                Container::new(column.id, column.title.clone(), column.position),
                items,
            );
        }
        index
    }

    /// Write membership and card placement back. The index is the whole
    /// truth: cards it no longer holds are dropped from the document.
    pub fn write_back(&self, doc: &mut BoardDocument) {
        for container in &self.containers {
            if let Some(column) = doc.column_mut(container.id) {
                if column.card_ids != container.items {
                    column.card_ids = container.items.clone();
                    column.updated_at = chrono::Utc::now();
                }
            }
        }
        doc.cards.retain(|card| self.items.contains_key(&card.id));
        for card in doc.cards.iter_mut() {
            if let Some(updated) = self.items.get(&card.id) {
                *card = updated.clone();
            }
        }
    }
}

impl ContainerIndex<CardView> {
    /// Build from hydrated lists, keeping the order they arrive in.
    pub fn from_lists(board_id: BoardId, lists: Vec<ListView>) -> Self {
        let mut index = Self::new(board_id);
        for list in lists {
            index.push_container(Container::new(list.id, list.title, list.position), list.cards);
        }
        index
    }

    pub fn to_lists(&self) -> Vec<ListView> {
        self.containers
            .iter()
            .map(|container| ListView {
                id: container.id,
                board_id: self.board_id,
                title: container.title.clone(),
                position: container.position,
                cards: self.ordered_items(container.id).into_iter().cloned().collect(),
            })
            .collect()
    }
}
