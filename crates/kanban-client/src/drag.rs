//! Optimistic drag-and-drop over a board's lists.
//!
//! A [`DragSession`] keeps the last confirmed board state. While a card is
//! dragged it shows a provisional arrangement that is always rebuilt from
//! the pre-drag snapshot and the current hover target, so repeated hover
//! events never accumulate drift. Once dropped, the server's answer either
//! replaces the state or the session reverts to the snapshot.

use kanban_core::{KanbanError, KanbanResult};
use kanban_domain::{BoardId, CardId, CardView, ColumnId, ContainerIndex, ListView, MoveOutcome, MoveRequest};

use crate::transport::MoveTransport;

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// The column itself: the card goes to its end.
    Column(ColumnId),
    /// Another card: the dragged card takes that card's slot.
    Card(CardId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        card_id: CardId,
        from_column_id: ColumnId,
        hover: Option<DropTarget>,
    },
    /// Released over a target; the move request is in flight.
    Dropped { request: MoveRequest },
}

/// How a failed move should be handled by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The request was wrong for this board. Retrying will not help.
    Permanent,
    /// The server failed; the same request may succeed later.
    Retryable,
    /// The request may or may not have been applied.
    Indeterminate,
}

impl FailureClass {
    pub fn of(error: &KanbanError) -> Self {
        if error.is_indeterminate() {
            FailureClass::Indeterminate
        } else if error.is_retryable() {
            FailureClass::Retryable
        } else {
            FailureClass::Permanent
        }
    }
}

#[derive(Debug)]
pub enum Resolution {
    /// The server accepted the move; state now mirrors its lists.
    Confirmed(CardView),
    /// The move failed and the session is back on the pre-drag snapshot.
    Reverted { class: FailureClass, error: KanbanError },
    /// The outcome is unknown. The session shows the snapshot until the
    /// authoritative lists are fetched again.
    NeedsRefetch { error: KanbanError },
    /// Dropped where it already was. Nothing was sent.
    Unchanged,
}

pub struct DragSession {
    board_id: BoardId,
    current: ContainerIndex<CardView>,
    provisional: Option<ContainerIndex<CardView>>,
    state: DragState,
    needs_refetch: bool,
}

impl DragSession {
    pub fn new(board_id: BoardId, lists: Vec<ListView>) -> Self {
        Self {
            board_id,
            current: ContainerIndex::from_lists(board_id, lists),
            provisional: None,
            state: DragState::Idle,
            needs_refetch: false,
        }
    }

    pub fn board_id(&self) -> BoardId {
        self.board_id
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn needs_refetch(&self) -> bool {
        self.needs_refetch
    }

    /// Lists as they should be shown right now.
    pub fn lists(&self) -> Vec<ListView> {
        self.provisional.as_ref().unwrap_or(&self.current).to_lists()
    }

    pub fn card(&self, card_id: CardId) -> Option<&CardView> {
        self.provisional.as_ref().unwrap_or(&self.current).item(card_id)
    }

    /// Replace the confirmed state with freshly fetched lists.
    pub fn refresh(&mut self, lists: Vec<ListView>) {
        self.current = ContainerIndex::from_lists(self.board_id, lists);
        self.needs_refetch = false;
    }

    /// Begin dragging `card_id`. Only one drag may be active.
    pub fn start(&mut self, card_id: CardId) -> KanbanResult<()> {
        if self.state != DragState::Idle {
            return Err(KanbanError::Validation("a drag is already in progress".to_string()));
        }
        if self.needs_refetch {
            return Err(KanbanError::Validation(
                "board state must be refetched before dragging".to_string(),
            ));
        }
        let from_column_id = self.current.find_container_of(card_id)?;

        self.provisional = Some(self.current.clone());
        self.state = DragState::Dragging {
            card_id,
            from_column_id,
            hover: None,
        };
        tracing::debug!(%card_id, %from_column_id, "Drag started");
        Ok(())
    }

    /// Pointer moved over `target`. Rebuilds the provisional state from the
    /// snapshot; an unknown target leaves it untouched.
    pub fn hover(&mut self, target: DropTarget) -> KanbanResult<()> {
        let DragState::Dragging { card_id, .. } = self.state else {
            return Err(KanbanError::Validation("no drag in progress".to_string()));
        };
        let provisional = self.arrange(card_id, target)?;

        self.provisional = Some(provisional);
        if let DragState::Dragging { hover, .. } = &mut self.state {
            *hover = Some(target);
        }
        Ok(())
    }

    /// Release the card. Without a target the drag is cancelled and
    /// [`KanbanError::DragAborted`] is returned. A drop onto the card's own
    /// slot ends the drag with `None`. Otherwise the session enters
    /// `Dropped` and returns the request to send.
    pub fn drop_on(&mut self, target: Option<DropTarget>) -> KanbanResult<Option<MoveRequest>> {
        let DragState::Dragging {
            card_id,
            from_column_id,
            ..
        } = self.state
        else {
            return Err(KanbanError::Validation("no drag in progress".to_string()));
        };
        let Some(target) = target else {
            return Err(self.abort());
        };

        let provisional = match self.arrange(card_id, target) {
            Ok(provisional) => provisional,
            Err(e) => {
                tracing::debug!(%card_id, "Drop on unknown target: {}", e);
                return Err(self.abort());
            }
        };
        let (to_column_id, destination_index) = provisional
            .index_of(card_id)
            .ok_or_else(|| KanbanError::Internal(format!("card {} lost during drag", card_id)))?;

        if self.current.index_of(card_id) == Some((to_column_id, destination_index)) {
            tracing::debug!(%card_id, "Dropped in place");
            self.provisional = None;
            self.state = DragState::Idle;
            return Ok(None);
        }

        let request = MoveRequest::to_index(card_id, from_column_id, to_column_id, destination_index);
        self.provisional = Some(provisional);
        self.state = DragState::Dropped { request };
        Ok(Some(request))
    }

    /// Explicit cancel (e.g. escape). Reports [`KanbanError::DragAborted`]
    /// when a drag was active.
    pub fn cancel(&mut self) -> KanbanResult<()> {
        match self.state {
            DragState::Dragging { .. } => Err(self.abort()),
            DragState::Idle => Ok(()),
            DragState::Dropped { .. } => Err(KanbanError::Validation(
                "cannot cancel a move already sent".to_string(),
            )),
        }
    }

    /// Reconcile the in-flight move with the server's answer.
    pub fn resolve(&mut self, result: KanbanResult<MoveOutcome>) -> KanbanResult<Resolution> {
        let DragState::Dropped { request } = self.state else {
            return Err(KanbanError::Validation("no move in flight".to_string()));
        };
        self.state = DragState::Idle;
        self.provisional = None;

        let resolution = match result {
            Ok(outcome) => {
                self.current = ContainerIndex::from_lists(self.board_id, outcome.lists);
                Resolution::Confirmed(outcome.card)
            }
            Err(error) => match FailureClass::of(&error) {
                FailureClass::Indeterminate => {
                    tracing::warn!(card_id = %request.card_id, "Move outcome unknown: {}", error);
                    self.needs_refetch = true;
                    Resolution::NeedsRefetch { error }
                }
                class => {
                    tracing::warn!(card_id = %request.card_id, ?class, "Move failed: {}", error);
                    Resolution::Reverted { class, error }
                }
            },
        };
        Ok(resolution)
    }

    /// Drop on `target`, send the move and reconcile. An indeterminate
    /// outcome triggers one refetch of the board's lists.
    pub async fn commit(
        &mut self,
        transport: &dyn MoveTransport,
        target: Option<DropTarget>,
    ) -> KanbanResult<Resolution> {
        let Some(request) = self.drop_on(target)? else {
            return Ok(Resolution::Unchanged);
        };
        let result = transport.move_card(self.board_id, request).await;
        let resolution = self.resolve(result)?;

        if let Resolution::NeedsRefetch { .. } = resolution {
            match transport.fetch_lists(self.board_id).await {
                Ok(lists) => self.refresh(lists),
                Err(e) => tracing::warn!(board_id = %self.board_id, "Refetch failed: {}", e),
            }
        }
        Ok(resolution)
    }

    fn abort(&mut self) -> KanbanError {
        self.provisional = None;
        self.state = DragState::Idle;
        KanbanError::DragAborted
    }

    /// Snapshot with `card_id` moved to the slot `target` designates.
    fn arrange(&self, card_id: CardId, target: DropTarget) -> KanbanResult<ContainerIndex<CardView>> {
        let mut arranged = self.current.clone();
        let (column_id, index) = match target {
            DropTarget::Column(column_id) => (column_id, usize::MAX),
            DropTarget::Card(over) if over == card_id => return Ok(arranged),
            DropTarget::Card(over) => self
                .current
                .index_of(over)
                .ok_or_else(|| KanbanError::NotFound(format!("card {}", over)))?,
        };
        arranged.move_item(card_id, column_id, index)?;
        Ok(arranged)
    }
}
