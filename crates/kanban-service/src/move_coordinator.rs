//! Server authority for card moves.
//!
//! The client's proposed position is never trusted: the coordinator loads the
//! board, splices the card id between column arrays, allocates a position
//! from the destination's current neighbors and saves the whole board as one
//! document. Moving a card that already left its source column is not an
//! error, so retried requests are safe.

use kanban_core::{KanbanError, KanbanResult};
use kanban_domain::{
    ActivityAction, Actor, BoardDocument, BoardId, Card, CardId, ColumnId, ContainerIndex,
    MoveOutcome, MoveRequest, Placed, Placement,
};
use serde_json::json;
use std::sync::Arc;

use crate::context::ServiceContext;

pub struct MoveCoordinator {
    context: Arc<ServiceContext>,
}

impl MoveCoordinator {
    pub fn new(context: Arc<ServiceContext>) -> Self {
        Self { context }
    }

    /// Move a card within or across columns of one board.
    pub async fn move_card(&self, actor: &Actor, board_id: BoardId, request: MoveRequest) -> KanbanResult<MoveOutcome> {
        self.commit(actor, board_id, request, false).await
    }

    /// Change a card's index inside the column it is already in.
    pub async fn reorder_within(
        &self,
        actor: &Actor,
        board_id: BoardId,
        column_id: ColumnId,
        card_id: CardId,
        new_index: usize,
    ) -> KanbanResult<MoveOutcome> {
        let request = MoveRequest::to_index(card_id, column_id, column_id, new_index);
        self.commit(actor, board_id, request, true).await
    }

    async fn commit(
        &self,
        actor: &Actor,
        board_id: BoardId,
        request: MoveRequest,
        must_be_in_source: bool,
    ) -> KanbanResult<MoveOutcome> {
        let _guard = self.context.lock(board_id).await;
        let (mut doc, _role) = self.context.load_for(actor, board_id).await?;

        Self::validate(&doc, &request, must_be_in_source)?;

        let mut index = ContainerIndex::from_document(&doc);
        let placed = Self::place(&mut index, &request)?;
        index.write_back(&mut doc);

        let saved = self.context.save(&doc).await?;
        tracing::info!(
            %board_id,
            card_id = %request.card_id,
            to_column_id = %placed.column_id,
            index = placed.index,
            position = placed.position,
            renumbered = placed.renumbered,
            "Moved card"
        );

        self.context
            .log(
                board_id,
                actor,
                ActivityAction::CardMoved,
                json!({
                    "card_id": request.card_id,
                    "from_column_id": request.from_column_id,
                    "to_column_id": placed.column_id,
                    "destination_index": placed.index,
                }),
            )
            .await;

        Ok(MoveOutcome {
            card: self.context.card_view(&saved, request.card_id).await?,
            lists: self.context.hydrate(&saved).await?,
        })
    }

    fn validate(doc: &BoardDocument, request: &MoveRequest, must_be_in_source: bool) -> KanbanResult<()> {
        if doc.card(request.card_id).is_none() {
            return Err(KanbanError::NotFound(format!("card {}", request.card_id)));
        }
        let source = doc.column(request.from_column_id).ok_or_else(|| {
            KanbanError::InvalidContainer(format!(
                "list {} is not on board {}",
                request.from_column_id,
                doc.id()
            ))
        })?;
        if doc.column(request.to_column_id).is_none() {
            return Err(KanbanError::InvalidContainer(format!(
                "list {} is not on board {}",
                request.to_column_id,
                doc.id()
            )));
        }
        if must_be_in_source && !source.contains(request.card_id) {
            return Err(KanbanError::InvalidContainer(format!(
                "card {} is not in list {}",
                request.card_id, source.id
            )));
        }
        Ok(())
    }

    fn place(index: &mut ContainerIndex<Card>, request: &MoveRequest) -> KanbanResult<Placed> {
        match request.placement {
            Placement::Index { destination_index } => {
                index.move_item(request.card_id, request.to_column_id, destination_index)
            }
            Placement::Neighbors { before_id, after_id } => {
                match index.move_item_between(request.card_id, request.to_column_id, before_id, after_id) {
                    Err(KanbanError::StaleReference(reason)) => {
                        tracing::warn!(
                            card_id = %request.card_id,
                            "Neighbors no longer valid ({}), placing at end of list",
                            reason
                        );
                        index.move_item(request.card_id, request.to_column_id, usize::MAX)
                    }
                    other => other,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::test_support::{Fixture, MockActivity};
    use kanban_core::Repository;
    use kanban_domain::UserSummary;
    use kanban_persistence::UserDirectory;
    use uuid::Uuid;

    fn ids(outcome: &MoveOutcome, column_id: ColumnId) -> Vec<CardId> {
        outcome
            .lists
            .iter()
            .find(|l| l.id == column_id)
            .map(|l| l.cards.iter().map(|c| c.id).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_move_to_empty_list() {
        let fx = Fixture::new().await;
        let (l1, l2) = (fx.column("L1").await, fx.column("L2").await);
        let c1 = fx.card(l1, "C1").await;
        let c2 = fx.card(l1, "C2").await;

        let outcome = fx
            .coordinator()
            .move_card(&fx.owner, fx.board_id, MoveRequest::to_index(c1, l1, l2, 0))
            .await
            .unwrap();

        assert_eq!(ids(&outcome, l1), vec![c2]);
        assert_eq!(ids(&outcome, l2), vec![c1]);
        assert_eq!(outcome.card.position, 1.0);
        assert_eq!(outcome.card.column_id, l2);
        fx.assert_consistent().await;
    }

    #[tokio::test]
    async fn test_reorder_to_front() {
        let fx = Fixture::new().await;
        let l1 = fx.column("L1").await;
        let c1 = fx.card(l1, "C1").await;
        let c2 = fx.card(l1, "C2").await;
        let c3 = fx.card(l1, "C3").await;

        let outcome = fx
            .coordinator()
            .move_card(&fx.owner, fx.board_id, MoveRequest::to_index(c3, l1, l1, 0))
            .await
            .unwrap();

        assert_eq!(ids(&outcome, l1), vec![c3, c1, c2]);
        assert!(outcome.card.position < 1.0);
        assert_eq!(outcome.card.position, 0.5);
    }

    #[tokio::test]
    async fn test_destination_on_other_board_changes_nothing() {
        let fx = Fixture::new().await;
        let l1 = fx.column("L1").await;
        let c1 = fx.card(l1, "C1").await;
        let other_board = fx.other_board().await;
        let elsewhere = fx.column_on(other_board, "Elsewhere").await;
        let before = fx.document().await;

        let err = fx
            .coordinator()
            .move_card(&fx.owner, fx.board_id, MoveRequest::to_index(c1, l1, elsewhere, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, KanbanError::InvalidContainer(_)));
        assert_eq!(fx.document().await, before);
    }

    #[tokio::test]
    async fn test_two_inserts_between_same_neighbors() {
        let fx = Fixture::new().await;
        let (l1, l2) = (fx.column("L1").await, fx.column("L2").await);
        let a = fx.card(l1, "A").await;
        let b = fx.card(l1, "B").await;
        let x = fx.card(l2, "X").await;
        let y = fx.card(l2, "Y").await;
        let coordinator = fx.coordinator();

        let first = coordinator
            .move_card(&fx.owner, fx.board_id, MoveRequest::to_index(x, l2, l1, 1))
            .await
            .unwrap();
        let second = coordinator
            .move_card(&fx.owner, fx.board_id, MoveRequest::to_index(y, l2, l1, 2))
            .await
            .unwrap();

        assert_eq!(ids(&second, l1), vec![a, x, y, b]);
        assert!(1.0 < first.card.position && first.card.position < second.card.position);
        assert!(second.card.position < 2.0);
    }

    #[tokio::test]
    async fn test_repeated_move_keeps_single_membership() {
        let fx = Fixture::new().await;
        let (l1, l2) = (fx.column("L1").await, fx.column("L2").await);
        let c1 = fx.card(l1, "C1").await;
        let request = MoveRequest::to_index(c1, l1, l2, 0);
        let coordinator = fx.coordinator();

        coordinator.move_card(&fx.owner, fx.board_id, request).await.unwrap();
        let outcome = coordinator.move_card(&fx.owner, fx.board_id, request).await.unwrap();

        assert_eq!(ids(&outcome, l2), vec![c1]);
        assert!(ids(&outcome, l1).is_empty());
        fx.assert_consistent().await;
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_clamped() {
        let fx = Fixture::new().await;
        let (l1, l2) = (fx.column("L1").await, fx.column("L2").await);
        let c1 = fx.card(l1, "C1").await;
        let c2 = fx.card(l2, "C2").await;

        let outcome = fx
            .coordinator()
            .move_card(&fx.owner, fx.board_id, MoveRequest::to_index(c1, l1, l2, 40))
            .await
            .unwrap();

        assert_eq!(ids(&outcome, l2), vec![c2, c1]);
    }

    #[tokio::test]
    async fn test_unknown_card_is_not_found() {
        let fx = Fixture::new().await;
        let l1 = fx.column("L1").await;

        let err = fx
            .coordinator()
            .move_card(&fx.owner, fx.board_id, MoveRequest::to_index(Uuid::new_v4(), l1, l1, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, KanbanError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stale_neighbors_fall_back_to_end() {
        let fx = Fixture::new().await;
        let (l1, l2) = (fx.column("L1").await, fx.column("L2").await);
        let a = fx.card(l1, "A").await;
        let b = fx.card(l1, "B").await;
        let x = fx.card(l2, "X").await;
        let request = MoveRequest {
            card_id: x,
            from_column_id: l2,
            to_column_id: l1,
            placement: Placement::between(Some(Uuid::new_v4()), Some(a)),
        };

        let outcome = fx.coordinator().move_card(&fx.owner, fx.board_id, request).await.unwrap();

        assert_eq!(ids(&outcome, l1), vec![a, b, x]);
        assert_eq!(outcome.card.position, 3.0);
    }

    #[tokio::test]
    async fn test_neighbor_placement() {
        let fx = Fixture::new().await;
        let l1 = fx.column("L1").await;
        let a = fx.card(l1, "A").await;
        let b = fx.card(l1, "B").await;
        let c = fx.card(l1, "C").await;
        let request = MoveRequest {
            card_id: c,
            from_column_id: l1,
            to_column_id: l1,
            placement: Placement::between(Some(a), Some(b)),
        };

        let outcome = fx.coordinator().move_card(&fx.owner, fx.board_id, request).await.unwrap();

        assert_eq!(ids(&outcome, l1), vec![a, c, b]);
        assert_eq!(outcome.card.position, 1.5);
    }

    #[tokio::test]
    async fn test_reorder_within_requires_card_in_list() {
        let fx = Fixture::new().await;
        let (l1, l2) = (fx.column("L1").await, fx.column("L2").await);
        let c1 = fx.card(l1, "C1").await;

        let err = fx
            .coordinator()
            .reorder_within(&fx.owner, fx.board_id, l2, c1, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, KanbanError::InvalidContainer(_)));

        let c2 = fx.card(l1, "C2").await;
        let outcome = fx
            .coordinator()
            .reorder_within(&fx.owner, fx.board_id, l1, c2, 0)
            .await
            .unwrap();
        assert_eq!(ids(&outcome, l1), vec![c2, c1]);
    }

    #[tokio::test]
    async fn test_non_member_is_forbidden() {
        let fx = Fixture::new().await;
        let l1 = fx.column("L1").await;
        let c1 = fx.card(l1, "C1").await;

        let err = fx
            .coordinator()
            .move_card(&Actor::new(Uuid::new_v4()), fx.board_id, MoveRequest::to_index(c1, l1, l1, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, KanbanError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_persistence_failure_is_retryable_and_leaves_board() {
        let fx = Fixture::new().await;
        let (l1, l2) = (fx.column("L1").await, fx.column("L2").await);
        let c1 = fx.card(l1, "C1").await;
        let before = fx.document().await;
        fx.repository.store().set_fail_writes(true);

        let err = fx
            .coordinator()
            .move_card(&fx.owner, fx.board_id, MoveRequest::to_index(c1, l1, l2, 0))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(fx.document().await, before);
    }

    #[tokio::test]
    async fn test_activity_failure_does_not_fail_move() {
        let fx = Fixture::new().await;
        let (l1, l2) = (fx.column("L1").await, fx.column("L2").await);
        let c1 = fx.card(l1, "C1").await;

        let mut activity = MockActivity::new();
        activity
            .expect_record()
            .times(1)
            .returning(|_| Err(KanbanError::Persistence("activity store down".to_string())));
        let context = Arc::new(ServiceContext::new(
            fx.repository.clone(),
            Arc::new(activity),
            fx.repository.clone(),
            ServiceConfig::default(),
        ));

        let outcome = MoveCoordinator::new(context)
            .move_card(&fx.owner, fx.board_id, MoveRequest::to_index(c1, l1, l2, 0))
            .await
            .unwrap();

        assert_eq!(outcome.card.column_id, l2);
    }

    #[tokio::test]
    async fn test_move_records_activity_and_resolves_assignees() {
        let fx = Fixture::new().await;
        let (l1, l2) = (fx.column("L1").await, fx.column("L2").await);
        let c1 = fx.card(l1, "C1").await;
        let ada = UserSummary {
            id: fx.owner.user_id,
            name: "Ada".to_string(),
            avatar_url: None,
        };
        fx.repository.register(ada.clone()).await.unwrap();
        let mut doc = fx.document().await;
        doc.card_mut(c1).unwrap().assignees.insert(ada.id);
        fx.repository.save(&doc).await.unwrap();

        let outcome = fx
            .coordinator()
            .move_card(&fx.owner, fx.board_id, MoveRequest::to_index(c1, l1, l2, 0))
            .await
            .unwrap();

        assert_eq!(outcome.card.assignees, vec![ada]);
        let trail = fx.activity().await;
        assert_eq!(trail[0].action, ActivityAction::CardMoved);
        assert_eq!(trail[0].payload["destination_index"], 0);
        assert_eq!(trail[0].payload["to_column_id"], serde_json::json!(l2));
    }

    #[tokio::test]
    async fn test_concurrent_moves_into_same_gap_stay_ordered() {
        let fx = Fixture::new().await;
        let (l1, l2) = (fx.column("L1").await, fx.column("L2").await);
        let a = fx.card(l1, "A").await;
        let b = fx.card(l1, "B").await;
        let mut movers = Vec::new();
        for i in 0..8 {
            movers.push(fx.card(l2, &format!("M{}", i)).await);
        }
        let coordinator = Arc::new(fx.coordinator());

        let tasks = movers.iter().map(|card| {
            let coordinator = coordinator.clone();
            let owner = fx.owner;
            let board_id = fx.board_id;
            let request = MoveRequest::to_index(*card, l2, l1, 1);
            async move { coordinator.move_card(&owner, board_id, request).await }
        });
        for result in futures::future::join_all(tasks).await {
            result.unwrap();
        }

        let doc = fx.document().await;
        let column = doc.column(l1).unwrap();
        assert_eq!(column.card_ids.len(), 10);
        assert_eq!(column.card_ids.first(), Some(&a));
        assert_eq!(column.card_ids.last(), Some(&b));
        assert!(doc.column(l2).unwrap().card_ids.is_empty());
        fx.assert_consistent().await;
    }
}
