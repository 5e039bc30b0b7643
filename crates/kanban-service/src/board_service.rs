use kanban_core::{KanbanError, KanbanResult, Repository};
use kanban_domain::commands::{
    CreateCard, CreateColumn, DeleteCard, DeleteColumn, InviteMember, ReorderColumns, UpdateCard,
};
use kanban_domain::{
    ActivityAction, ActivityRecord, Actor, Board, BoardDocument, BoardId, BoardRole, CardId,
    CardUpdate, CardView, ColumnId, ListView, NewCard, UserId,
};
use kanban_persistence::ActivityLog;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::context::ServiceContext;

/// Board, list and card lifecycle. Card moves go through
/// [`crate::MoveCoordinator`].
pub struct BoardService {
    context: Arc<ServiceContext>,
}

impl BoardService {
    pub fn new(context: Arc<ServiceContext>) -> Self {
        Self { context }
    }

    pub async fn create_board(
        &self,
        actor: &Actor,
        title: String,
        description: Option<String>,
        background: Option<String>,
    ) -> KanbanResult<Board> {
        let title = title.trim();
        if title.is_empty() {
            return Err(KanbanError::Validation("board title must not be empty".to_string()));
        }
        let mut board = Board::new(title.to_string(), actor.user_id);
        board.description = description;
        board.background = background;

        let saved = self.context.save(&BoardDocument::new(board)).await?;
        self.context
            .log(
                saved.id(),
                actor,
                ActivityAction::BoardCreated,
                json!({ "title": saved.board.title }),
            )
            .await;
        Ok(saved.board)
    }

    /// Boards the actor is a member of, oldest first.
    pub async fn boards(&self, actor: &Actor) -> KanbanResult<Vec<Board>> {
        let mut boards: Vec<Board> = self
            .context
            .boards
            .find_all()
            .await?
            .into_iter()
            .map(|doc| doc.board)
            .filter(|board| actor.role_on(board).is_some())
            .collect();
        boards.sort_by_key(|board| board.created_at);
        Ok(boards)
    }

    /// Delete a board with everything on it, activity trail included.
    pub async fn delete_board(&self, actor: &Actor, board_id: BoardId) -> KanbanResult<()> {
        {
            let _guard = self.context.lock(board_id).await;
            let (doc, _) = self.context.load_for(actor, board_id).await?;
            actor.require_owner(&doc.board)?;
            self.context.boards.delete(board_id).await?;
        }
        self.context.forget_lock(board_id);
        tracing::info!(%board_id, "Deleted board");
        Ok(())
    }

    pub async fn board_lists(&self, actor: &Actor, board_id: BoardId) -> KanbanResult<Vec<ListView>> {
        let (doc, _) = self.context.load_for(actor, board_id).await?;
        self.context.hydrate(&doc).await
    }

    pub async fn create_list(&self, actor: &Actor, board_id: BoardId, title: String) -> KanbanResult<ListView> {
        let list_id = Uuid::new_v4();
        let saved = {
            let _guard = self.context.lock(board_id).await;
            let (mut doc, _) = self.context.load_for(actor, board_id).await?;
            self.context.execute(
                &mut doc,
                Box::new(CreateColumn {
                    column_id: list_id,
                    title,
                }),
            )?;
            self.context.save(&doc).await?
        };

        let column = saved
            .column(list_id)
            .ok_or_else(|| KanbanError::Internal("created list missing after save".to_string()))?;
        self.context
            .log(
                board_id,
                actor,
                ActivityAction::ListCreated,
                json!({ "list_id": list_id, "title": column.title }),
            )
            .await;

        Ok(ListView {
            id: column.id,
            board_id,
            title: column.title.clone(),
            position: column.position,
            cards: Vec::new(),
        })
    }

    pub async fn delete_list(&self, actor: &Actor, board_id: BoardId, list_id: ColumnId) -> KanbanResult<()> {
        let cards_deleted = {
            let _guard = self.context.lock(board_id).await;
            let (mut doc, _) = self.context.load_for(actor, board_id).await?;
            let held = doc.column(list_id).map_or(0, |c| c.card_ids.len());
            self.context
                .execute(&mut doc, Box::new(DeleteColumn { column_id: list_id }))?;
            self.context.save(&doc).await?;
            held
        };

        self.context
            .log(
                board_id,
                actor,
                ActivityAction::ListDeleted,
                json!({ "list_id": list_id, "cards_deleted": cards_deleted }),
            )
            .await;
        Ok(())
    }

    /// Owner only. Named lists come first in the given order; the rest keep
    /// their relative order after them.
    pub async fn reorder_lists(
        &self,
        actor: &Actor,
        board_id: BoardId,
        ordered_ids: Vec<ColumnId>,
    ) -> KanbanResult<Vec<ListView>> {
        let saved = {
            let _guard = self.context.lock(board_id).await;
            let (mut doc, _) = self.context.load_for(actor, board_id).await?;
            actor.require_owner(&doc.board)?;
            self.context.execute(
                &mut doc,
                Box::new(ReorderColumns {
                    ordered_ids: ordered_ids.clone(),
                }),
            )?;
            self.context.save(&doc).await?
        };

        self.context
            .log(
                board_id,
                actor,
                ActivityAction::ListsReordered,
                json!({ "ordered_list_ids": ordered_ids }),
            )
            .await;
        self.context.hydrate(&saved).await
    }

    pub async fn create_card(
        &self,
        actor: &Actor,
        board_id: BoardId,
        list_id: ColumnId,
        card: NewCard,
    ) -> KanbanResult<CardView> {
        let card_id = Uuid::new_v4();
        let saved = {
            let _guard = self.context.lock(board_id).await;
            let (mut doc, _) = self.context.load_for(actor, board_id).await?;
            Self::check_assignees(&doc, card.assignees.iter())?;
            self.context.execute(
                &mut doc,
                Box::new(CreateCard {
                    card_id,
                    column_id: list_id,
                    card,
                }),
            )?;
            self.context.save(&doc).await?
        };

        let view = self.context.card_view(&saved, card_id).await?;
        self.context
            .log(
                board_id,
                actor,
                ActivityAction::CardCreated,
                json!({ "card_id": card_id, "list_id": list_id, "title": view.title }),
            )
            .await;
        Ok(view)
    }

    /// Edit a card's payload. Ordering is untouched.
    pub async fn update_card(
        &self,
        actor: &Actor,
        board_id: BoardId,
        card_id: CardId,
        updates: CardUpdate,
    ) -> KanbanResult<CardView> {
        if updates.is_empty() {
            return Err(KanbanError::Validation("no fields to update".to_string()));
        }
        let fields = Self::changed_fields(&updates);

        let saved = {
            let _guard = self.context.lock(board_id).await;
            let (mut doc, _) = self.context.load_for(actor, board_id).await?;
            if let Some(assignees) = &updates.assignees {
                Self::check_assignees(&doc, assignees.iter())?;
            }
            self.context
                .execute(&mut doc, Box::new(UpdateCard { card_id, updates }))?;
            self.context.save(&doc).await?
        };

        self.context
            .log(
                board_id,
                actor,
                ActivityAction::CardUpdated,
                json!({ "card_id": card_id, "fields": fields }),
            )
            .await;
        self.context.card_view(&saved, card_id).await
    }

    /// Delete a card. Siblings keep their positions.
    pub async fn delete_card(&self, actor: &Actor, board_id: BoardId, card_id: CardId) -> KanbanResult<()> {
        let title = {
            let _guard = self.context.lock(board_id).await;
            let (mut doc, _) = self.context.load_for(actor, board_id).await?;
            let title = doc.card(card_id).map(|c| c.title.clone());
            self.context.execute(&mut doc, Box::new(DeleteCard { card_id }))?;
            self.context.save(&doc).await?;
            title
        };

        self.context
            .log(
                board_id,
                actor,
                ActivityAction::CardDeleted,
                json!({ "card_id": card_id, "title": title }),
            )
            .await;
        Ok(())
    }

    /// Owner only. Inviting someone who is already a member changes nothing.
    pub async fn invite_member(
        &self,
        actor: &Actor,
        board_id: BoardId,
        user_id: UserId,
        role: BoardRole,
    ) -> KanbanResult<Board> {
        let (board, added) = {
            let _guard = self.context.lock(board_id).await;
            let (mut doc, _) = self.context.load_for(actor, board_id).await?;
            actor.require_owner(&doc.board)?;
            if doc.board.role_of(user_id).is_some() {
                (doc.board, false)
            } else {
                self.context
                    .execute(&mut doc, Box::new(InviteMember { user_id, role }))?;
                (self.context.save(&doc).await?.board, true)
            }
        };

        if added {
            self.context
                .log(
                    board_id,
                    actor,
                    ActivityAction::MemberInvited,
                    json!({ "user_id": user_id, "role": role }),
                )
                .await;
        }
        Ok(board)
    }

    /// Most recent first. `limit` defaults to the configured activity limit.
    pub async fn activity(
        &self,
        actor: &Actor,
        board_id: BoardId,
        limit: Option<usize>,
    ) -> KanbanResult<Vec<ActivityRecord>> {
        self.context.load_for(actor, board_id).await?;
        let limit = limit.unwrap_or(self.context.config.activity_limit);
        self.context.activity.recent(board_id, limit).await
    }

    fn check_assignees<'a>(doc: &BoardDocument, assignees: impl Iterator<Item = &'a UserId>) -> KanbanResult<()> {
        for user_id in assignees {
            if doc.board.role_of(*user_id).is_none() {
                return Err(KanbanError::Validation(format!(
                    "assignee {} is not a member of board {}",
                    user_id,
                    doc.id()
                )));
            }
        }
        Ok(())
    }

    fn changed_fields(updates: &CardUpdate) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if updates.title.is_some() {
            fields.push("title");
        }
        if updates.description.is_change() {
            fields.push("description");
        }
        if updates.labels.is_some() {
            fields.push("labels");
        }
        if updates.assignees.is_some() {
            fields.push("assignees");
        }
        if updates.due_date.is_change() {
            fields.push("due_date");
        }
        fields
    }
}
