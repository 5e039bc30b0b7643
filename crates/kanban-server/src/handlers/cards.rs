use axum::extract::State;
use kanban_domain::{BoardId, CardId, CardView, ColumnId, MoveOutcome, MoveRequest, NewCard};
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::error::{ApiResponse, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::models::{ReorderCard, UpdateCard};
use crate::state::AppState;

pub async fn create_card(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath((board_id, list_id)): ApiPath<(BoardId, ColumnId)>,
    ApiJson(input): ApiJson<NewCard>,
) -> ApiResult<CardView> {
    let card = state.ops.create_card(&actor, board_id, list_id, input).await?;
    Ok(ApiResponse::created(card))
}

pub async fn update_card(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath((board_id, card_id)): ApiPath<(BoardId, CardId)>,
    ApiJson(input): ApiJson<UpdateCard>,
) -> ApiResult<CardView> {
    let card = state
        .ops
        .update_card(&actor, board_id, card_id, input.into())
        .await?;
    Ok(ApiResponse::ok(card))
}

pub async fn delete_card(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath((board_id, card_id)): ApiPath<(BoardId, CardId)>,
) -> ApiResult<Value> {
    state.ops.delete_card(&actor, board_id, card_id).await?;
    Ok(ApiResponse::ok(json!({ "id": card_id })))
}

/// Move a card within or across lists. Returns the moved card and the
/// authoritative lists of the board.
pub async fn move_card(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(board_id): ApiPath<BoardId>,
    ApiJson(request): ApiJson<MoveRequest>,
) -> ApiResult<MoveOutcome> {
    let outcome = state.ops.move_card(&actor, board_id, request).await?;
    Ok(ApiResponse::ok(outcome))
}

pub async fn reorder_card(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath((board_id, list_id)): ApiPath<(BoardId, ColumnId)>,
    ApiJson(input): ApiJson<ReorderCard>,
) -> ApiResult<MoveOutcome> {
    let outcome = state
        .ops
        .reorder_card(&actor, board_id, list_id, input.card_id, input.new_index)
        .await?;
    Ok(ApiResponse::ok(outcome))
}
