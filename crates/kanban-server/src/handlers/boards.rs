use axum::extract::{Query, State};
use kanban_domain::{ActivityRecord, Board, BoardId};
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::error::{ApiResponse, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::models::{ActivityQuery, CreateBoard, InviteMember};
use crate::state::AppState;

pub async fn list_boards(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> ApiResult<Vec<Board>> {
    let boards = state.ops.boards(&actor).await?;
    Ok(ApiResponse::ok(boards))
}

pub async fn create_board(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(input): ApiJson<CreateBoard>,
) -> ApiResult<Board> {
    let board = state
        .ops
        .create_board(&actor, input.title, input.description, input.background)
        .await?;
    Ok(ApiResponse::created(board))
}

pub async fn delete_board(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(board_id): ApiPath<BoardId>,
) -> ApiResult<Value> {
    state.ops.delete_board(&actor, board_id).await?;
    Ok(ApiResponse::ok(json!({ "id": board_id })))
}

pub async fn invite_member(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(board_id): ApiPath<BoardId>,
    ApiJson(input): ApiJson<InviteMember>,
) -> ApiResult<Board> {
    let board = state
        .ops
        .invite_member(&actor, board_id, input.user_id, input.role)
        .await?;
    Ok(ApiResponse::ok(board))
}

pub async fn activity(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(board_id): ApiPath<BoardId>,
    Query(query): Query<ActivityQuery>,
) -> ApiResult<Vec<ActivityRecord>> {
    let records = state.ops.activity(&actor, board_id, query.limit).await?;
    Ok(ApiResponse::ok(records))
}
