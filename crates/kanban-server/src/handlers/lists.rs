use axum::extract::State;
use kanban_domain::{BoardId, ColumnId, ListView};
use serde_json::{json, Value};

use crate::auth::CurrentUser;
use crate::error::{ApiResponse, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::models::{CreateList, ReorderLists};
use crate::state::AppState;

/// Every list of the board, in display order, with its cards.
pub async fn board_lists(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(board_id): ApiPath<BoardId>,
) -> ApiResult<Vec<ListView>> {
    let lists = state.ops.board_lists(&actor, board_id).await?;
    Ok(ApiResponse::ok(lists))
}

pub async fn create_list(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(board_id): ApiPath<BoardId>,
    ApiJson(input): ApiJson<CreateList>,
) -> ApiResult<ListView> {
    let list = state.ops.create_list(&actor, board_id, input.title).await?;
    Ok(ApiResponse::created(list))
}

pub async fn delete_list(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath((board_id, list_id)): ApiPath<(BoardId, ColumnId)>,
) -> ApiResult<Value> {
    state.ops.delete_list(&actor, board_id, list_id).await?;
    Ok(ApiResponse::ok(json!({ "id": list_id })))
}

pub async fn reorder_lists(
    State(state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(board_id): ApiPath<BoardId>,
    ApiJson(input): ApiJson<ReorderLists>,
) -> ApiResult<Vec<ListView>> {
    let lists = state
        .ops
        .reorder_lists(&actor, board_id, input.ordered_ids)
        .await?;
    Ok(ApiResponse::ok(lists))
}
