pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod state;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use kanban_service::KanbanOperations;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use auth::{CurrentUser, USER_HEADER};
pub use error::{ApiError, ApiResponse, ApiResult, Envelope, ErrorBody};
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Board routes
        .route("/boards", get(handlers::boards::list_boards))
        .route("/boards", post(handlers::boards::create_board))
        .route("/boards/{board_id}", delete(handlers::boards::delete_board))
        .route(
            "/boards/{board_id}/invite",
            post(handlers::boards::invite_member),
        )
        .route(
            "/boards/{board_id}/activity",
            get(handlers::boards::activity),
        )
        // List routes
        .route(
            "/boards/{board_id}/lists",
            get(handlers::lists::board_lists),
        )
        .route(
            "/boards/{board_id}/lists",
            post(handlers::lists::create_list),
        )
        .route(
            "/boards/{board_id}/lists/reorder",
            patch(handlers::lists::reorder_lists),
        )
        .route(
            "/boards/{board_id}/lists/{list_id}",
            delete(handlers::lists::delete_list),
        )
        // Card routes
        .route(
            "/boards/{board_id}/lists/{list_id}/cards",
            post(handlers::cards::create_card),
        )
        .route(
            "/boards/{board_id}/lists/{list_id}/cards/reorder",
            patch(handlers::cards::reorder_card),
        )
        .route(
            "/boards/{board_id}/cards/move",
            patch(handlers::cards::move_card),
        )
        .route(
            "/boards/{board_id}/cards/{card_id}",
            patch(handlers::cards::update_card),
        )
        .route(
            "/boards/{board_id}/cards/{card_id}",
            delete(handlers::cards::delete_card),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API on an already bound listener until the process stops.
pub async fn serve(listener: TcpListener, ops: Arc<dyn KanbanOperations>) -> std::io::Result<()> {
    let app = create_router(AppState::new(ops));
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Server listening on {}", addr);
    }
    axum::serve(listener, app).await
}
