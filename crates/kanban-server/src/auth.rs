use axum::{extract::FromRequestParts, http::request::Parts};
use kanban_core::KanbanError;
use kanban_domain::Actor;
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the caller's user id. Issued by whatever sits in front of
/// this server; the value is trusted as-is.
pub const USER_HEADER: &str = "x-user-id";

/// The caller of a request.
pub struct CurrentUser(pub Actor);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_HEADER)
            .ok_or(ApiError(KanbanError::Unauthorized))?;
        let value = header
            .to_str()
            .map_err(|_| ApiError(KanbanError::Unauthorized))?;
        let user_id =
            Uuid::parse_str(value.trim()).map_err(|_| ApiError(KanbanError::Unauthorized))?;

        Ok(CurrentUser(Actor::new(user_id)))
    }
}
