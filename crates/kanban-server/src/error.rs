use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kanban_core::{ErrorKind, KanbanError};
use serde::Serialize;

/// Body shared by every response: `{ success, data?, error? }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

/// Successful response wrapped in the envelope.
pub struct ApiResponse<T> {
    status: StatusCode,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            success: true,
            data: Some(self.data),
            error: None,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Error side of a handler. Wraps the service error so `?` works in handlers.
#[derive(Debug)]
pub struct ApiError(pub KanbanError);

impl From<KanbanError> for ApiError {
    fn from(err: KanbanError) -> Self {
        Self(err)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidContainer => StatusCode::BAD_REQUEST,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let message = match kind {
            ErrorKind::ServerError => {
                tracing::error!("Internal error: {}", self.0);
                "Internal server error".to_string()
            }
            _ => self.0.to_string(),
        };

        let body: Envelope<()> = Envelope {
            success: false,
            data: None,
            error: Some(ErrorBody { kind, message }),
        };
        (status_for(kind), Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<ApiResponse<T>, ApiError>;
