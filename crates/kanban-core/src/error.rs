use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KanbanError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    /// A neighbor referenced for position computation no longer exists.
    /// Recovered locally by the move coordinator; never surfaced to callers.
    #[error("Stale reference: {0}")]
    StaleReference(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Drag aborted")]
    DragAborted,

    /// Network failure between client and server.
    /// `indeterminate` means the request may or may not have been applied.
    #[error("Transport error: {message}")]
    Transport { message: String, indeterminate: bool },
}

/// Machine-readable error kind exposed across the request/response boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidContainer,
    Forbidden,
    Unauthorized,
    Validation,
    ServerError,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidContainer => "invalid_container",
            Self::Forbidden => "forbidden",
            Self::Unauthorized => "unauthorized",
            Self::Validation => "validation",
            Self::ServerError => "server_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl KanbanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidContainer(_) => ErrorKind::InvalidContainer,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Validation(_) => ErrorKind::Validation,
            Self::StaleReference(_)
            | Self::Persistence(_)
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::Internal(_)
            | Self::DragAborted
            | Self::Transport { .. } => ErrorKind::ServerError,
        }
    }

    /// Whether the caller may safely repeat the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_) | Self::Io(_) | Self::Internal(_) | Self::Transport { .. }
        )
    }

    /// Whether the outcome of a remote call is unknown (e.g. a timeout).
    pub fn is_indeterminate(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                indeterminate: true,
                ..
            }
        )
    }

    /// Rebuild an error from a kind and message received over the wire.
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::InvalidContainer => Self::InvalidContainer(message),
            ErrorKind::Forbidden => Self::Forbidden(message),
            ErrorKind::Unauthorized => Self::Unauthorized,
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::ServerError => Self::Internal(message),
        }
    }
}
