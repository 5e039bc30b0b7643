use async_trait::async_trait;
use kanban_core::{ErrorKind, KanbanError, KanbanResult};
use kanban_domain::{BoardId, ListView, MoveOutcome, MoveRequest, UserId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::transport::MoveTransport;

const USER_HEADER: &str = "x-user-id";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct WireEnvelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    kind: ErrorKind,
    message: String,
}

/// [`MoveTransport`] over the JSON HTTP API.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    user_id: UserId,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, user_id: UserId) -> KanbanResult<Self> {
        Self::with_timeout(base_url, user_id, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, user_id: UserId, timeout: Duration) -> KanbanResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| KanbanError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> KanbanResult<T> {
        let response = request
            .header(USER_HEADER, self.user_id.to_string())
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| KanbanError::Transport {
            message: format!("Response body lost: {}", e),
            indeterminate: true,
        })?;

        decode(status, &bytes)
    }
}

/// A request that never connected was not applied. Anything lost after that
/// may or may not have been.
fn map_send_error(error: reqwest::Error) -> KanbanError {
    let indeterminate = !error.is_connect() || error.is_timeout();
    tracing::warn!(indeterminate, "Request failed: {}", error);
    KanbanError::Transport {
        message: error.to_string(),
        indeterminate,
    }
}

fn decode<T: DeserializeOwned>(status: reqwest::StatusCode, bytes: &[u8]) -> KanbanResult<T> {
    match serde_json::from_slice::<WireEnvelope<T>>(bytes) {
        Ok(WireEnvelope {
            success: true,
            data: Some(data),
            ..
        }) => Ok(data),
        Ok(WireEnvelope {
            error: Some(error), ..
        }) => Err(KanbanError::from_kind(error.kind, error.message)),
        Ok(_) => Err(KanbanError::Internal(format!(
            "Malformed response envelope (status {})",
            status
        ))),
        Err(e) if status.is_success() => Err(KanbanError::Serialization(e.to_string())),
        Err(_) if status.is_server_error() => {
            Err(KanbanError::Internal(format!("Server returned {}", status)))
        }
        Err(_) => Err(KanbanError::Validation(format!("Request rejected with {}", status))),
    }
}

#[async_trait]
impl MoveTransport for HttpTransport {
    async fn move_card(&self, board_id: BoardId, request: MoveRequest) -> KanbanResult<MoveOutcome> {
        let builder = self
            .client
            .patch(self.url(&format!("/boards/{}/cards/move", board_id)))
            .json(&request);
        self.send(builder).await
    }

    async fn fetch_lists(&self, board_id: BoardId) -> KanbanResult<Vec<ListView>> {
        let builder = self.client.get(self.url(&format!("/boards/{}/lists", board_id)));
        self.send(builder).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_decode_error_envelope() {
        let body = br#"{"success":false,"error":{"kind":"invalid_container","message":"Invalid container: list"}}"#;
        let err = decode::<Vec<ListView>>(StatusCode::BAD_REQUEST, body).unwrap_err();
        assert!(matches!(err, KanbanError::InvalidContainer(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_decode_server_error_is_retryable() {
        let body = br#"{"success":false,"error":{"kind":"server_error","message":"Internal server error"}}"#;
        let err = decode::<Vec<ListView>>(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap_err();
        assert!(err.is_retryable());
        assert!(!err.is_indeterminate());
    }

    #[test]
    fn test_decode_non_envelope_body() {
        let err = decode::<Vec<ListView>>(StatusCode::BAD_GATEWAY, b"upstream down").unwrap_err();
        assert!(err.is_retryable());

        let err = decode::<Vec<ListView>>(StatusCode::METHOD_NOT_ALLOWED, b"").unwrap_err();
        assert!(matches!(err, KanbanError::Validation(_)));
    }

    #[test]
    fn test_decode_success() {
        let lists = decode::<Vec<ListView>>(StatusCode::OK, br#"{"success":true,"data":[]}"#).unwrap();
        assert!(lists.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:3000/", uuid::Uuid::nil()).unwrap();
        assert_eq!(transport.url("/boards"), "http://localhost:3000/api/boards");
    }
}
