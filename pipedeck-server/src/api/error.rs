//! API Error Handling
//!
//! Unified error types and conversion for API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pipedeck_store::{BackendError, BackendErrorKind};

use crate::service::ServiceError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    BackendError(BackendError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::BackendError(err) => {
                tracing::error!("Backend error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::ValidationError(msg) => ApiError::BadRequest(msg),
            ServiceError::Backend(err) => err.into(),
        }
    }
}

/// Backend errors keep their `kind: message` text whatever the status
impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err.kind {
            BackendErrorKind::NotFound => ApiError::NotFound(err.to_string()),
            // A child was added concurrently; the caller may retry the delete
            BackendErrorKind::Constraint => ApiError::Conflict(err.to_string()),
            BackendErrorKind::Transport | BackendErrorKind::Malformed => {
                ApiError::BackendError(err)
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn body_of(err: ApiError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        (status, body["error"].as_str().unwrap().to_string())
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::from(ServiceError::NotFound("Stage x not found".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(ServiceError::ValidationError("empty".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(BackendError::constraint("fk")),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(BackendError::transport("down")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::from(BackendError::malformed("bad row")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn test_backend_messages_reach_the_body_unchanged() {
        let cases = [
            BackendError::not_found("stage 42 vanished"),
            BackendError::constraint("stage still has fields"),
            BackendError::transport("connection refused"),
            BackendError::malformed("bad row"),
        ];

        for err in cases {
            let expected = err.to_string();
            let (_, message) = body_of(ApiError::from(ServiceError::Backend(err))).await;
            assert_eq!(message, expected);
        }
    }

    #[tokio::test]
    async fn test_service_messages_reach_the_body_unchanged() {
        let (status, message) =
            body_of(ServiceError::NotFound("Pipeline 7 not found".into()).into()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Pipeline 7 not found");
    }
}
