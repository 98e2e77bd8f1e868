//! Dashboard service error types.
//!
//! All errors map to appropriate HTTP status codes via the
//! `IntoResponse` impl. Relay-side failures are logged server-side and
//! returned to clients with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay_client::RelayClientError;
use serde::Serialize;
use thiserror::Error;

/// Dashboard service error type.
///
/// Maps to appropriate HTTP status codes:
/// - `BadRequest`: 400 Bad Request
/// - `NotFound`: 404 Not Found
/// - `Conflict`: 409 Conflict
/// - `RelayUnavailable`: 503 Service Unavailable
/// - `Internal`: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Relay unavailable: {0}")]
    RelayUnavailable(String),

    #[error("Internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            DashboardError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone())
            }
            DashboardError::NotFound(resource) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", resource.clone())
            }
            DashboardError::Conflict(reason) => {
                (StatusCode::CONFLICT, "CONFLICT", reason.clone())
            }
            DashboardError::RelayUnavailable(reason) => {
                // Log actual reason server-side, return generic message
                tracing::warn!(
                    target: "dashboard.relay",
                    reason = %reason,
                    "Relay management API unavailable"
                );
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "RELAY_UNAVAILABLE",
                    "Relay temporarily unavailable".to_string(),
                )
            }
            DashboardError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

/// Convert relay client errors to dashboard errors.
impl From<RelayClientError> for DashboardError {
    fn from(err: RelayClientError) -> Self {
        match err {
            RelayClientError::Conflict(reason) => DashboardError::Conflict(reason),
            RelayClientError::NotFound(resource) => DashboardError::NotFound(resource),
            RelayClientError::Transport(reason)
            | RelayClientError::InvalidResponse(reason) => {
                DashboardError::RelayUnavailable(reason)
            }
            RelayClientError::Configuration(reason) => {
                tracing::error!(
                    target: "dashboard.relay",
                    reason = %reason,
                    "Relay client misconfigured"
                );
                DashboardError::Internal
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_display_bad_request() {
        let error = DashboardError::BadRequest("publisher is required".to_string());
        assert_eq!(format!("{error}"), "Bad request: publisher is required");
    }

    #[test]
    fn test_display_conflict() {
        let error = DashboardError::Conflict("player exists".to_string());
        assert_eq!(format!("{error}"), "Conflict: player exists");
    }

    #[tokio::test]
    async fn test_into_response_bad_request() {
        let error = DashboardError::BadRequest("publisher is required".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"]["code"], "BAD_REQUEST");
        assert_eq!(body_json["error"]["message"], "publisher is required");
    }

    #[tokio::test]
    async fn test_into_response_not_found() {
        let error = DashboardError::NotFound("Unknown player 'play_x'".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_into_response_relay_unavailable_is_generic() {
        let error =
            DashboardError::RelayUnavailable("connection refused to 10.0.0.5".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        // The transport detail stays server-side
        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"]["code"], "RELAY_UNAVAILABLE");
        assert_eq!(body_json["error"]["message"], "Relay temporarily unavailable");
    }

    #[test]
    fn test_relay_error_mapping() {
        assert!(matches!(
            DashboardError::from(RelayClientError::Conflict("taken".to_string())),
            DashboardError::Conflict(_)
        ));
        assert!(matches!(
            DashboardError::from(RelayClientError::NotFound("play_x".to_string())),
            DashboardError::NotFound(_)
        ));
        assert!(matches!(
            DashboardError::from(RelayClientError::Transport("refused".to_string())),
            DashboardError::RelayUnavailable(_)
        ));
    }
}
