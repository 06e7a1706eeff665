//! Handler error type and its HTTP mapping
//!
//! Business outcomes (authenticated, denied, missing input) are 200
//! responses built by the handlers. Only provider failures and unusable
//! inbound requests become a `GatewayError`, rendered as
//! `{"error":{"type":"...","message":"...","request_id":"req_..."}}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    Upstream(#[from] rover_auth::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Upstream(rover_auth::Error::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Upstream(rover_auth::Error::Http(_))
            | GatewayError::Upstream(rover_auth::Error::MalformedResponse(_)) => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::Upstream(rover_auth::Error::Config(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Machine-readable error type, also used as the metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Upstream(rover_auth::Error::Timeout(_)) => "timeout",
            GatewayError::Upstream(rover_auth::Error::Http(_)) => "transport",
            GatewayError::Upstream(rover_auth::Error::MalformedResponse(_)) => {
                "malformed_response"
            }
            GatewayError::Upstream(rover_auth::Error::Config(_)) => "config",
            GatewayError::InvalidRequest(_) => "invalid_request",
        }
    }

    pub fn with_request_id(self, request_id: String) -> ErrorResponse {
        ErrorResponse {
            error: self,
            request_id,
        }
    }
}

/// A `GatewayError` tagged with the request it belongs to.
#[derive(Debug)]
pub struct ErrorResponse {
    pub error: GatewayError,
    pub request_id: String,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "type": self.error.kind(),
                "message": self.error.to_string(),
                "request_id": self.request_id,
            }
        });
        (self.error.status(), axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn upstream_errors_map_to_gateway_statuses() {
        let cases = [
            (
                GatewayError::Upstream(rover_auth::Error::Timeout(Duration::from_secs(10))),
                StatusCode::GATEWAY_TIMEOUT,
                "timeout",
            ),
            (
                GatewayError::Upstream(rover_auth::Error::Http("refused".into())),
                StatusCode::BAD_GATEWAY,
                "transport",
            ),
            (
                GatewayError::Upstream(rover_auth::Error::MalformedResponse("eof".into())),
                StatusCode::BAD_GATEWAY,
                "malformed_response",
            ),
            (
                GatewayError::InvalidRequest("accessToken is required".into()),
                StatusCode::BAD_REQUEST,
                "invalid_request",
            ),
        ];

        for (err, status, kind) in cases {
            assert_eq!(err.status(), status, "{err}");
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[tokio::test]
    async fn error_response_body_shape() {
        let resp = GatewayError::InvalidRequest("accessToken is required".into())
            .with_request_id("req_abc123".into())
            .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["type"], "invalid_request");
        assert_eq!(json["error"]["request_id"], "req_abc123");
        assert_eq!(
            json["error"]["message"],
            "invalid request: accessToken is required"
        );
    }
}
