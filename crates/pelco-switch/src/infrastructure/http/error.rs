//! Error responses for the control surface.
//!
//! Every failure, whatever its cause, is a `400 Bad Request` with a JSON body
//! of the form `{"error": "<message>"}`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pelco_core::ProtocolError;
use serde_json::json;
use thiserror::Error;

use crate::application::manage_targets::TargetError;
use crate::application::route_frames::RouteError;

/// Errors returned by control-surface handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Route(#[from] RouteError),

    /// The JSON body was missing, malformed, or had the wrong shape.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        // The only query the surface takes is `mode`.
        ApiError::Target(TargetError::InvalidMode(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::warn!("control request rejected: {message}");
        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_error_message_passes_through() {
        let err = ApiError::from(TargetError::UnknownTarget("cam7".to_string()));
        assert_eq!(err.to_string(), "Invalid target: cam7");
    }

    #[test]
    fn test_invalid_mode_message_is_fixed() {
        let err = ApiError::from(TargetError::InvalidMode("live".to_string()));
        assert_eq!(err.to_string(), "Invalid mode");
    }

    #[test]
    fn test_every_error_is_bad_request() {
        let errors = [
            ApiError::from(TargetError::UnknownTarget("x".to_string())),
            ApiError::from(ProtocolError::InvalidPreset(0)),
            ApiError::InvalidBody("missing field `target`".to_string()),
        ];
        for err in errors {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }
}
