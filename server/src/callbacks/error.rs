//! Callback Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::hooks::HookError;

/// Errors surfaced by the callback endpoints.
///
/// Response bodies are fixed strings; internal detail only reaches the logs.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// Signature missing, mismatched, or no secret under a fail-closed policy.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Body is not JSON or lacks the required identity fields.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A recognized event or interaction failed while being handled.
    #[error("Handler failed: {0}")]
    Handler(#[from] HookError),

    /// One or more envelopes of a batch failed.
    #[error("{failed} of {total} events failed")]
    Batch { failed: usize, total: usize },
}

impl IntoResponse for CallbackError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidSignature => (StatusCode::UNAUTHORIZED, "Invalid signature"),
            Self::MalformedPayload(_) => (StatusCode::BAD_REQUEST, "Malformed payload"),
            Self::Handler(_) | Self::Batch { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type for callback operations.
pub type CallbackResult<T> = Result<T, CallbackError>;
