//! Application error type mapping to HTTP status codes and JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error that maps to HTTP responses.
///
/// Pull-query failures arrive as `{"error": ...}` bodies with the matching
/// status -- the HTTP rendering of the realtime surface's `error` events.
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed request input.
    Validation(String),
    /// Generic internal failure (persistence and the like).
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}
