//! Application error type mapping to HTTP status codes.
//!
//! Unknown-session and transport failures are NOT errors here: the handlers
//! surface them as typed status values in 200 responses, matching the
//! external contract. Only validation and infrastructure failures become
//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use outbox_types::error::DispatchError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Request validation failure (empty fields, malformed values).
    Validation(String),
    /// Scheduled dispatch failure.
    Dispatch(DispatchError),
    /// Generic internal error.
    Internal(String),
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        AppError::Dispatch(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Dispatch(DispatchError::InvalidSchedule(raw)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("invalid scheduled time: '{raw}'"),
            ),
            AppError::Dispatch(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DISPATCH_ERROR", e.to_string())
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
