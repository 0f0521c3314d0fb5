//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/sessions        - Create a session record
//! - POST /api/v1/sessions/start  - Start (connect) a session
//! - POST /api/v1/sessions/send   - Send a message through a session
//! - GET  /api/v1/sessions        - List active session ids

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use outbox_types::session::{SendOutcome, StartStatus};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: String,
}

/// POST /api/v1/sessions - Persist a new session record with status pending.
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }

    let session_id = state.session_manager.create_session(&body.name).await;
    Ok(Json(CreateSessionResponse { session_id }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub status: StartStatus,
    pub session_id: String,
}

/// POST /api/v1/sessions/start - Open and connect a session's channel handle.
///
/// Always 200: the outcome (`initializing`, `already-started`, `not-found`,
/// `error`) is a typed status in the body, per the external contract.
pub async fn start_session(
    State(state): State<AppState>,
    Json(body): Json<StartSessionRequest>,
) -> Json<StartSessionResponse> {
    let status = state
        .session_manager
        .start_session(&body.session_id, true)
        .await;

    Json(StartSessionResponse {
        status,
        session_id: body.session_id,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub session_id: String,
    pub recipient: String,
    pub body: String,
}

/// POST /api/v1/sessions/send - Send a text message through an active session.
///
/// Responds `{"status":"success","messageId":...}` or
/// `{"status":"error","error":...}`.
pub async fn send_message(
    State(state): State<AppState>,
    Json(body): Json<SendMessageRequest>,
) -> Json<SendOutcome> {
    let outcome = state
        .session_manager
        .send(&body.session_id, &body.recipient, &body.body)
        .await;
    Json(outcome)
}

/// GET /api/v1/sessions - Snapshot of active session ids.
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.session_manager.list_sessions())
}
