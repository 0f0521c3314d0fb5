//! Scheduled message HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/scheduled-messages - Enqueue a message for future dispatch

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use outbox_core::dispatch::ScheduleRequest;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduledMessageRequest {
    pub sender: String,
    pub recipients: Vec<String>,
    pub body: String,
    /// ISO-8601 / RFC 3339 instant.
    pub scheduled_time: String,
}

#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub message: &'static str,
}

/// POST /api/v1/scheduled-messages - Validate and enqueue a scheduled message.
///
/// 400 when `scheduledTime` does not parse; nothing is persisted or armed in
/// that case.
pub async fn create_scheduled_message(
    State(state): State<AppState>,
    Json(body): Json<CreateScheduledMessageRequest>,
) -> Result<Json<AcceptedResponse>, AppError> {
    state
        .dispatch_queue
        .enqueue(ScheduleRequest {
            sender: body.sender,
            recipients: body.recipients,
            body: body.body,
            scheduled_time: body.scheduled_time,
        })
        .await?;

    Ok(Json(AcceptedResponse {
        message: "accepted",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use outbox_types::error::DispatchError;

    async fn test_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::init_at(dir.path()).await.unwrap();
        (dir, state)
    }

    #[tokio::test]
    async fn test_accepts_valid_schedule() {
        let (_dir, state) = test_state().await;

        let response = create_scheduled_message(
            State(state),
            Json(CreateScheduledMessageRequest {
                sender: "desk".to_string(),
                recipients: vec!["+55 61 9501-0011".to_string()],
                body: "promo".to_string(),
                scheduled_time: "2099-01-01T12:00:00Z".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.message, "accepted");
    }

    #[tokio::test]
    async fn test_rejects_malformed_time() {
        let (_dir, state) = test_state().await;

        let result = create_scheduled_message(
            State(state),
            Json(CreateScheduledMessageRequest {
                sender: "desk".to_string(),
                recipients: vec!["1".to_string()],
                body: "promo".to_string(),
                scheduled_time: "next tuesday".to_string(),
            }),
        )
        .await;

        assert!(matches!(
            result,
            Err(AppError::Dispatch(DispatchError::InvalidSchedule(_)))
        ));
    }
}
