//! Scheduled dispatch queue.
//!
//! `enqueue` validates the scheduled time, persists the message with status
//! `pending`, and arms a one-shot timer task for the due instant (a past
//! instant fires immediately). The due-time job delivers to each recipient in
//! list order, never aborting the loop on a per-recipient failure, then
//! records the terminal status.
//!
//! Jobs for different messages run concurrently; recipients within one job
//! are strictly sequential. The timer task wraps the job in a bounded retry
//! (3 attempts) that fires only on errors the job itself did not catch —
//! business failures inside the handler are caught, logged, and recorded on
//! the message record instead.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use outbox_types::error::DispatchError;
use outbox_types::message::{DeliveryStatus, ScheduledMessage};
use outbox_types::session::SendOutcome;

use crate::dispatch::repository::ScheduledMessageRepository;

/// Attempts per scheduled job before the queue gives up.
pub const MAX_DISPATCH_ATTEMPTS: u32 = 3;

/// Outbound delivery seam for the dispatch job.
///
/// Implemented by `SessionManager`; the queue never sees the session layer
/// beyond this.
pub trait OutboundSender: Send + Sync + 'static {
    fn send(
        &self,
        session_id: &str,
        recipient: &str,
        body: &str,
    ) -> impl Future<Output = SendOutcome> + Send;
}

/// An enqueue request as received from the API layer.
///
/// `scheduled_time` stays a string until `enqueue` parses it, so validation
/// happens before anything is persisted or armed.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub sender: String,
    pub recipients: Vec<String>,
    pub body: String,
    /// RFC 3339 instant.
    pub scheduled_time: String,
}

/// Schedules and dispatches future outbound messages.
pub struct DispatchQueue<S, R> {
    sender: Arc<S>,
    repo: Arc<R>,
}

impl<S: OutboundSender, R: ScheduledMessageRepository> DispatchQueue<S, R> {
    pub fn new(sender: Arc<S>, repo: Arc<R>) -> Self {
        Self { sender, repo }
    }

    /// Validate, persist, and arm a scheduled message.
    ///
    /// Fails with `InvalidSchedule` before any record is persisted when the
    /// time does not parse. A persistence failure propagates and nothing is
    /// armed.
    pub async fn enqueue(&self, request: ScheduleRequest) -> Result<ScheduledMessage, DispatchError> {
        let scheduled_time = parse_scheduled_time(&request.scheduled_time)?;

        let message = ScheduledMessage::new_pending(
            request.sender,
            request.recipients,
            request.body,
            scheduled_time,
        );
        self.repo.create(&message).await?;

        tracing::info!(
            id = %message.id,
            sender = %message.sender,
            recipients = message.recipients.len(),
            scheduled_time = %message.scheduled_time,
            "scheduled message accepted"
        );
        self.arm(message.clone());
        Ok(message)
    }

    /// Re-arm every persisted `pending` message.
    ///
    /// Called once at process start so messages scheduled before a restart
    /// still fire; past-due messages fire immediately.
    pub async fn recover_pending(&self) {
        let pending = match self.repo.find_by_status(DeliveryStatus::Pending).await {
            Ok(pending) => pending,
            Err(e) => {
                tracing::error!(error = %e, "failed to load pending scheduled messages");
                return;
            }
        };

        let count = pending.len();
        for message in pending {
            self.arm(message);
        }
        if count > 0 {
            tracing::info!(count, "re-armed pending scheduled messages");
        }
    }

    /// Spawn the one-shot timer task for a message.
    fn arm(&self, message: ScheduledMessage) {
        let delay = (message.scheduled_time - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let sender = Arc::clone(&self.sender);
        let repo = Arc::clone(&self.repo);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            run_with_retries(
                || handle_due(Arc::clone(&sender), Arc::clone(&repo), message.clone()),
                MAX_DISPATCH_ATTEMPTS,
            )
            .await;
        });
    }
}

/// Parse an RFC 3339 scheduled time into UTC.
fn parse_scheduled_time(raw: &str) -> Result<DateTime<Utc>, DispatchError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| DispatchError::InvalidSchedule(raw.to_string()))
}

/// The due-time job for one scheduled message.
///
/// Catches its own failures: a storage error while finalizing is logged and
/// recorded as status `error` on the message, not re-thrown — so the retry
/// wrapper only ever sees errors no handler claimed.
async fn handle_due<S: OutboundSender, R: ScheduledMessageRepository>(
    sender: Arc<S>,
    repo: Arc<R>,
    message: ScheduledMessage,
) -> Result<(), DispatchError> {
    tracing::info!(id = %message.id, "processing scheduled message");

    if message.recipients.is_empty() {
        // The record intentionally stays `pending`: nothing was attempted.
        tracing::warn!(id = %message.id, "scheduled message has no recipients, skipping");
        return Ok(());
    }

    match deliver(&*sender, &*repo, &message).await {
        Ok(()) => {
            tracing::info!(id = %message.id, "scheduled message marked as sent");
            Ok(())
        }
        Err(e) => {
            tracing::error!(id = %message.id, error = %e, "failed to process scheduled message");
            if let Err(e) = repo.update_status(&message.id, DeliveryStatus::Error).await {
                tracing::error!(id = %message.id, error = %e, "failed to record error status");
            }
            Ok(())
        }
    }
}

/// Deliver to every recipient in order, then record the terminal status.
///
/// Per-recipient failures are logged and do not abort the loop or change the
/// terminal status: after all recipients were attempted, the message is
/// `sent`.
async fn deliver<S: OutboundSender, R: ScheduledMessageRepository>(
    sender: &S,
    repo: &R,
    message: &ScheduledMessage,
) -> Result<(), DispatchError> {
    for recipient in &message.recipients {
        tracing::debug!(id = %message.id, %recipient, "sending scheduled message");
        match sender.send(&message.sender, recipient, &message.body).await {
            SendOutcome::Success { message_id } => {
                tracing::info!(id = %message.id, %recipient, %message_id, "recipient delivered");
            }
            SendOutcome::Error { error } => {
                tracing::error!(id = %message.id, %recipient, %error, "recipient delivery failed");
            }
        }
    }

    repo.update_status(&message.id, DeliveryStatus::Sent)
        .await?;
    Ok(())
}

/// Run a job up to `max_attempts` times, stopping at the first success.
///
/// Returns whether the job ever succeeded.
async fn run_with_retries<F, Fut>(mut job: F, max_attempts: u32) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), DispatchError>>,
{
    for attempt in 1..=max_attempts {
        match job().await {
            Ok(()) => return true,
            Err(e) => {
                tracing::warn!(attempt, max_attempts, error = %e, "dispatch job attempt failed");
            }
        }
    }
    tracing::error!(max_attempts, "dispatch job gave up");
    false
}
