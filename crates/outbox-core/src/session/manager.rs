//! Session lifecycle manager.
//!
//! Owns session creation, starting (with the concurrent-start race closed by
//! the registry), outbound sends, boot-time restore of persisted sessions,
//! and one event-loop task per session that serializes lifecycle and message
//! handling for that session id.
//!
//! Persistence failures on state-recording paths are logged and swallowed so
//! they never block the user-facing operation; the persisted record is
//! reconciled again on the next transition.

use std::sync::Arc;

use tokio::sync::mpsc;

use outbox_types::event::SessionEvent;
use outbox_types::session::{ChannelSession, SendOutcome, SessionStatus, StartStatus};

use crate::channel::{ChannelClient, ChannelFactory};
use crate::dispatch::queue::OutboundSender;
use crate::reply::{AutoReplyEngine, ReplyStatus};
use crate::session::registry::SessionRegistry;
use crate::session::repository::SessionRepository;

/// Manages the full lifecycle of channel sessions.
///
/// Generic over the channel factory and session repository traits so the core
/// never depends on a concrete transport or database.
pub struct SessionManager<F: ChannelFactory, R: SessionRepository> {
    factory: F,
    registry: Arc<SessionRegistry<F::Client>>,
    repo: Arc<R>,
    auto_reply: Arc<AutoReplyEngine<F::Client>>,
}

impl<F: ChannelFactory, R: SessionRepository> SessionManager<F, R> {
    pub fn new(
        factory: F,
        repo: Arc<R>,
        registry: Arc<SessionRegistry<F::Client>>,
        auto_reply: Arc<AutoReplyEngine<F::Client>>,
    ) -> Self {
        Self {
            factory,
            registry,
            repo,
            auto_reply,
        }
    }

    /// Create a new session record with status `pending` and return its id.
    ///
    /// The name is trimmed and used as the session id. A persistence failure
    /// is logged and swallowed; the id is returned regardless, and a later
    /// `ready` event will upsert the record.
    pub async fn create_session(&self, name: &str) -> String {
        let session_id = name.trim().to_string();
        if let Err(e) = self
            .repo
            .create(&ChannelSession::new_pending(&session_id))
            .await
        {
            tracing::error!(%session_id, error = %e, "failed to persist new session record");
        }
        session_id
    }

    /// Start a session: open a channel handle, register it, and connect.
    ///
    /// Returns `already-started` when a live handle exists, `not-found` when
    /// no record is persisted for the id, `error` on open/connect failure
    /// (the handle is deregistered so a retry is not blocked), and
    /// `initializing` once the connect attempt is underway.
    ///
    /// The handle is registered before the connect await so a concurrent
    /// start for the same id observes `already-started` instead of opening a
    /// second handle.
    pub async fn start_session(&self, session_id: &str, announce_qr: bool) -> StartStatus {
        if self.registry.contains(session_id) {
            tracing::info!(%session_id, "session already exists");
            return StartStatus::AlreadyStarted;
        }

        match self.repo.find_by_id(session_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!(%session_id, "no persisted record for session");
                return StartStatus::NotFound;
            }
            Err(e) => {
                tracing::error!(%session_id, error = %e, "session lookup failed");
                return StartStatus::Error;
            }
        }

        let (client, events) = match self.factory.open(session_id) {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!(%session_id, error = %e, "failed to open channel handle");
                self.persist_status(session_id, SessionStatus::Error).await;
                return StartStatus::Error;
            }
        };

        if !self.registry.try_register(session_id, Arc::clone(&client)) {
            // Lost the race against a concurrent start; the unconnected
            // handle is dropped here.
            tracing::info!(%session_id, "session already exists");
            return StartStatus::AlreadyStarted;
        }

        tokio::spawn(run_event_loop(
            session_id.to_string(),
            announce_qr,
            events,
            Arc::clone(&self.registry),
            Arc::clone(&self.repo),
            Arc::clone(&self.auto_reply),
        ));

        match client.connect().await {
            Ok(()) => {
                self.persist_status(session_id, SessionStatus::Initializing)
                    .await;
                StartStatus::Initializing
            }
            Err(e) => {
                tracing::error!(%session_id, error = %e, "failed to connect session");
                // A stale registration would turn every retry into
                // `already-started`.
                self.registry.remove(session_id);
                self.persist_status(session_id, SessionStatus::Error).await;
                StartStatus::Error
            }
        }
    }

    /// Snapshot of active session ids. No ordering guarantee.
    pub fn list_sessions(&self) -> Vec<String> {
        self.registry.session_ids()
    }

    /// Send a text message through an active session.
    pub async fn send(&self, session_id: &str, recipient: &str, body: &str) -> SendOutcome {
        self.registry.send(session_id, recipient, body).await
    }

    /// Re-initialize every persisted session with status `ready`.
    ///
    /// Called once at process start. Best-effort: an individual session's
    /// failure is logged and does not block the others.
    pub async fn restore_sessions(&self) {
        tracing::info!("re-initializing persisted sessions");

        let sessions = match self.repo.find_by_status(SessionStatus::Ready).await {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::error!(error = %e, "failed to load persisted sessions");
                return;
            }
        };

        for record in sessions {
            match self.start_session(&record.session_id, false).await {
                StartStatus::Initializing => {
                    tracing::info!(session_id = %record.session_id, "session reconnected");
                }
                status => {
                    tracing::warn!(
                        session_id = %record.session_id,
                        %status,
                        "session not reconnected"
                    );
                }
            }
        }
    }

    async fn persist_status(&self, session_id: &str, status: SessionStatus) {
        if let Err(e) = self.repo.upsert_status(session_id, status).await {
            tracing::error!(%session_id, %status, error = %e, "failed to record session status");
        }
    }
}

impl<F: ChannelFactory, R: SessionRepository> OutboundSender for SessionManager<F, R> {
    async fn send(&self, session_id: &str, recipient: &str, body: &str) -> SendOutcome {
        self.registry.send(session_id, recipient, body).await
    }
}

/// Per-session event loop.
///
/// Consumes the session's event stream in order, so ready/disconnected/
/// message handling for one id never races itself. Handler failures are
/// logged and never end the loop; the loop ends when the stream closes or a
/// disconnect removes the session.
async fn run_event_loop<C: ChannelClient, R: SessionRepository>(
    session_id: String,
    announce_qr: bool,
    mut events: mpsc::Receiver<SessionEvent>,
    registry: Arc<SessionRegistry<C>>,
    repo: Arc<R>,
    auto_reply: Arc<AutoReplyEngine<C>>,
) {
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Qr(code) => {
                if announce_qr {
                    let preview: String = code.chars().take(30).collect();
                    tracing::info!(%session_id, "pairing code received: {preview}...");
                }
            }
            SessionEvent::Ready => {
                match repo.upsert_status(&session_id, SessionStatus::Ready).await {
                    Ok(()) => tracing::info!(%session_id, "session ready, record updated"),
                    Err(e) => {
                        tracing::error!(%session_id, error = %e, "failed to record ready state");
                    }
                }
            }
            SessionEvent::Authenticated => {
                tracing::info!(%session_id, "session authenticated");
            }
            SessionEvent::Disconnected { reason } => {
                tracing::warn!(%session_id, %reason, "session disconnected");
                if let Err(e) = repo
                    .upsert_status(&session_id, SessionStatus::Disconnected)
                    .await
                {
                    tracing::error!(%session_id, error = %e, "failed to record disconnect");
                }
                registry.remove(&session_id);
                break;
            }
            SessionEvent::Message(message) => {
                // Fire-and-forget: the outcome is logged, never propagated.
                match auto_reply.on_inbound(&session_id, &message).await {
                    ReplyStatus::Error => {
                        tracing::error!(%session_id, from = %message.from, "auto-reply failed");
                    }
                    status => {
                        tracing::debug!(%session_id, from = %message.from, ?status, "inbound handled");
                    }
                }
            }
        }
    }
    tracing::debug!(%session_id, "event loop ended");
}
