//! In-process simulated channel transport.
//!
//! Behaves like a well-behaved channel client: `connect` resolves the
//! session's auth profile directory, emits a pairing code when the profile is
//! fresh, then `Authenticated` and `Ready`; sends return generated message
//! ids. Inbound traffic can be injected through the factory, which is how the
//! dev server demos the auto-reply path and how integration-style tests drive
//! the event loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use outbox_core::channel::{ChannelClient, ChannelFactory, EVENT_CHANNEL_CAPACITY};
use outbox_types::error::ChannelError;
use outbox_types::event::SessionEvent;

use crate::config::session_auth_dir;

/// Simulated channel client for one session.
pub struct SimChannelClient {
    session_id: String,
    auth_dir: PathBuf,
    events: mpsc::Sender<SessionEvent>,
    sequence: AtomicU64,
}

impl ChannelClient for SimChannelClient {
    async fn connect(&self) -> Result<(), ChannelError> {
        let fresh_profile = !self.auth_dir.exists();
        tokio::fs::create_dir_all(&self.auth_dir)
            .await
            .map_err(|e| ChannelError::Connect(e.to_string()))?;

        if fresh_profile {
            let code = Uuid::now_v7().simple().to_string();
            let _ = self.events.send(SessionEvent::Qr(code)).await;
        }
        let _ = self.events.send(SessionEvent::Authenticated).await;
        let _ = self.events.send(SessionEvent::Ready).await;

        tracing::debug!(session_id = %self.session_id, "simulated channel connected");
        Ok(())
    }

    async fn send_text(&self, recipient: &str, body: &str) -> Result<String, ChannelError> {
        if self.events.is_closed() {
            return Err(ChannelError::Closed);
        }
        let n = self.sequence.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            session_id = %self.session_id,
            %recipient,
            bytes = body.len(),
            "simulated send"
        );
        Ok(format!("SIM-{}-{n}", self.session_id))
    }
}

/// Factory for simulated channel clients.
///
/// Retains a weak event sender per session so callers can inject inbound
/// events; the weak reference keeps the event stream's lifetime tied to the
/// client handle, exactly as a real transport would.
pub struct SimChannelFactory {
    data_dir: PathBuf,
    links: DashMap<String, mpsc::WeakSender<SessionEvent>>,
}

impl SimChannelFactory {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            links: DashMap::new(),
        }
    }

    /// Inject an event into a session's stream.
    ///
    /// Returns `false` when the session has no live client (never opened, or
    /// its handle was dropped).
    pub async fn inject(&self, session_id: &str, event: SessionEvent) -> bool {
        let Some(sender) = self
            .links
            .get(session_id)
            .and_then(|weak| weak.upgrade())
        else {
            return false;
        };
        sender.send(event).await.is_ok()
    }
}

impl ChannelFactory for SimChannelFactory {
    type Client = SimChannelClient;

    fn open(
        &self,
        session_id: &str,
    ) -> Result<(Arc<SimChannelClient>, mpsc::Receiver<SessionEvent>), ChannelError> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let client = Arc::new(SimChannelClient {
            session_id: session_id.to_string(),
            auth_dir: session_auth_dir(&self.data_dir, session_id),
            events: tx.clone(),
            sequence: AtomicU64::new(0),
        });
        self.links.insert(session_id.to_string(), tx.downgrade());
        Ok((client, rx))
    }
}
