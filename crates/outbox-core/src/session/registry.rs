//! In-memory registry of live channel handles.
//!
//! Owns the invariant "at most one live channel handle per session id".
//! Registration is an atomic check-and-insert through the dashmap entry API,
//! so two concurrent starts for the same id cannot both win — there is no
//! window between the existence check and the insert.
//!
//! The registry also hosts the shared outbound send path, used by both
//! `SessionManager::send` and the auto-reply engine.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use outbox_types::session::SendOutcome;

use crate::channel::ChannelClient;
use crate::phone::format_phone_number;

/// Map from session id to its single live channel handle.
pub struct SessionRegistry<C> {
    handles: DashMap<String, Arc<C>>,
}

impl<C: ChannelClient> SessionRegistry<C> {
    pub fn new() -> Self {
        Self {
            handles: DashMap::new(),
        }
    }

    /// Whether a live handle exists for this id.
    pub fn contains(&self, session_id: &str) -> bool {
        self.handles.contains_key(session_id)
    }

    /// Atomically register a handle for `session_id`.
    ///
    /// Returns `false` without touching the map if a handle is already
    /// registered; the caller must then drop its handle unconnected.
    pub fn try_register(&self, session_id: &str, client: Arc<C>) -> bool {
        match self.handles.entry(session_id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(client);
                true
            }
        }
    }

    /// Clone out the handle for `session_id`, if registered.
    pub fn get(&self, session_id: &str) -> Option<Arc<C>> {
        self.handles.get(session_id).map(|h| Arc::clone(h.value()))
    }

    /// Remove and return the handle for `session_id`.
    pub fn remove(&self, session_id: &str) -> Option<Arc<C>> {
        self.handles.remove(session_id).map(|(_, client)| client)
    }

    /// Snapshot of currently registered session ids. No ordering guarantee.
    pub fn session_ids(&self) -> Vec<String> {
        self.handles.iter().map(|h| h.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Send a text message through the session's handle.
    ///
    /// Fails with a typed error outcome naming the session id when no handle
    /// is registered; no transport call is made in that case. The recipient
    /// is canonicalized to the channel address form before sending.
    pub async fn send(&self, session_id: &str, recipient: &str, body: &str) -> SendOutcome {
        let Some(client) = self.get(session_id) else {
            let error = format!("session {session_id} is not active");
            tracing::error!(%session_id, "send rejected: {error}");
            return SendOutcome::error(error);
        };

        let address = format_phone_number(recipient);
        match client.send_text(&address, body).await {
            Ok(message_id) => SendOutcome::success(message_id),
            Err(e) => {
                tracing::error!(%session_id, recipient = %address, error = %e, "send failed");
                SendOutcome::error(e.to_string())
            }
        }
    }
}

impl<C: ChannelClient> Default for SessionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
