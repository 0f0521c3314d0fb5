//! Channel transport traits.
//!
//! The underlying messaging-channel client library is an external
//! collaborator: it can connect, send, and emit lifecycle/message events.
//! These traits are the seam; `outbox-infra` ships a simulated implementation
//! and a production transport plugs in the same way.
//!
//! Uses native async fn in traits (Rust 2024 edition, no async_trait macro).

use std::sync::Arc;

use tokio::sync::mpsc;

use outbox_types::error::ChannelError;
use outbox_types::event::SessionEvent;

/// Capacity of the per-session event channel between transport and event loop.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A live handle to one channel connection.
///
/// Exclusively owned by the session registry for its session id; dropping the
/// last reference tears the connection down.
pub trait ChannelClient: Send + Sync + 'static {
    /// Establish the connection. Resolves once the transport has accepted the
    /// connection attempt; readiness is signalled later via
    /// [`SessionEvent::Ready`].
    fn connect(&self) -> impl Future<Output = Result<(), ChannelError>> + Send;

    /// Send a text message to a canonical channel address. Returns the
    /// channel-assigned message id.
    fn send_text(
        &self,
        recipient: &str,
        body: &str,
    ) -> impl Future<Output = Result<String, ChannelError>> + Send;
}

/// Opens channel clients, one per session id.
///
/// The factory resolves per-session authentication state (credential/profile
/// directory keyed by session id) and returns the client together with the
/// receiving end of its event stream. The stream ends when the client is
/// dropped.
pub trait ChannelFactory: Send + Sync + 'static {
    type Client: ChannelClient;

    fn open(
        &self,
        session_id: &str,
    ) -> Result<(Arc<Self::Client>, mpsc::Receiver<SessionEvent>), ChannelError>;
}
