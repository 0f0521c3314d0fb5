//! Channel lifecycle and inbound-message events.
//!
//! The transport emits these on a per-session channel; the session event loop
//! consumes them in order, so ready/disconnected/message handling for one
//! session never races itself.

use serde::{Deserialize, Serialize};

/// An inbound message received on a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Channel address of the counterpart (e.g. `556195010011@c.us`).
    pub from: String,
    pub body: String,
    /// Push name advertised by the counterpart, when the transport knows it.
    pub notify_name: Option<String>,
    /// Stored contact name, when the transport knows it.
    pub contact_name: Option<String>,
    /// True when the message was sent by the session owner itself.
    pub from_me: bool,
}

/// A lifecycle or message event emitted by the channel transport for one
/// session.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Pairing code to display; emitted until the session authenticates.
    Qr(String),
    Ready,
    Authenticated,
    Disconnected { reason: String },
    Message(InboundMessage),
}
