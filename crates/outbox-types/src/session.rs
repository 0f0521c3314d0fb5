//! Channel session types: the persisted session record, its lifecycle status,
//! and the typed outcomes of start/send operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Persisted lifecycle status of a channel session.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('pending', 'initializing', 'ready', 'disconnected', 'error'))`
///
/// `Ready` and the transient authenticated phase both mean "usable"; only the
/// states listed here are written to storage. `Disconnected` and `Error` are
/// recoverable by a fresh start, not terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pending,
    Initializing,
    Ready,
    Disconnected,
    Error,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Pending => write!(f, "pending"),
            SessionStatus::Initializing => write!(f, "initializing"),
            SessionStatus::Ready => write!(f, "ready"),
            SessionStatus::Disconnected => write!(f, "disconnected"),
            SessionStatus::Error => write!(f, "error"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SessionStatus::Pending),
            "initializing" => Ok(SessionStatus::Initializing),
            "ready" => Ok(SessionStatus::Ready),
            "disconnected" => Ok(SessionStatus::Disconnected),
            "error" => Ok(SessionStatus::Error),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        SessionStatus::Pending
    }
}

/// A persisted channel session record.
///
/// The record and the in-memory handle may diverge transiently; every state
/// transition reconciles them by writing the record. Records survive
/// disconnects for audit and boot-time reconnection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSession {
    /// Caller-supplied unique key, trimmed at creation.
    pub session_id: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChannelSession {
    /// Build a fresh `pending` record for a new session id.
    pub fn new_pending(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            status: SessionStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Outcome of a `start_session` call, surfaced to the API caller as a typed
/// status string rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartStatus {
    Initializing,
    AlreadyStarted,
    NotFound,
    Error,
}

impl fmt::Display for StartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartStatus::Initializing => write!(f, "initializing"),
            StartStatus::AlreadyStarted => write!(f, "already-started"),
            StartStatus::NotFound => write!(f, "not-found"),
            StartStatus::Error => write!(f, "error"),
        }
    }
}

/// Outcome of a single outbound send.
///
/// Serializes to the wire shape `{"status": "success", "messageId": ...}` or
/// `{"status": "error", "error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SendOutcome {
    Success {
        #[serde(rename = "messageId")]
        message_id: String,
    },
    Error {
        error: String,
    },
}

impl SendOutcome {
    pub fn success(message_id: impl Into<String>) -> Self {
        SendOutcome::Success {
            message_id: message_id.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        SendOutcome::Error {
            error: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Success { .. })
    }
}
