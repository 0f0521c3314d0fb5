//! Scheduled message types: the persisted message record and its delivery
//! status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Delivery status of a scheduled message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (status IN ('pending', 'sent', 'error'))`
///
/// Mutated exactly once after creation, by the dispatch job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Pending,
    Sent,
    Error,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Pending => write!(f, "pending"),
            DeliveryStatus::Sent => write!(f, "sent"),
            DeliveryStatus::Error => write!(f, "error"),
        }
    }
}

impl FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(DeliveryStatus::Pending),
            "sent" => Ok(DeliveryStatus::Sent),
            "error" => Ok(DeliveryStatus::Error),
            other => Err(format!("invalid delivery status: '{other}'")),
        }
    }
}

impl Default for DeliveryStatus {
    fn default() -> Self {
        DeliveryStatus::Pending
    }
}

/// A message scheduled for future delivery to one or more recipients.
///
/// Created with status `pending` at request time; the dispatch job is the
/// only mutator of `status` afterwards. Records are never deleted by the
/// core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMessage {
    pub id: Uuid,
    /// Session id the message is sent from.
    pub sender: String,
    /// Destination addresses, delivered in list order.
    pub recipients: Vec<String>,
    pub body: String,
    pub status: DeliveryStatus,
    pub scheduled_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ScheduledMessage {
    /// Build a fresh `pending` message with a generated id.
    pub fn new_pending(
        sender: impl Into<String>,
        recipients: Vec<String>,
        body: impl Into<String>,
        scheduled_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            sender: sender.into(),
            recipients,
            body: body.into(),
            status: DeliveryStatus::Pending,
            scheduled_time,
            created_at: Utc::now(),
        }
    }
}
