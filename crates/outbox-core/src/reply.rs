//! Auto-reply engine for inbound session messages.
//!
//! Replies at most once per (session, counterpart) pair within the process
//! lifetime: the dedup set is in-memory only and resets on restart. The reply
//! body depends on whether the message arrived inside business hours.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use dashmap::DashMap;

use outbox_types::config::BusinessHours;
use outbox_types::event::InboundMessage;
use outbox_types::session::SendOutcome;

use crate::channel::ChannelClient;
use crate::hours::is_business_hours;
use crate::session::registry::SessionRegistry;

/// Fallback display name when the transport knows neither a push name nor a
/// contact name for the counterpart.
const FALLBACK_NAME: &str = "friend";

/// Inbound command answered immediately, bypassing the dedup set.
const PING_COMMAND: &str = "!ping";
const PING_REPLY: &str = "Pong! 🏓";

const OPEN_HOURS_BODY: &str =
    "Thanks for reaching out. One of our agents will get back to you shortly.";
const CLOSED_HOURS_BODY: &str =
    "You've reached us outside business hours. We'll reply on the next business day.";

/// Outcome of handling one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    Sent,
    AlreadySent,
    Skipped,
    Error,
}

/// Sends automatic replies to inbound messages on active sessions.
///
/// Holds the shared session registry for delivery and a per-session set of
/// counterpart addresses already replied to. A failed delivery does not mark
/// the counterpart, so the next inbound message retries.
pub struct AutoReplyEngine<C> {
    registry: Arc<SessionRegistry<C>>,
    replied: DashMap<String, HashSet<String>>,
    hours: BusinessHours,
}

impl<C: ChannelClient> AutoReplyEngine<C> {
    pub fn new(registry: Arc<SessionRegistry<C>>, hours: BusinessHours) -> Self {
        Self {
            registry,
            replied: DashMap::new(),
            hours,
        }
    }

    /// Handle one inbound message, possibly sending an automatic reply.
    pub async fn on_inbound(&self, session_id: &str, message: &InboundMessage) -> ReplyStatus {
        if message.from_me {
            return ReplyStatus::Skipped;
        }

        if message.body == PING_COMMAND {
            return match self.registry.send(session_id, &message.from, PING_REPLY).await {
                SendOutcome::Success { .. } => {
                    tracing::info!(%session_id, from = %message.from, "answered ping");
                    ReplyStatus::Sent
                }
                SendOutcome::Error { error } => {
                    tracing::error!(%session_id, from = %message.from, %error, "ping reply failed");
                    ReplyStatus::Error
                }
            };
        }

        if self.already_replied(session_id, &message.from) {
            tracing::debug!(%session_id, from = %message.from, "auto-reply already sent");
            return ReplyStatus::AlreadySent;
        }

        let name = display_name(message);
        let body = compose_reply(name, &Local::now(), &self.hours);

        match self.registry.send(session_id, &message.from, &body).await {
            SendOutcome::Success { .. } => {
                self.mark_replied(session_id, &message.from);
                tracing::info!(%session_id, from = %message.from, "auto-reply sent");
                ReplyStatus::Sent
            }
            SendOutcome::Error { error } => {
                // Not marked: a later inbound message retries the reply.
                tracing::error!(%session_id, from = %message.from, %error, "auto-reply failed");
                ReplyStatus::Error
            }
        }
    }

    fn already_replied(&self, session_id: &str, from: &str) -> bool {
        self.replied
            .get(session_id)
            .is_some_and(|set| set.contains(from))
    }

    fn mark_replied(&self, session_id: &str, from: &str) {
        self.replied
            .entry(session_id.to_string())
            .or_default()
            .insert(from.to_string());
    }
}

/// Resolve the counterpart's display name: push name, then contact name, then
/// a fixed fallback. Never fails harder than the fallback.
fn display_name(message: &InboundMessage) -> &str {
    message
        .notify_name
        .as_deref()
        .or(message.contact_name.as_deref())
        .unwrap_or(FALLBACK_NAME)
}

/// Compose the canned reply for a counterpart at a given instant.
///
/// Pure so tests can pin the instant; `on_inbound` evaluates it at the
/// current local time.
fn compose_reply<Tz: TimeZone>(name: &str, now: &DateTime<Tz>, hours: &BusinessHours) -> String {
    let body = if is_business_hours(now, hours) {
        OPEN_HOURS_BODY
    } else {
        CLOSED_HOURS_BODY
    };
    format!("Hi {name}! {body}")
}
