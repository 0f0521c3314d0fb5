//! Core business logic for Outbox.
//!
//! Three pillars:
//! - [`session`]: the in-memory session registry and the session lifecycle
//!   manager (start, send, boot-time restore, per-session event loop).
//! - [`dispatch`]: the scheduled dispatch queue (validate, persist, one-shot
//!   delayed jobs with bounded retries).
//! - [`reply`]: the auto-reply engine riding on inbound session events.
//!
//! Plus two pure leaves, [`phone`] and [`hours`], and the [`channel`] traits
//! that `outbox-infra` (or a real transport) implements. This crate never
//! depends on `outbox-infra`.

pub mod channel;
pub mod dispatch;
pub mod hours;
pub mod phone;
pub mod reply;
pub mod session;

#[cfg(test)]
pub(crate) mod testutil;
