//! Scheduled dispatch: durable queue of future outbound messages.

pub mod queue;
pub mod repository;

pub use queue::{DispatchQueue, OutboundSender, ScheduleRequest};
pub use repository::ScheduledMessageRepository;
