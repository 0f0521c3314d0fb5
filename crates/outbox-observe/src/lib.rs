//! Observability setup for Outbox.

pub mod tracing_setup;
