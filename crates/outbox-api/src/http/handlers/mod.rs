//! HTTP request handlers.

pub mod schedule;
pub mod session;
