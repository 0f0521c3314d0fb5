//! Channel transport implementations.
//!
//! The messaging-channel client library is an external collaborator; any
//! transport that implements `outbox_core::channel::{ChannelFactory,
//! ChannelClient}` plugs into the session manager unchanged. This module
//! ships [`sim`], an in-process simulator used by the dev server and tests.

pub mod sim;

pub use sim::SimChannelFactory;
