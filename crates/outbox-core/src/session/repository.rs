//! Session repository trait definition.
//!
//! Storage interface for persisted session records. The infrastructure layer
//! (outbox-infra) implements this trait with SQLite persistence.
//!
//! Uses native async fn in traits (Rust 2024 edition, no async_trait macro).

use outbox_types::error::RepositoryError;
use outbox_types::session::{ChannelSession, SessionStatus};

/// Repository trait for channel session persistence.
pub trait SessionRepository: Send + Sync + 'static {
    /// Persist a new session record. Returns `Conflict` if the id exists.
    fn create(
        &self,
        session: &ChannelSession,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Look up a session record by id.
    fn find_by_id(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<Option<ChannelSession>, RepositoryError>> + Send;

    /// All persisted session records.
    fn find_all(
        &self,
    ) -> impl Future<Output = Result<Vec<ChannelSession>, RepositoryError>> + Send;

    /// All session records currently in the given status.
    fn find_by_status(
        &self,
        status: SessionStatus,
    ) -> impl Future<Output = Result<Vec<ChannelSession>, RepositoryError>> + Send;

    /// Record a status transition, creating the record if it does not exist.
    ///
    /// Upsert semantics: a `ready` event may arrive for a session whose
    /// creation raced the connection attempt.
    fn upsert_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
