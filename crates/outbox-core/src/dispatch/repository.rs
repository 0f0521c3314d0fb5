//! Scheduled message repository trait definition.
//!
//! Storage interface for scheduled message records. The infrastructure layer
//! (outbox-infra) implements this trait with SQLite persistence.
//!
//! Uses native async fn in traits (Rust 2024 edition, no async_trait macro).

use uuid::Uuid;

use outbox_types::error::RepositoryError;
use outbox_types::message::{DeliveryStatus, ScheduledMessage};

/// Repository trait for scheduled message persistence.
pub trait ScheduledMessageRepository: Send + Sync + 'static {
    /// Persist a new scheduled message record.
    fn create(
        &self,
        message: &ScheduledMessage,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Look up a scheduled message by id.
    fn find_by_id(
        &self,
        id: &Uuid,
    ) -> impl Future<Output = Result<Option<ScheduledMessage>, RepositoryError>> + Send;

    /// All scheduled messages currently in the given status.
    fn find_by_status(
        &self,
        status: DeliveryStatus,
    ) -> impl Future<Output = Result<Vec<ScheduledMessage>, RepositoryError>> + Send;

    /// Record a delivery status transition. Returns `NotFound` if the id is
    /// unknown.
    fn update_status(
        &self,
        id: &Uuid,
        status: DeliveryStatus,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
