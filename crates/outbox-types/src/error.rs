use thiserror::Error;

/// Errors from repository operations (used by trait definitions in outbox-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the channel transport (connect/send failures).
///
/// Always caught at the boundary of the operation that triggered them and
/// converted to a typed outcome; never propagated as an unhandled fault.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("send failed: {0}")]
    Send(String),

    #[error("channel closed")]
    Closed,
}

/// Errors related to scheduled dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid scheduled time: '{0}'")]
    InvalidSchedule(String),

    #[error("storage error: {0}")]
    Storage(#[from] RepositoryError),
}
