//! SQLite persistence: pool and repository implementations.

pub mod message;
pub mod pool;
pub mod session;

pub use message::SqliteScheduledMessageRepository;
pub use pool::DatabasePool;
pub use session::SqliteSessionRepository;
