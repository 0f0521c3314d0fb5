//! Application state wiring all services together.
//!
//! The core types are generic over channel-factory and repository traits;
//! AppState pins them to the concrete infra implementations used by both the
//! CLI and the REST API.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use outbox_core::dispatch::DispatchQueue;
use outbox_core::reply::AutoReplyEngine;
use outbox_core::session::{SessionManager, SessionRegistry};
use outbox_infra::channel::SimChannelFactory;
use outbox_infra::config::{database_url, resolve_data_dir};
use outbox_infra::sqlite::pool::DatabasePool;
use outbox_infra::sqlite::{SqliteScheduledMessageRepository, SqliteSessionRepository};
use outbox_types::config::BusinessHours;

/// Concrete type aliases for the core generics pinned to infra implementations.
pub type ConcreteSessionManager = SessionManager<SimChannelFactory, SqliteSessionRepository>;

pub type ConcreteDispatchQueue =
    DispatchQueue<ConcreteSessionManager, SqliteScheduledMessageRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub session_manager: Arc<ConcreteSessionManager>,
    pub dispatch_queue: Arc<ConcreteDispatchQueue>,
    pub session_repo: Arc<SqliteSessionRepository>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state from the environment.
    pub async fn init() -> anyhow::Result<Self> {
        Self::init_at(&resolve_data_dir()).await
    }

    /// Initialize against an explicit data directory (used by tests).
    pub async fn init_at(data_dir: &Path) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let db_pool = DatabasePool::new(&database_url(data_dir)).await?;

        let session_repo = Arc::new(SqliteSessionRepository::new(db_pool.clone()));
        let message_repo = Arc::new(SqliteScheduledMessageRepository::new(db_pool.clone()));

        // The registry is shared between the manager (lifecycle, sends) and
        // the auto-reply engine (delivery of replies).
        let registry = Arc::new(SessionRegistry::new());
        let auto_reply = Arc::new(AutoReplyEngine::new(
            Arc::clone(&registry),
            BusinessHours::default(),
        ));

        let factory = SimChannelFactory::new(data_dir.to_path_buf());
        let session_manager = Arc::new(SessionManager::new(
            factory,
            Arc::clone(&session_repo),
            registry,
            auto_reply,
        ));

        let dispatch_queue = Arc::new(DispatchQueue::new(
            Arc::clone(&session_manager),
            message_repo,
        ));

        Ok(Self {
            session_manager,
            dispatch_queue,
            session_repo,
            data_dir: data_dir.to_path_buf(),
            db_pool,
        })
    }
}
