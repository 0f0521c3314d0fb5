//! SQLite session repository implementation.
//!
//! Implements `SessionRepository` from `outbox-core` with raw sqlx queries:
//! private Row structs for SQLite-to-domain mapping, reader pool for SELECTs,
//! writer pool for mutations, RFC 3339 TEXT timestamps.

use chrono::{DateTime, Utc};
use sqlx::Row;

use outbox_core::session::repository::SessionRepository;
use outbox_types::error::RepositoryError;
use outbox_types::session::{ChannelSession, SessionStatus};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ChannelSession.
struct SessionRow {
    session_id: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            session_id: row.try_get("session_id")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_session(self) -> Result<ChannelSession, RepositoryError> {
        let status: SessionStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChannelSession {
            session_id: self.session_id,
            status,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

pub(crate) fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid timestamp '{raw}': {e}")))
}

fn map_sqlx(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(db.message().to_string())
        }
        _ => RepositoryError::Query(e.to_string()),
    }
}

impl SessionRepository for SqliteSessionRepository {
    async fn create(&self, session: &ChannelSession) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO channel_sessions (session_id, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&session.session_id)
        .bind(session.status.to_string())
        .bind(session.created_at.to_rfc3339())
        .bind(session.updated_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<ChannelSession>, RepositoryError> {
        let row = sqlx::query(
            "SELECT session_id, status, created_at, updated_at
             FROM channel_sessions WHERE session_id = ?1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        row.map(|r| SessionRow::from_row(&r).map_err(map_sqlx)?.into_session())
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<ChannelSession>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT session_id, status, created_at, updated_at
             FROM channel_sessions ORDER BY created_at",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        rows.iter()
            .map(|r| SessionRow::from_row(r).map_err(map_sqlx)?.into_session())
            .collect()
    }

    async fn find_by_status(
        &self,
        status: SessionStatus,
    ) -> Result<Vec<ChannelSession>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT session_id, status, created_at, updated_at
             FROM channel_sessions WHERE status = ?1 ORDER BY session_id",
        )
        .bind(status.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        rows.iter()
            .map(|r| SessionRow::from_row(r).map_err(map_sqlx)?.into_session())
            .collect()
    }

    async fn upsert_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO channel_sessions (session_id, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT (session_id)
             DO UPDATE SET status = excluded.status, updated_at = excluded.updated_at",
        )
        .bind(session_id)
        .bind(status.to_string())
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }
}
