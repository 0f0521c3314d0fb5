//! SQLite scheduled message repository implementation.
//!
//! Same patterns as `SqliteSessionRepository`: raw queries, private Row
//! structs, split reader/writer pool usage. The recipients list is stored as
//! a JSON TEXT column.

use sqlx::Row;
use uuid::Uuid;

use outbox_core::dispatch::repository::ScheduledMessageRepository;
use outbox_types::error::RepositoryError;
use outbox_types::message::{DeliveryStatus, ScheduledMessage};

use super::pool::DatabasePool;
use super::session::parse_datetime;

/// SQLite-backed implementation of `ScheduledMessageRepository`.
pub struct SqliteScheduledMessageRepository {
    pool: DatabasePool,
}

impl SqliteScheduledMessageRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ScheduledMessage.
struct MessageRow {
    id: String,
    sender: String,
    recipients: String,
    body: String,
    status: String,
    scheduled_time: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sender: row.try_get("sender")?,
            recipients: row.try_get("recipients")?,
            body: row.try_get("body")?,
            status: row.try_get("status")?,
            scheduled_time: row.try_get("scheduled_time")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ScheduledMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let recipients: Vec<String> = serde_json::from_str(&self.recipients)
            .map_err(|e| RepositoryError::Query(format!("invalid recipients column: {e}")))?;
        let status: DeliveryStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ScheduledMessage {
            id,
            sender: self.sender,
            recipients,
            body: self.body,
            status,
            scheduled_time: parse_datetime(&self.scheduled_time)?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn map_sqlx(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

impl ScheduledMessageRepository for SqliteScheduledMessageRepository {
    async fn create(&self, message: &ScheduledMessage) -> Result<(), RepositoryError> {
        let recipients = serde_json::to_string(&message.recipients)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO scheduled_messages (id, sender, recipients, body, status, scheduled_time, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(message.id.to_string())
        .bind(&message.sender)
        .bind(recipients)
        .bind(&message.body)
        .bind(message.status.to_string())
        .bind(message.scheduled_time.to_rfc3339())
        .bind(message.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<ScheduledMessage>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, sender, recipients, body, status, scheduled_time, created_at
             FROM scheduled_messages WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        row.map(|r| MessageRow::from_row(&r).map_err(map_sqlx)?.into_message())
            .transpose()
    }

    async fn find_by_status(
        &self,
        status: DeliveryStatus,
    ) -> Result<Vec<ScheduledMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, sender, recipients, body, status, scheduled_time, created_at
             FROM scheduled_messages WHERE status = ?1 ORDER BY scheduled_time",
        )
        .bind(status.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx)?;

        rows.iter()
            .map(|r| MessageRow::from_row(r).map_err(map_sqlx)?.into_message())
            .collect()
    }

    async fn update_status(&self, id: &Uuid, status: DeliveryStatus) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE scheduled_messages SET status = ?1 WHERE id = ?2")
            .bind(status.to_string())
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
