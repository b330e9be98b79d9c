//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `roomee-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct for column mapping,
//! writes on the writer pool and reads on the reader pool.

use chrono::{DateTime, Utc};
use roomee_core::message::MessageRepository;
use roomee_types::error::RepositoryError;
use roomee_types::message::ChatMessage;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
///
/// `id` is the table's AUTOINCREMENT rowid, so it is store-assigned and
/// strictly increasing -- the tiebreaker for messages persisted within the
/// same clock tick.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ChatMessage.
struct MessageRow {
    id: i64,
    sender_id: String,
    recipient_id: String,
    content: String,
    sent_at: String,
    read: bool,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sender_id: row.try_get("sender_id")?,
            recipient_id: row.try_get("recipient_id")?,
            content: row.try_get("content")?,
            sent_at: row.try_get("sent_at")?,
            read: row.try_get("read")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let sent_at = parse_datetime(&self.sent_at)?;
        Ok(ChatMessage {
            id: self.id,
            sender_id: self.sender_id,
            recipient_id: self.recipient_id,
            content: self.content,
            sent_at,
            read: self.read,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

impl MessageRepository for SqliteMessageRepository {
    async fn append(
        &self,
        sender_id: &str,
        recipient_id: &str,
        content: &str,
    ) -> Result<ChatMessage, RepositoryError> {
        let sent_at = Utc::now();

        let result = sqlx::query(
            r#"INSERT INTO messages (sender_id, recipient_id, content, sent_at, read)
               VALUES (?, ?, ?, ?, 0)"#,
        )
        .bind(sender_id)
        .bind(recipient_id)
        .bind(content)
        .bind(format_datetime(&sent_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(ChatMessage {
            id: result.last_insert_rowid(),
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            content: content.to_string(),
            sent_at,
            read: false,
        })
    }

    async fn history_between(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM messages
               WHERE (sender_id = ? AND recipient_id = ?)
                  OR (sender_id = ? AND recipient_id = ?)
               ORDER BY sent_at ASC, id ASC"#,
        )
        .bind(a)
        .bind(b)
        .bind(b)
        .bind(a)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }
}
