// SQLite MessageStore Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use courier_core::domain::Message;
use courier_core::error::{AppError, Result};
use courier_core::port::MessageStore;
use sqlx::SqlitePool;

pub struct SqliteMessageStore {
    pool: SqlitePool,
}

impl SqliteMessageStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn create(&self, message: &Message) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, queue_id, content_type, body, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.queue_id)
        .bind(&message.content_type)
        .bind(&message.body)
        .bind(message.created_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_one(&self, queue_id: &str, message_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE queue_id = ? AND id = ?")
            .bind(queue_id)
            .bind(message_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn next_for(&self, queue_id: &str) -> Result<Option<Message>> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, queue_id, content_type, body, created_at
            FROM messages
            WHERE queue_id = ?
            ORDER BY created_at ASC, seq ASC
            LIMIT 1
            "#,
        )
        .bind(queue_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(MessageRow::into_message).transpose()
    }

    async fn take_next(&self, queue_id: &str) -> Result<Option<Message>> {
        // Single statement: select-and-delete cannot interleave with another pop
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            DELETE FROM messages
            WHERE seq = (
                SELECT seq FROM messages
                WHERE queue_id = ?
                ORDER BY created_at ASC, seq ASC
                LIMIT 1
            )
            RETURNING id, queue_id, content_type, body, created_at
            "#,
        )
        .bind(queue_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(MessageRow::into_message).transpose()
    }

    async fn count_for(&self, queue_id: &str) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE queue_id = ?")
            .bind(queue_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn purge(&self, queue_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE queue_id = ?")
            .bind(queue_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn total_count(&self) -> Result<Option<i64>> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Some(count))
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: String,
    queue_id: String,
    content_type: String,
    body: Vec<u8>,
    /// Epoch milliseconds
    created_at: i64,
}

impl MessageRow {
    fn into_message(self) -> Result<Message> {
        let created_at = DateTime::<Utc>::from_timestamp_millis(self.created_at).ok_or_else(|| {
            AppError::Storage(format!(
                "Message {} has out-of-range created_at {}",
                self.id, self.created_at
            ))
        })?;

        Ok(Message {
            id: self.id,
            queue_id: self.queue_id,
            content_type: self.content_type,
            body: self.body,
            created_at,
        })
    }
}
