//! PostgreSQL implementation of ChatStore.
//!
//! The transcript lives in the `comments` table; retention runs are recorded
//! in `auto_cleanups` so restarts do not retrigger cleanup early.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{ChatMessageId, DomainError, ErrorCode, Timestamp};
use crate::ports::ChatStore;

/// PostgreSQL implementation of ChatStore.
#[derive(Clone)]
pub struct PostgresChatStore {
    pool: PgPool,
}

impl PostgresChatStore {
    /// Creates a new PostgresChatStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatStore for PostgresChatStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO comments (id, author_name, body, processed, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(message.id().as_uuid())
        .bind(message.author_name())
        .bind(message.body())
        .bind(message.is_processed())
        .bind(message.created_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert message: {}", e),
            )
        })?;

        Ok(())
    }

    async fn mark_processed(&self, id: ChatMessageId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE comments SET processed = TRUE WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to mark message processed: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::MessageNotFound,
                format!("Message not found: {}", id),
            ));
        }

        Ok(())
    }

    async fn list_since(&self, since: &Timestamp) -> Result<Vec<ChatMessage>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, author_name, body, processed, created_at
            FROM comments
            WHERE created_at >= $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(since.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list messages: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_message).collect()
    }

    async fn delete_older_than(&self, cutoff: &Timestamp) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM comments WHERE created_at < $1")
            .bind(cutoff.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete old messages: {}", e),
                )
            })?;

        Ok(result.rows_affected())
    }

    async fn last_cleanup(&self) -> Result<Option<Timestamp>, DomainError> {
        let row = sqlx::query(
            "SELECT executed_at FROM auto_cleanups ORDER BY executed_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to read cleanup ledger: {}", e),
            )
        })?;

        match row {
            Some(row) => {
                let executed_at: chrono::DateTime<chrono::Utc> =
                    row.try_get("executed_at").map_err(|e| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Failed to read cleanup row: {}", e),
                        )
                    })?;
                Ok(Some(Timestamp::from_datetime(executed_at)))
            }
            None => Ok(None),
        }
    }

    async fn record_cleanup(&self, deleted: u64) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO auto_cleanups (id, deleted_count, executed_at) VALUES ($1, $2, $3)",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(deleted as i64)
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to record cleanup: {}", e),
            )
        })?;

        Ok(())
    }
}

fn row_to_message(row: sqlx::postgres::PgRow) -> Result<ChatMessage, DomainError> {
    let db_error = |e: sqlx::Error| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to read message row: {}", e),
        )
    };

    let id: uuid::Uuid = row.try_get("id").map_err(db_error)?;
    let author_name: String = row.try_get("author_name").map_err(db_error)?;
    let body: String = row.try_get("body").map_err(db_error)?;
    let processed: bool = row.try_get("processed").map_err(db_error)?;
    let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at").map_err(db_error)?;

    Ok(ChatMessage::reconstitute(
        ChatMessageId::from_uuid(id),
        author_name,
        body,
        processed,
        Timestamp::from_datetime(created_at),
    ))
}
