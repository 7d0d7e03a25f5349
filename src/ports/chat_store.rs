//! Chat Store Port - Persistence interface for the transcript and the
//! retention ledger.

use async_trait::async_trait;

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{ChatMessageId, DomainError, Timestamp};

/// Port for the chat transcript and its cleanup bookkeeping.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Appends one message to the transcript.
    async fn append(&self, message: &ChatMessage) -> Result<(), DomainError>;

    /// Marks a stored message as processed.
    ///
    /// # Errors
    ///
    /// - `MessageNotFound` if no row matches `id`
    async fn mark_processed(&self, id: ChatMessageId) -> Result<(), DomainError>;

    /// Lists messages created at or after `since`, oldest first.
    async fn list_since(&self, since: &Timestamp) -> Result<Vec<ChatMessage>, DomainError>;

    /// Deletes messages created before `cutoff`, returning how many went.
    async fn delete_older_than(&self, cutoff: &Timestamp) -> Result<u64, DomainError>;

    /// When the last retention cleanup ran, if ever.
    async fn last_cleanup(&self) -> Result<Option<Timestamp>, DomainError>;

    /// Records that a cleanup ran now and deleted `deleted` messages.
    async fn record_cleanup(&self, deleted: u64) -> Result<(), DomainError>;
}
