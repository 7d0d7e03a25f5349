//! ChatMessage entity - one turn in the conversation thread.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChatMessageId, DomainError, Timestamp};

/// Author name used for system-generated transcript entries.
pub const SYSTEM_AUTHOR: &str = "Sistema";

/// One turn in the chat thread.
///
/// # Invariants
///
/// - `body` is non-empty (validated at construction)
/// - only the processed flag is ever mutated after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: ChatMessageId,
    author_name: String,
    body: String,
    processed: bool,
    created_at: Timestamp,
}

impl ChatMessage {
    /// Creates a new unprocessed message from a user.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if author or body is blank
    pub fn user(
        author_name: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let author_name = author_name.into();
        let body = body.into();

        if author_name.trim().is_empty() {
            return Err(DomainError::validation(
                "author_name",
                "Author name cannot be empty",
            ));
        }
        if body.trim().is_empty() {
            return Err(DomainError::validation(
                "body",
                "Message body cannot be empty",
            ));
        }

        Ok(Self {
            id: ChatMessageId::new(),
            author_name,
            body,
            processed: false,
            created_at: Timestamp::now(),
        })
    }

    /// Creates a system-authored message, already marked processed so the
    /// pipeline never re-analyzes its own output.
    pub fn system(body: impl Into<String>) -> Result<Self, DomainError> {
        let mut message = Self::user(SYSTEM_AUTHOR, body)?;
        message.processed = true;
        Ok(message)
    }

    /// Reconstitutes a message from persistence (no validation).
    pub fn reconstitute(
        id: ChatMessageId,
        author_name: String,
        body: String,
        processed: bool,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            author_name,
            body,
            processed,
            created_at,
        }
    }

    /// Flips the processed flag.
    pub fn mark_processed(&mut self) {
        self.processed = true;
    }

    /// Returns the message ID.
    pub fn id(&self) -> ChatMessageId {
        self.id
    }

    /// Returns the author display name.
    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    /// Returns the body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true once the pipeline has handled this message.
    pub fn is_processed(&self) -> bool {
        self.processed
    }

    /// Returns when the message was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns true if this entry was authored by the system.
    pub fn is_system(&self) -> bool {
        self.author_name == SYSTEM_AUTHOR
    }
}
