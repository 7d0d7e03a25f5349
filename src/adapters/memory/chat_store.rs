//! In-memory ChatStore implementation.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{ChatMessageId, DomainError, ErrorCode, Timestamp};
use crate::ports::ChatStore;

#[derive(Debug, Default)]
struct Inner {
    messages: Vec<ChatMessage>,
    cleanups: Vec<(Timestamp, u64)>,
}

/// In-memory chat transcript with a cleanup ledger.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the whole transcript, oldest first.
    pub async fn all(&self) -> Vec<ChatMessage> {
        let inner = self.inner.read().await;
        let mut messages = inner.messages.clone();
        messages.sort_by(|a, b| a.created_at().as_datetime().cmp(b.created_at().as_datetime()));
        messages
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), DomainError> {
        self.inner.write().await.messages.push(message.clone());
        Ok(())
    }

    async fn mark_processed(&self, id: ChatMessageId) -> Result<(), DomainError> {
        let mut inner = self.inner.write().await;
        match inner.messages.iter_mut().find(|m| m.id() == id) {
            Some(message) => {
                message.mark_processed();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::MessageNotFound,
                format!("Message {} not found", id),
            )),
        }
    }

    async fn list_since(&self, since: &Timestamp) -> Result<Vec<ChatMessage>, DomainError> {
        let inner = self.inner.read().await;
        let mut messages: Vec<ChatMessage> = inner
            .messages
            .iter()
            .filter(|m| !m.created_at().is_before(since))
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at().as_datetime().cmp(b.created_at().as_datetime()));
        Ok(messages)
    }

    async fn delete_older_than(&self, cutoff: &Timestamp) -> Result<u64, DomainError> {
        let mut inner = self.inner.write().await;
        let before = inner.messages.len();
        inner.messages.retain(|m| !m.created_at().is_before(cutoff));
        Ok((before - inner.messages.len()) as u64)
    }

    async fn last_cleanup(&self) -> Result<Option<Timestamp>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.cleanups.last().map(|(at, _)| *at))
    }

    async fn record_cleanup(&self, deleted: u64) -> Result<(), DomainError> {
        self.inner
            .write()
            .await
            .cleanups
            .push((Timestamp::now(), deleted));
        Ok(())
    }
}
