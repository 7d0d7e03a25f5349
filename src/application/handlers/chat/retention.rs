//! Retention - Periodic cleanup of the chat transcript.
//!
//! Messages older than the retention window are deleted, at most once per
//! window, and each run is recorded in the cleanup ledger so restarts do not
//! retrigger it early. A system notice is posted only when something was
//! actually deleted.

use std::sync::Arc;

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::ChatStore;

/// Default retention window in days.
pub const DEFAULT_RETENTION_DAYS: i64 = 14;

/// Outcome of a retention check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionOutcome {
    /// Whether a cleanup actually ran.
    pub ran: bool,
    /// Messages deleted (zero when `ran` is false).
    pub deleted: u64,
}

impl RetentionOutcome {
    fn skipped() -> Self {
        Self {
            ran: false,
            deleted: 0,
        }
    }
}

/// Handler for transcript retention.
pub struct RetentionHandler {
    chat: Arc<dyn ChatStore>,
    retention_days: i64,
}

impl RetentionHandler {
    pub fn new(chat: Arc<dyn ChatStore>) -> Self {
        Self {
            chat,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }

    /// Overrides the retention window.
    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention_days = days;
        self
    }

    /// Runs a cleanup if one is due.
    pub async fn handle(&self) -> Result<RetentionOutcome, DomainError> {
        let now = Timestamp::now();
        let window_start = now.minus_days(self.retention_days);

        if let Some(last) = self.chat.last_cleanup().await? {
            if last.is_after(&window_start) {
                return Ok(RetentionOutcome::skipped());
            }
        }

        let deleted = self.chat.delete_older_than(&window_start).await?;
        self.chat.record_cleanup(deleted).await?;
        tracing::info!(deleted, days = self.retention_days, "transcript cleanup ran");

        if deleted > 0 {
            let notice = ChatMessage::system(format!(
                "🧹 Limpieza automática: se eliminaron {} mensajes de más de {} días.",
                deleted, self.retention_days
            ))?;
            self.chat.append(&notice).await?;
        }

        Ok(RetentionOutcome { ran: true, deleted })
    }
}
