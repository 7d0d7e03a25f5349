//! Chat pipeline handlers.
//!
//! - `ResolveUpdatesHandler` - Applies extracted updates to the player store
//! - `ProcessMessageHandler` - The full classify/extract/fallback/apply pipeline
//! - `RetentionHandler` - Periodic transcript cleanup

mod process_message;
mod resolve_updates;
mod retention;

pub use process_message::{ProcessMessageCommand, ProcessMessageHandler, ProcessMessageResult};
pub use resolve_updates::{ResolveUpdatesCommand, ResolveUpdatesHandler};
pub use retention::{RetentionHandler, RetentionOutcome};
