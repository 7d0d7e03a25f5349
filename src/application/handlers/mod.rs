//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod chat;

pub use chat::{
    ProcessMessageCommand, ProcessMessageHandler, ProcessMessageResult,
    ResolveUpdatesCommand, ResolveUpdatesHandler,
    RetentionHandler, RetentionOutcome,
};
