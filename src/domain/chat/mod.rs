//! Chat module - the conversational statistics engine.
//!
//! # Module Organization
//!
//! - `message` - ChatMessage entity (the persisted transcript)
//! - `context` - Cue-vocabulary conversation context classifier
//! - `update` - ExtractedUpdate / AutoUpdateResult value objects
//! - `extractor` - Deterministic stat extraction plus fallback-output parsing
//! - `composer` - Human-readable acknowledgment templating
//! - `session` - Per-message session context supplied by the caller

mod composer;
mod context;
mod extractor;
mod message;
mod session;
mod update;

pub use composer::ResponseComposer;
pub use context::{classify, MessageContext};
pub use extractor::{StatExtractor, MIN_FALLBACK_CONFIDENCE};
pub use message::{ChatMessage, SYSTEM_AUTHOR};
pub use session::SessionContext;
pub use update::{AutoUpdateResult, ContextTag, ExtractedUpdate, UpdateSemantics};
