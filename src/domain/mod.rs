//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `player` - Player stat line aggregate and merge policy
//! - `chat` - Conversational analysis engine (classifier, extractor, composer)

pub mod chat;
pub mod foundation;
pub mod player;
