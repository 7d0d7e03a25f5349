//! Player module - the stat line aggregate.
//!
//! A `PlayerStatLine` is one player's cumulative performance record. The
//! merge policy for chat-driven updates (replace / increment / correct)
//! lives here so stores only ever receive the already-resolved field values.

mod position;
mod stat_line;

pub use position::Position;
pub use stat_line::{PlayerStatLine, StatPatch, DEFAULT_CARD_THEME, UNKNOWN_TEAM};
