//! PostgreSQL adapters - Database implementations for the store ports.
//!
//! - `PostgresPlayerStore` - players table
//! - `PostgresChatStore` - comments and auto_cleanups tables

mod chat_store;
mod player_store;

pub use chat_store::PostgresChatStore;
pub use player_store::PostgresPlayerStore;
