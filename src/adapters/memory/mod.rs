//! In-memory adapters for tests and local development.

mod chat_store;
mod player_store;

pub use chat_store::InMemoryChatStore;
pub use player_store::InMemoryPlayerStore;
