//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PlayerStore` - Persistence for player stat lines
//! - `ChatStore` - Persistence for the chat transcript and cleanup ledger
//! - `AIProvider` - Completion model used as the extraction fallback

mod ai_provider;
mod chat_store;
mod player_store;

pub use ai_provider::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};
pub use chat_store::ChatStore;
pub use player_store::PlayerStore;
