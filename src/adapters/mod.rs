//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Completion providers (DeepSeek, mock)
//! - `memory` - In-memory stores for tests and local development
//! - `postgres` - Postgres-backed stores

pub mod ai;
pub mod memory;
pub mod postgres;
