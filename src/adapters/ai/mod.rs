//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `DeepSeekProvider` - DeepSeek chat models via the OpenAI-compatible API

mod deepseek_provider;
mod mock_provider;

pub use deepseek_provider::{DeepSeekConfig, DeepSeekProvider};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
