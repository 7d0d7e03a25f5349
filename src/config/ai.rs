//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration for the fallback extraction path.
///
/// When no API key is configured the fallback is simply disabled and the
/// engine runs on deterministic patterns alone.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// DeepSeek API key
    pub deepseek_api_key: Option<String>,

    /// Base URL for the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for extraction prompts
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Token cap for extraction completions
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Minimum confidence for fallback-extracted updates
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if the DeepSeek fallback is configured
    pub fn has_deepseek(&self) -> bool {
        self.deepseek_api_key
            .as_ref()
            .is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ValidationError::InvalidConfidenceFloor);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            deepseek_api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            min_confidence: default_min_confidence(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

fn default_min_confidence() -> f64 {
    0.8
}
