//! Chat retention configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Chat retention configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    /// How many days of transcript to keep
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
}

impl RetentionConfig {
    /// Validate retention configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.retention_days < 1 {
            return Err(ValidationError::InvalidRetentionWindow);
        }
        Ok(())
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
        }
    }
}

fn default_retention_days() -> i64 {
    14
}
