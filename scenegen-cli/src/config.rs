//! CLI configuration
//!
//! Connection settings for the generation backend.

use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL (e.g., "http://localhost:3000")
    pub base_url: String,

    /// Client identifier sent with every request
    pub client_id: String,

    /// Poll interval applied to submitted jobs
    pub default_poll_interval: Duration,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if self.default_poll_interval.is_zero() {
            anyhow::bail!("poll interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            client_id: uuid::Uuid::new_v4().to_string(),
            default_poll_interval: Duration::from_secs(1),
        }
    }
}
