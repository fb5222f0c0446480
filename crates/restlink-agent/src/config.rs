//! Agent configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use restlink_api::DEFAULT_TIMEOUT;
use restlink_core::DEFAULT_SCAN_INTERVAL;

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Device host address, e.g. `192.168.1.40:8123`
    pub host: String,

    /// Fetch interval
    pub scan_interval: Duration,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: "localhost:8080".to_string(),
            scan_interval: DEFAULT_SCAN_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AgentConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RESTLINK_HOST`: Device host address (required)
    /// - `RESTLINK_SCAN_INTERVAL`: Fetch interval in seconds
    /// - `RESTLINK_TIMEOUT`: Request timeout in seconds
    ///
    /// # Errors
    ///
    /// Returns error if `RESTLINK_HOST` is missing or a value fails to
    /// parse.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        config.host = std::env::var("RESTLINK_HOST").context("RESTLINK_HOST is required")?;

        if let Ok(secs) = std::env::var("RESTLINK_SCAN_INTERVAL") {
            config.scan_interval =
                Duration::from_secs(secs.parse().context("Invalid RESTLINK_SCAN_INTERVAL")?);
        }

        if let Ok(secs) = std::env::var("RESTLINK_TIMEOUT") {
            config.timeout =
                Duration::from_secs(secs.parse().context("Invalid RESTLINK_TIMEOUT")?);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_device_contract() {
        let config = AgentConfig::default();
        assert_eq!(config.scan_interval, Duration::from_secs(30));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }
}
