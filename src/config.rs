//! Configuration types for Tabtrace

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::RetryPolicy;
use crate::{Result, TabtraceError};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Capture-time filtering
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Retry pacing for blocking lookups
    #[serde(default)]
    pub poll: PollConfig,
}

/// Capture-time filtering applied during every refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Methods that never enter the snapshot (case-insensitive)
    #[serde(default = "default_drop_methods")]
    pub drop_methods: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            drop_methods: default_drop_methods(),
        }
    }
}

impl CaptureConfig {
    /// Whether exchanges with `method` are dropped at capture time.
    #[must_use]
    pub fn drops_method(&self, method: &str) -> bool {
        self.drop_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }
}

// CORS preflights never enter the snapshot by default
fn default_drop_methods() -> Vec<String> {
    vec!["OPTIONS".to_string()]
}

/// Retry pacing for blocking lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Deadline for the whole retry loop, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Sleep between poll rounds, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_interval_ms() -> u64 {
    500
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl PollConfig {
    /// Build the retry policy used by
    /// [`find_with_retry`](crate::TrafficCache::find_with_retry).
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            timeout: Duration::from_secs(self.timeout_secs),
            poll_interval: Duration::from_millis(self.interval_ms),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TabtraceError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| TabtraceError::ConfigError(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns error if configuration is invalid
    pub fn validate(&self) -> Result<()> {
        for method in &self.capture.drop_methods {
            if method.trim().is_empty() {
                return Err(TabtraceError::ConfigError(
                    "drop_methods entries cannot be empty".to_string(),
                ));
            }
        }

        if self.poll.interval_ms == 0 {
            return Err(TabtraceError::ConfigError(
                "poll interval_ms cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}
