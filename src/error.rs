//! Error types for Tabtrace

use std::time::Duration;

use thiserror::Error;

/// Result type for Tabtrace operations
pub type Result<T> = std::result::Result<T, TabtraceError>;

/// Errors that can occur in Tabtrace
#[derive(Debug, Error)]
pub enum TabtraceError {
    /// The underlying traffic source call failed (e.g., tab not ready)
    #[error("Traffic source unavailable: {0}")]
    SourceUnavailable(String),

    /// Capture is not enabled on the tab
    #[error("Traffic capture is not enabled for this tab")]
    CaptureDisabled,

    /// No matching exchange appeared before the deadline
    #[error("No exchange matching {pattern:?} after {elapsed:?} (timeout {timeout:?})")]
    Timeout {
        /// URL pattern that was searched for
        pattern: String,
        /// Wall-clock time spent polling
        elapsed: Duration,
        /// Configured deadline
        timeout: Duration,
    },

    /// Requested header name is absent from the parsed block
    #[error("Header not found: {0}")]
    HeaderNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
