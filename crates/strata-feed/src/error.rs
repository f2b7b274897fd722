//! Feed error types.

use thiserror::Error;

/// Errors surfaced by the feed binary.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Missing or invalid configuration. Startup-fatal.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of the configuration problem.
        reason: String,
    },

    /// The replay file is missing or unreadable.
    #[error("Data file error: {0}")]
    Data(#[from] csv::Error),

    /// Producer failure.
    #[error("Bus error: {0}")]
    Bus(#[from] rdkafka::error::KafkaError),

    /// Message encoding failure.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl FeedError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Process exit code: 1 for configuration and data file problems,
    /// 2 for runtime failures.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            FeedError::Config { .. } | FeedError::Data(_) => 1,
            _ => 2,
        }
    }
}
