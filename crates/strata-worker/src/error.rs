//! Worker error taxonomy.
//!
//! Propagation policy: per-instrument errors are contained by the
//! coordinator; per-tick errors bubble to the coordinator which decides
//! commit vs. redelivery; startup errors abort the process.

use thiserror::Error;

/// Errors surfaced by the worker binary.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Missing or invalid configuration. Startup-fatal.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of the configuration problem.
        reason: String,
    },

    /// The reference-data service is unreachable or unusable.
    /// Startup-fatal.
    #[error("Reference service unavailable: {reason}")]
    Upstream {
        /// Description of the upstream failure.
        reason: String,
    },

    /// Non-transient message bus failure; the worker exits and relies
    /// on supervision to restart it.
    #[error("Bus error: {0}")]
    Bus(#[from] rdkafka::error::KafkaError),

    /// Store failure that survived the single retry; the current tick
    /// is not committed and will be redelivered.
    #[error("Store error: {0}")]
    Store(#[from] redis::RedisError),

    /// Malformed message payload; committed and dropped.
    #[error("Parse error: {reason}")]
    Parse {
        /// Description of the malformed payload.
        reason: String,
    },

    /// Tick-level curve failure (bootstrap failed, or a calculation ran
    /// before the first tick); the tick is not committed.
    #[error("Curve error: {0}")]
    Curve(#[from] strata_curves::CurveError),
}

impl WorkerError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Creates an upstream error.
    #[must_use]
    pub fn upstream(reason: impl Into<String>) -> Self {
        Self::Upstream {
            reason: reason.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    /// Process exit code for this error: 1 for initialization
    /// failures, 2 for fatal runtime errors.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            WorkerError::Config { .. } | WorkerError::Upstream { .. } => 1,
            _ => 2,
        }
    }
}

impl From<reqwest::Error> for WorkerError {
    fn from(err: reqwest::Error) -> Self {
        WorkerError::upstream(err.to_string())
    }
}
