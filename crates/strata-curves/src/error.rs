//! Error types for curve operations.

use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors that can occur during curve operations.
#[derive(Error, Debug, Clone)]
pub enum CurveError {
    /// No market tick has arrived yet, so no curve exists.
    #[error("Yield curve not built")]
    NotBuilt,

    /// Curve construction failed.
    #[error("Curve construction failed: {reason}")]
    ConstructionFailed {
        /// Description of the failure.
        reason: String,
    },

    /// Bootstrap failed for a calibration instrument.
    #[error("Bootstrap failed at {tenor}: {reason}")]
    BootstrapFailed {
        /// The instrument description where bootstrap failed.
        tenor: String,
        /// Description of the failure.
        reason: String,
    },

    /// Invalid curve data.
    #[error("Invalid curve data: {reason}")]
    InvalidData {
        /// Description of what's invalid.
        reason: String,
    },

    /// Interpolation error.
    #[error("Interpolation failed: {reason}")]
    InterpolationFailed {
        /// Description of the failure.
        reason: String,
    },

    /// Requested time is outside curve range and extrapolation is disabled.
    #[error("Time {t:.4} is outside curve range [{min:.4}, {max:.4}]")]
    OutOfRange {
        /// Requested time in years.
        t: f64,
        /// First pillar time.
        min: f64,
        /// Last pillar time.
        max: f64,
    },

    /// No data points in curve.
    #[error("Curve has no data points")]
    EmptyCurve,

    /// Core library error.
    #[error("Core error: {0}")]
    Core(#[from] strata_core::CoreError),
}

impl CurveError {
    /// Creates a construction failed error.
    #[must_use]
    pub fn construction_failed(reason: impl Into<String>) -> Self {
        Self::ConstructionFailed {
            reason: reason.into(),
        }
    }

    /// Creates an invalid data error.
    #[must_use]
    pub fn invalid_data(reason: impl Into<String>) -> Self {
        Self::InvalidData {
            reason: reason.into(),
        }
    }

    /// Creates a bootstrap failed error.
    #[must_use]
    pub fn bootstrap_failed(tenor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BootstrapFailed {
            tenor: tenor.into(),
            reason: reason.into(),
        }
    }
}
