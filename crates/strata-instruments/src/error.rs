//! Error types for instrument pricing.

use thiserror::Error;

/// A specialized Result type for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors that can occur while building schedules or pricing instruments.
#[derive(Error, Debug, Clone)]
pub enum PricingError {
    /// Schedule generation failed.
    #[error("Invalid schedule: {reason}")]
    Schedule {
        /// Description of the failure.
        reason: String,
    },

    /// Instrument static data is unusable.
    #[error("Invalid instrument {id}: {reason}")]
    InvalidInstrument {
        /// The instrument identifier.
        id: String,
        /// Description of what's invalid.
        reason: String,
    },

    /// The curve could not produce a required discount factor.
    #[error("Curve error: {0}")]
    Curve(#[from] strata_curves::CurveError),

    /// Core date or convention error.
    #[error("Core error: {0}")]
    Core(#[from] strata_core::CoreError),
}

impl PricingError {
    /// Creates a schedule error.
    #[must_use]
    pub fn schedule(reason: impl Into<String>) -> Self {
        Self::Schedule {
            reason: reason.into(),
        }
    }

    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
