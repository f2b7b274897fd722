//! Error types for the core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors produced by core date and convention handling.
#[derive(Error, Debug, Clone)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// Unrecognized tenor label.
    #[error("Unknown tenor: {label}")]
    UnknownTenor {
        /// The label that failed to parse.
        label: String,
    },

    /// Unrecognized payment frequency.
    #[error("Unknown payment frequency: {label}")]
    UnknownFrequency {
        /// The label that failed to parse.
        label: String,
    },

    /// Unrecognized day count convention.
    #[error("Unknown day count convention: {label}")]
    UnknownDayCount {
        /// The label that failed to parse.
        label: String,
    },

    /// Calendar or business day error.
    #[error("Calendar error: {reason}")]
    CalendarError {
        /// Description of the error.
        reason: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an unknown tenor error.
    #[must_use]
    pub fn unknown_tenor(label: impl Into<String>) -> Self {
        Self::UnknownTenor {
            label: label.into(),
        }
    }
}
