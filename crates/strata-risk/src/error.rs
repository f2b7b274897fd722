//! Error types for risk calculations.

use thiserror::Error;

use strata_curves::CurveError;
use strata_instruments::PricingError;

/// A specialized Result type for risk operations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur during risk calculation.
#[derive(Error, Debug)]
pub enum RiskError {
    /// No market tick has arrived yet; there is no curve to price on.
    ///
    /// This is a tick-level failure: the coordinator must not commit
    /// the offset.
    #[error("Yield curve not built")]
    CurveNotBuilt,

    /// Curve recalibration failed during a bump.
    #[error("Curve error: {0}")]
    Curve(CurveError),

    /// Pricing failed for one instrument.
    ///
    /// Contained per instrument: the coordinator logs it and proceeds
    /// with the rest of the portfolio.
    #[error("Pricing failed for {instrument_id}: {source}")]
    Pricing {
        /// The instrument that failed to price.
        instrument_id: String,
        /// The underlying pricing error.
        #[source]
        source: PricingError,
    },
}

impl RiskError {
    /// Creates a pricing error for an instrument.
    #[must_use]
    pub fn pricing(instrument_id: impl Into<String>, source: PricingError) -> Self {
        Self::Pricing {
            instrument_id: instrument_id.into(),
            source,
        }
    }

    /// True when the error should fail the whole tick rather than just
    /// one instrument.
    #[must_use]
    pub fn is_tick_fatal(&self) -> bool {
        matches!(self, RiskError::CurveNotBuilt)
    }
}

impl From<CurveError> for RiskError {
    fn from(err: CurveError) -> Self {
        match err {
            CurveError::NotBuilt => RiskError::CurveNotBuilt,
            other => RiskError::Curve(other),
        }
    }
}
