//! Calibration instruments for yield curve bootstrap.
//!
//! Each instrument implements the [`CurveInstrument`] trait, which gives
//! the bootstrapper a unified interface: a pillar date, a present value
//! under a candidate curve, and the implied discount factor that prices
//! the instrument to par.
//!
//! The pipeline uses two instrument kinds:
//!
//! - [`Deposit`]: money market deposits for the short end (1M to 1Y)
//! - [`OvernightIndexSwap`]: OIS for the long end (2Y to 30Y)

mod deposit;
mod ois;

pub use deposit::Deposit;
pub use ois::OvernightIndexSwap;

use strata_core::Date;

use crate::error::CurveResult;
use crate::traits::Curve;

/// Trait for curve instruments used in bootstrap.
///
/// - `maturity()` returns the final cash flow date
/// - `pillar_date()` returns the date where the discount factor is solved
/// - `pv()` should return ~0 when the curve is correctly calibrated
/// - `implied_df()` is used by sequential bootstrap to solve for the
///   discount factor at the pillar
pub trait CurveInstrument: Send + Sync {
    /// Returns the maturity date of the instrument.
    fn maturity(&self) -> Date;

    /// Returns the pillar date for curve construction.
    ///
    /// For both instrument kinds here this equals `maturity()`.
    fn pillar_date(&self) -> Date {
        self.maturity()
    }

    /// Calculates the present value given a discount curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot produce the required
    /// discount factors.
    fn pv(&self, curve: &dyn Curve) -> CurveResult<f64>;

    /// Computes the implied discount factor at the pillar date that
    /// makes the instrument price to par on the partially-built curve.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot produce the required
    /// discount factors.
    fn implied_df(&self, curve: &dyn Curve) -> CurveResult<f64>;

    /// Returns a description string for diagnostics.
    fn description(&self) -> String {
        format!("instrument maturing {}", self.maturity())
    }
}

/// Year fraction between two dates using ACT/365 Fixed.
pub fn year_fraction_act365(start: Date, end: Date) -> f64 {
    start.days_between(&end) as f64 / 365.0
}

/// Year fraction between two dates using ACT/360.
pub fn year_fraction_act360(start: Date, end: Date) -> f64 {
    start.days_between(&end) as f64 / 360.0
}
