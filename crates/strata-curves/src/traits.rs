//! Core trait for yield curve operations.

use strata_core::Date;

use crate::compounding::Compounding;
use crate::error::CurveResult;

/// The core trait for yield curves.
///
/// A yield curve provides the fundamental operations needed for
/// discounting cash flows and computing forward rates. Pricers accept
/// `&dyn Curve` so any curve implementation can back them.
pub trait Curve: Send + Sync {
    /// Returns the discount factor from the reference date to time `t`.
    ///
    /// The discount factor represents the present value of one unit of
    /// currency received `t` years from the reference date. Returns 1.0
    /// for t <= 0.
    ///
    /// # Errors
    ///
    /// Returns an error if `t` is outside the curve's valid range and
    /// extrapolation is disabled, or if interpolation fails.
    fn discount_factor(&self, t: f64) -> CurveResult<f64>;

    /// Returns the curve's reference (valuation) date.
    ///
    /// All times are measured from this date; a time of 1.0 represents
    /// one year from the reference date.
    fn reference_date(&self) -> Date;

    /// Returns the maximum date for which market data is available.
    fn max_date(&self) -> Date;

    /// Returns the zero rate at time `t` with the specified compounding.
    fn zero_rate(&self, t: f64, compounding: Compounding) -> CurveResult<f64> {
        let df = self.discount_factor(t)?;
        Ok(compounding.zero_rate(df, t))
    }

    /// Returns the simply-compounded forward rate between times `t1` and `t2`.
    ///
    /// `F(t1, t2) = (DF(t1) / DF(t2) - 1) / (t2 - t1)`
    fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        if t2 <= t1 {
            return Ok(0.0);
        }

        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;

        if df2 <= 0.0 {
            return Ok(0.0);
        }

        let tau = t2 - t1;
        Ok((df1 / df2 - 1.0) / tau)
    }

    /// Returns the year fraction from the reference date to the given date.
    ///
    /// Uses ACT/365 Fixed, the curve time axis convention.
    fn year_fraction(&self, date: Date) -> f64 {
        let ref_date = self.reference_date();
        ref_date.days_between(&date) as f64 / 365.0
    }

    /// Returns the discount factor for a specific date.
    fn discount_factor_at(&self, date: Date) -> CurveResult<f64> {
        let t = self.year_fraction(date);
        self.discount_factor(t)
    }

    /// Returns the forward rate between two dates.
    fn forward_rate_between(&self, start: Date, end: Date) -> CurveResult<f64> {
        let t1 = self.year_fraction(start);
        let t2 = self.year_fraction(end);
        self.forward_rate(t1, t2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple flat curve for testing
    struct FlatCurve {
        rate: f64,
        ref_date: Date,
    }

    impl Curve for FlatCurve {
        fn discount_factor(&self, t: f64) -> CurveResult<f64> {
            Ok((-self.rate * t.max(0.0)).exp())
        }

        fn reference_date(&self) -> Date {
            self.ref_date
        }

        fn max_date(&self) -> Date {
            self.ref_date.add_years(100).unwrap()
        }
    }

    fn flat() -> FlatCurve {
        FlatCurve {
            rate: 0.05,
            ref_date: Date::from_ymd(2026, 1, 28).unwrap(),
        }
    }

    #[test]
    fn test_zero_rate_from_df() {
        let curve = flat();
        let rate = curve.zero_rate(1.0, Compounding::Continuous).unwrap();
        assert!((rate - 0.05).abs() < 1e-10);
    }

    #[test]
    fn test_forward_rate_flat_curve() {
        let curve = flat();
        let fwd = curve.forward_rate(1.0, 2.0).unwrap();

        let df1 = curve.discount_factor(1.0).unwrap();
        let df2 = curve.discount_factor(2.0).unwrap();
        let expected = (df1 / df2 - 1.0) / 1.0;
        assert!((fwd - expected).abs() < 1e-10);
    }

    #[test]
    fn test_forward_rate_degenerate_interval() {
        let curve = flat();
        assert_eq!(curve.forward_rate(2.0, 2.0).unwrap(), 0.0);
        assert_eq!(curve.forward_rate(2.0, 1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_year_fraction() {
        let curve = flat();
        let date = Date::from_ymd(2027, 1, 28).unwrap();
        let yf = curve.year_fraction(date);
        assert!((yf - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_discount_factor_at_date() {
        let curve = flat();
        let date = Date::from_ymd(2027, 1, 28).unwrap();
        let df = curve.discount_factor_at(date).unwrap();
        assert!((df - (-0.05_f64).exp()).abs() < 0.01);
    }
}
