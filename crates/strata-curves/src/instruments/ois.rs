//! Overnight Index Swap (OIS) instrument.
//!
//! OIS swaps calibrate the long end of the discounting curve.

use strata_core::calendars::{BusinessDayConvention, Calendar};
use strata_core::{Date, Tenor};

use super::{year_fraction_act360, year_fraction_act365, CurveInstrument};
use crate::error::CurveResult;
use crate::traits::Curve;

/// Overnight Index Swap.
///
/// An OIS exchanges a fixed rate for the daily compounded overnight rate
/// (e.g., SOFR) over the swap term.
///
/// # Pricing
///
/// Using the single-period par relation:
/// ```text
/// Fixed Leg: c × τ × DF(end)
/// Float Leg: DF(start) - DF(end)   (daily compounding approximation)
/// ```
///
/// At par: `DF(end) = DF(start) / (1 + c × τ)`
#[derive(Debug, Clone, Copy)]
pub struct OvernightIndexSwap {
    /// Effective date (start)
    effective_date: Date,
    /// Termination date (end)
    termination_date: Date,
    /// Fixed rate
    fixed_rate: f64,
}

impl OvernightIndexSwap {
    /// Creates a new OIS.
    #[must_use]
    pub fn new(effective_date: Date, termination_date: Date, fixed_rate: f64) -> Self {
        Self {
            effective_date,
            termination_date,
            fixed_rate,
        }
    }

    /// Creates an OIS spanning a tenor from the spot date, with the
    /// termination rolled Modified Following on the given calendar.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenor arithmetic produces an invalid date.
    pub fn spanning(
        spot: Date,
        tenor: Tenor,
        fixed_rate: f64,
        calendar: &dyn Calendar,
    ) -> CurveResult<Self> {
        let raw_end = tenor.end_date(spot)?;
        let termination = calendar.adjust(raw_end, BusinessDayConvention::ModifiedFollowing);
        Ok(Self::new(spot, termination, fixed_rate))
    }

    /// Returns the effective date.
    #[must_use]
    pub fn effective_date(&self) -> Date {
        self.effective_date
    }

    /// Returns the termination date.
    #[must_use]
    pub fn termination_date(&self) -> Date {
        self.termination_date
    }

    /// Returns the fixed rate.
    #[must_use]
    pub fn fixed_rate(&self) -> f64 {
        self.fixed_rate
    }

    /// Returns the ACT/360 year fraction of the swap term.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        year_fraction_act360(self.effective_date, self.termination_date)
    }
}

impl CurveInstrument for OvernightIndexSwap {
    fn maturity(&self) -> Date {
        self.termination_date
    }

    fn pv(&self, curve: &dyn Curve) -> CurveResult<f64> {
        let ref_date = curve.reference_date();
        let t_start = year_fraction_act365(ref_date, self.effective_date);
        let t_end = year_fraction_act365(ref_date, self.termination_date);

        let df_start = curve.discount_factor(t_start)?;
        let df_end = curve.discount_factor(t_end)?;

        let tau = self.year_fraction();

        // Fixed leg - float leg, per unit notional
        let fixed_pv = self.fixed_rate * tau * df_end;
        let float_pv = df_start - df_end;

        Ok(fixed_pv - float_pv)
    }

    fn implied_df(&self, curve: &dyn Curve) -> CurveResult<f64> {
        // DF(end) = DF(start) / (1 + c × τ)
        let ref_date = curve.reference_date();
        let t_start = year_fraction_act365(ref_date, self.effective_date);

        let df_start = curve.discount_factor(t_start)?;
        let tau = self.year_fraction();

        Ok(df_start / (1.0 + self.fixed_rate * tau))
    }

    fn description(&self) -> String {
        let years = year_fraction_act365(self.effective_date, self.termination_date);
        format!("OIS {:.1}Y at {:.4}%", years, self.fixed_rate * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::DiscountCurveBuilder;
    use approx::assert_relative_eq;
    use strata_core::calendars::WeekendCalendar;

    fn flat_curve(ref_date: Date, rate: f64) -> impl Curve {
        DiscountCurveBuilder::new(ref_date)
            .add_zero_rate(0.25, rate)
            .add_zero_rate(1.0, rate)
            .add_zero_rate(5.0, rate)
            .add_zero_rate(10.0, rate)
            .with_extrapolation()
            .build()
            .unwrap()
    }

    #[test]
    fn test_ois_basic() {
        let eff = Date::from_ymd(2026, 1, 30).unwrap();
        let term = Date::from_ymd(2031, 1, 30).unwrap();
        let ois = OvernightIndexSwap::new(eff, term, 0.045);

        assert_eq!(ois.effective_date(), eff);
        assert_eq!(ois.termination_date(), term);
        assert_eq!(ois.fixed_rate(), 0.045);
    }

    #[test]
    fn test_ois_spanning() {
        let cal = WeekendCalendar;
        let eff = Date::from_ymd(2026, 1, 30).unwrap();
        let ois = OvernightIndexSwap::spanning(eff, Tenor::Y5, 0.045, &cal).unwrap();

        // Jan 30, 2031 is a Thursday
        assert_eq!(
            ois.termination_date(),
            Date::from_ymd(2031, 1, 30).unwrap()
        );
    }

    #[test]
    fn test_ois_implied_df() {
        let ref_date = Date::from_ymd(2026, 1, 28).unwrap();
        let cal = WeekendCalendar;
        let ois = OvernightIndexSwap::spanning(ref_date, Tenor::Y1, 0.05, &cal).unwrap();

        let curve = flat_curve(ref_date, 0.05);
        let implied = ois.implied_df(&curve).unwrap();

        let tau = ois.year_fraction();
        let expected = 1.0 / (1.0 + 0.05 * tau);

        assert_relative_eq!(implied, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_ois_pv_at_par() {
        let ref_date = Date::from_ymd(2026, 1, 28).unwrap();
        let cal = WeekendCalendar;
        let rate = 0.05;

        let ois = OvernightIndexSwap::spanning(ref_date, Tenor::Y1, rate, &cal).unwrap();
        let implied_df = ois.implied_df(&flat_curve(ref_date, rate)).unwrap();

        let curve = DiscountCurveBuilder::new(ref_date)
            .add_pillar(
                year_fraction_act365(ref_date, ois.termination_date()),
                implied_df,
            )
            .with_extrapolation()
            .build()
            .unwrap();

        let pv = ois.pv(&curve).unwrap();
        assert_relative_eq!(pv, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_description() {
        let ois = OvernightIndexSwap::new(
            Date::from_ymd(2026, 1, 30).unwrap(),
            Date::from_ymd(2031, 1, 30).unwrap(),
            0.041,
        );
        assert!(ois.description().contains("OIS"));
        assert!(ois.description().contains("4.1000%"));
    }
}
