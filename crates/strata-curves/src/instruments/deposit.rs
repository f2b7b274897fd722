//! Money market deposit instrument.
//!
//! A deposit is the simplest instrument for curve bootstrap, used for
//! the short end of the curve (1M to 1Y).

use strata_core::calendars::{BusinessDayConvention, Calendar};
use strata_core::daycounts::DayCountConvention;
use strata_core::{Date, Tenor};

use super::{year_fraction_act365, CurveInstrument};
use crate::error::CurveResult;
use crate::traits::Curve;

/// A money market deposit.
///
/// # Pricing Formula
///
/// The present value is zero when:
/// ```text
/// DF(end) = DF(start) / (1 + rate × τ)
/// ```
/// where τ is the ACT/360 year fraction of the deposit period.
#[derive(Debug, Clone, Copy)]
pub struct Deposit {
    /// Start date (spot date, typically T+2)
    start_date: Date,
    /// End date (maturity)
    end_date: Date,
    /// Simple interest rate (e.g., 0.0525 for 5.25%)
    rate: f64,
    /// Day count convention for the accrual period
    day_count: DayCountConvention,
}

impl Deposit {
    /// Creates a new deposit with ACT/360 accrual.
    #[must_use]
    pub fn new(start_date: Date, end_date: Date, rate: f64) -> Self {
        Self {
            start_date,
            end_date,
            rate,
            day_count: DayCountConvention::Act360,
        }
    }

    /// Creates a deposit spanning a tenor from the spot date.
    ///
    /// The maturity is rolled with Modified Following on the given
    /// calendar. When the spot date is the last business day of its
    /// month, the end-of-month rule pins the maturity to the last
    /// business day of the target month.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenor arithmetic produces an invalid date.
    pub fn spanning(
        spot: Date,
        tenor: Tenor,
        rate: f64,
        calendar: &dyn Calendar,
    ) -> CurveResult<Self> {
        let raw_end = tenor.end_date(spot)?;

        let spot_is_eom = calendar.previous_business_day(spot.end_of_month()) == spot;
        let end = if spot_is_eom {
            calendar.previous_business_day(raw_end.end_of_month())
        } else {
            calendar.adjust(raw_end, BusinessDayConvention::ModifiedFollowing)
        };

        Ok(Self::new(spot, end, rate))
    }

    /// Returns the start date.
    #[must_use]
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Returns the end date (maturity).
    #[must_use]
    pub fn end_date(&self) -> Date {
        self.end_date
    }

    /// Returns the deposit rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the accrual year fraction for the deposit period.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.day_count.year_fraction(self.start_date, self.end_date)
    }
}

impl CurveInstrument for Deposit {
    fn maturity(&self) -> Date {
        self.end_date
    }

    fn pv(&self, curve: &dyn Curve) -> CurveResult<f64> {
        // PV = DF(start) - DF(end) × (1 + r × τ), per unit notional
        let t_start = year_fraction_act365(curve.reference_date(), self.start_date);
        let t_end = year_fraction_act365(curve.reference_date(), self.end_date);

        let df_start = curve.discount_factor(t_start)?;
        let df_end = curve.discount_factor(t_end)?;

        let tau = self.year_fraction();
        Ok(df_start - df_end * (1.0 + self.rate * tau))
    }

    fn implied_df(&self, curve: &dyn Curve) -> CurveResult<f64> {
        // DF(end) = DF(start) / (1 + r × τ)
        let t_start = year_fraction_act365(curve.reference_date(), self.start_date);
        let df_start = curve.discount_factor(t_start)?;
        let tau = self.year_fraction();

        Ok(df_start / (1.0 + self.rate * tau))
    }

    fn description(&self) -> String {
        let rate = self.rate * 100.0;
        let start_date = self.start_date;
        let end_date = self.end_date;
        format!("Deposit {rate:.4}% {start_date} to {end_date}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::DiscountCurveBuilder;
    use approx::assert_relative_eq;
    use strata_core::calendars::WeekendCalendar;

    fn flat_curve(rate: f64) -> impl Curve {
        let ref_date = Date::from_ymd(2026, 1, 28).unwrap();
        DiscountCurveBuilder::new(ref_date)
            .add_zero_rate(0.25, rate)
            .add_zero_rate(1.0, rate)
            .add_zero_rate(5.0, rate)
            .with_extrapolation()
            .build()
            .unwrap()
    }

    #[test]
    fn test_deposit_basic() {
        let start = Date::from_ymd(2026, 1, 30).unwrap();
        let end = Date::from_ymd(2026, 4, 30).unwrap();
        let deposit = Deposit::new(start, end, 0.05);

        assert_eq!(deposit.start_date(), start);
        assert_eq!(deposit.end_date(), end);
        assert_eq!(deposit.rate(), 0.05);
        assert_eq!(deposit.pillar_date(), end);
    }

    #[test]
    fn test_deposit_year_fraction() {
        let start = Date::from_ymd(2026, 1, 1).unwrap();
        let end = Date::from_ymd(2026, 7, 1).unwrap();
        let deposit = Deposit::new(start, end, 0.05);

        // 181 days / 360
        assert_relative_eq!(deposit.year_fraction(), 181.0 / 360.0, epsilon = 1e-10);
    }

    #[test]
    fn test_deposit_implied_df() {
        let ref_date = Date::from_ymd(2026, 1, 28).unwrap();
        let end = Date::from_ymd(2026, 4, 28).unwrap();

        let deposit = Deposit::new(ref_date, end, 0.05);
        let curve = flat_curve(0.05);

        // DF(start) = 1.0 at the reference date
        let tau = deposit.year_fraction();
        let expected_df = 1.0 / (1.0 + 0.05 * tau);

        let implied = deposit.implied_df(&curve).unwrap();
        assert_relative_eq!(implied, expected_df, epsilon = 1e-6);
    }

    #[test]
    fn test_deposit_pv_at_par() {
        let ref_date = Date::from_ymd(2026, 1, 28).unwrap();
        let end = Date::from_ymd(2026, 4, 28).unwrap();

        let deposit = Deposit::new(ref_date, end, 0.05);
        let implied_df = deposit.implied_df(&flat_curve(0.05)).unwrap();

        // Build a curve with this implied DF; the deposit must reprice to par
        let curve = DiscountCurveBuilder::new(ref_date)
            .add_pillar(year_fraction_act365(ref_date, end), implied_df)
            .with_extrapolation()
            .build()
            .unwrap();

        let pv = deposit.pv(&curve).unwrap();
        assert_relative_eq!(pv, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_spanning_rolls_weekend() {
        let cal = WeekendCalendar;

        // Wed Jan 28 + 3M = Tue Apr 28, a business day already
        let spot = Date::from_ymd(2026, 1, 28).unwrap();
        let deposit = Deposit::spanning(spot, Tenor::M3, 0.05, &cal).unwrap();
        assert_eq!(deposit.end_date(), Date::from_ymd(2026, 4, 28).unwrap());

        // Fri Jan 30 is the last business day of January (Jan 31 is a
        // Saturday), so the end-of-month rule lands on Fri Feb 27
        let spot = Date::from_ymd(2026, 1, 30).unwrap();
        let deposit = Deposit::spanning(spot, Tenor::M1, 0.05, &cal).unwrap();
        assert_eq!(deposit.end_date(), Date::from_ymd(2026, 2, 27).unwrap());
    }

    #[test]
    fn test_spanning_end_of_month_rule() {
        let cal = WeekendCalendar;

        // Tue Mar 31, 2026 is the last business day of March; the 1M
        // deposit must land on the last business day of April (Thu Apr 30)
        let spot = Date::from_ymd(2026, 3, 31).unwrap();
        let deposit = Deposit::spanning(spot, Tenor::M1, 0.05, &cal).unwrap();
        assert_eq!(deposit.end_date(), Date::from_ymd(2026, 4, 30).unwrap());
    }

    #[test]
    fn test_description() {
        let deposit = Deposit::new(
            Date::from_ymd(2026, 1, 28).unwrap(),
            Date::from_ymd(2026, 4, 28).unwrap(),
            0.0525,
        );
        assert!(deposit.description().contains("5.2500%"));
    }
}
