//! Fixed-rate bond.

use serde::{Deserialize, Serialize};

use strata_core::calendars::{Calendar, UsGovernmentBond};
use strata_core::daycounts::DayCountConvention;
use strata_core::{Date, Frequency};
use strata_curves::Curve;

use crate::error::{PricingError, PricingResult};
use crate::schedule::{Schedule, ScheduleConfig};

/// Number of years assumed between issue and maturity when the
/// reference service does not supply an issue date.
const DEFAULT_ISSUE_YEARS: i32 = 5;

/// A fixed-rate bullet bond.
///
/// The coupon schedule is generated backward from maturity at the
/// payment frequency, unadjusted, on the US government bond calendar.
/// Pricing discounts each remaining coupon and the redemption on the
/// active curve; flows on or before the T+2 settlement date are
/// excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bond {
    /// Instrument identifier from the reference service.
    pub id: String,
    /// ISIN code.
    pub isin: String,
    /// Face value in currency units.
    pub notional: f64,
    /// Trade currency (single-currency pipeline: USD).
    pub currency: String,
    /// Annual coupon rate as a decimal (0.0375 for 3.75%).
    pub coupon_rate: f64,
    /// Maturity date.
    pub maturity_date: Date,
    /// Issue date; defaults to maturity minus five years when absent.
    pub issue_date: Option<Date>,
    /// Coupon payment frequency.
    pub payment_frequency: Frequency,
    /// Accrual day count convention.
    pub day_count: DayCountConvention,
}

impl Bond {
    /// Returns the issue date, defaulting to maturity minus five years.
    ///
    /// # Errors
    ///
    /// Returns an error if the default date arithmetic fails.
    pub fn effective_issue_date(&self) -> PricingResult<Date> {
        match self.issue_date {
            Some(date) => Ok(date),
            None => Ok(self.maturity_date.add_years(-DEFAULT_ISSUE_YEARS)?),
        }
    }

    /// Net present value on the given curve, in currency units.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the instrument dates are unusable,
    /// the schedule cannot be generated, or the curve fails to produce a
    /// discount factor.
    pub fn npv(&self, curve: &dyn Curve) -> PricingResult<f64> {
        let issue = self.effective_issue_date()?;
        if issue >= self.maturity_date {
            return Err(PricingError::invalid_instrument(
                &self.id,
                format!("issue {} not before maturity {}", issue, self.maturity_date),
            ));
        }

        let schedule = Schedule::generate(&ScheduleConfig::new(
            issue,
            self.maturity_date,
            self.payment_frequency,
        ))?;

        let calendar = UsGovernmentBond;
        let settlement = calendar.add_business_days(curve.reference_date(), 2);

        let mut npv = 0.0;
        for (accrual_start, accrual_end) in schedule.periods() {
            if accrual_end <= settlement {
                continue;
            }

            let tau = self.day_count.year_fraction(accrual_start, accrual_end);
            let coupon = self.notional * self.coupon_rate * tau;
            npv += coupon * curve.discount_factor_at(accrual_end)?;
        }

        // Redemption at maturity
        if self.maturity_date > settlement {
            npv += self.notional * curve.discount_factor_at(self.maturity_date)?;
        }

        Ok(npv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_curves::DiscountCurveBuilder;

    fn flat_curve(rate: f64) -> impl Curve {
        DiscountCurveBuilder::new(Date::from_ymd(2026, 1, 28).unwrap())
            .add_zero_rate(0.25, rate)
            .add_zero_rate(1.0, rate)
            .add_zero_rate(2.0, rate)
            .add_zero_rate(5.0, rate)
            .add_zero_rate(10.0, rate)
            .with_extrapolation()
            .build()
            .unwrap()
    }

    fn treasury_bond() -> Bond {
        Bond {
            id: "test-bond".to_string(),
            isin: "US912810TM25".to_string(),
            notional: 1_000_000.0,
            currency: "USD".to_string(),
            coupon_rate: 0.0375,
            maturity_date: Date::from_ymd(2028, 11, 15).unwrap(),
            issue_date: Some(Date::from_ymd(2023, 11, 15).unwrap()),
            payment_frequency: Frequency::SemiAnnual,
            day_count: DayCountConvention::ActActIsda,
        }
    }

    #[test]
    fn test_bond_npv_near_par() {
        // 3.75% coupon discounted near 4.2%: a little below par
        let curve = flat_curve(0.042);
        let npv = treasury_bond().npv(&curve).unwrap();

        assert!(npv > 800_000.0 && npv < 1_200_000.0, "NPV {npv}");
        assert!(npv < 1_000_000.0);
    }

    #[test]
    fn test_bond_npv_above_par_when_rates_low() {
        // Discounting at 1% a 3.75% coupon puts the bond above par
        let curve = flat_curve(0.01);
        let npv = treasury_bond().npv(&curve).unwrap();

        assert!(npv > 1_000_000.0, "NPV {npv}");
    }

    #[test]
    fn test_bond_price_falls_when_rates_rise() {
        let low = treasury_bond().npv(&flat_curve(0.03)).unwrap();
        let high = treasury_bond().npv(&flat_curve(0.05)).unwrap();

        assert!(high < low);
    }

    #[test]
    fn test_default_issue_date() {
        let mut bond = treasury_bond();
        bond.issue_date = None;

        assert_eq!(
            bond.effective_issue_date().unwrap(),
            Date::from_ymd(2023, 11, 15).unwrap()
        );
    }

    #[test]
    fn test_matured_flows_excluded() {
        // Same bond priced with and without the already-paid coupons:
        // flows before settlement never contribute
        let curve = flat_curve(0.042);

        let full_history = treasury_bond();
        let mut late_issue = treasury_bond();
        late_issue.issue_date = Some(Date::from_ymd(2025, 11, 15).unwrap());

        let npv_full = full_history.npv(&curve).unwrap();
        let npv_late = late_issue.npv(&curve).unwrap();

        assert!((npv_full - npv_late).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_dates_rejected() {
        let mut bond = treasury_bond();
        bond.issue_date = Some(Date::from_ymd(2030, 1, 1).unwrap());

        assert!(matches!(
            bond.npv(&flat_curve(0.04)),
            Err(PricingError::InvalidInstrument { .. })
        ));
    }

    #[test]
    fn test_zero_coupon_is_pure_discount() {
        let mut bond = treasury_bond();
        bond.coupon_rate = 0.0;

        let curve = flat_curve(0.042);
        let npv = bond.npv(&curve).unwrap();
        let df = curve.discount_factor_at(bond.maturity_date).unwrap();

        assert!((npv - 1_000_000.0 * df).abs() < 1e-6);
    }
}
