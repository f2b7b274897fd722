//! Vanilla interest-rate swap.

use serde::{Deserialize, Serialize};

use strata_core::calendars::{BusinessDayConvention, Calendar, UsGovernmentBond};
use strata_core::daycounts::DayCountConvention;
use strata_core::{Date, Frequency, PayReceive};
use strata_curves::Curve;

use crate::error::{PricingError, PricingResult};
use crate::schedule::{Schedule, ScheduleConfig, ScheduleGeneration};

/// A vanilla fixed-vs-overnight interest rate swap.
///
/// Both legs accrue ACT/360 and roll Modified Following, forward from
/// the effective date, on the US government bond calendar. The floating
/// leg pays quarterly and projects its rate off the same curve used for
/// discounting (single-curve framework); the fixed leg pays at the
/// instrument's payment frequency with zero spread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swap {
    /// Instrument identifier from the reference service.
    pub id: String,
    /// Notional in currency units.
    pub notional: f64,
    /// Trade currency (single-currency pipeline: USD).
    pub currency: String,
    /// Fixed leg rate as a decimal (0.0410 for 4.10%).
    pub fixed_rate: f64,
    /// Tenor label from the reference service, e.g. "5Y".
    pub tenor_label: String,
    /// Trade date.
    pub trade_date: Date,
    /// Maturity date.
    pub maturity_date: Date,
    /// Effective date; defaults to trade date plus two business days.
    pub effective_date: Option<Date>,
    /// Which leg the book pays.
    pub pay_receive: PayReceive,
    /// Floating index name (an overnight compounded index, e.g. SOFR).
    pub float_index: String,
    /// Fixed leg payment frequency; the floating leg is quarterly.
    pub payment_frequency: Frequency,
}

impl Swap {
    /// Returns the effective date, defaulting to trade + 2 business days.
    #[must_use]
    pub fn effective_start(&self) -> Date {
        self.effective_date
            .unwrap_or_else(|| UsGovernmentBond.add_business_days(self.trade_date, 2))
    }

    /// Net present value on the given curve, in currency units.
    ///
    /// Positive for a payer when floating receipts outweigh fixed
    /// payments; a pay-fixed swap has negative NPV when its fixed rate
    /// exceeds the market par rate.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the instrument dates are unusable,
    /// schedule generation fails, or the curve fails to produce a
    /// discount factor.
    pub fn npv(&self, curve: &dyn Curve) -> PricingResult<f64> {
        let effective = self.effective_start();
        if effective >= self.maturity_date {
            return Err(PricingError::invalid_instrument(
                &self.id,
                format!(
                    "effective {} not before maturity {}",
                    effective, self.maturity_date
                ),
            ));
        }

        let fixed_schedule = Schedule::generate(
            &ScheduleConfig::new(effective, self.maturity_date, self.payment_frequency)
                .with_convention(BusinessDayConvention::ModifiedFollowing)
                .with_generation(ScheduleGeneration::Forward),
        )?;

        let float_schedule = Schedule::generate(
            &ScheduleConfig::new(effective, self.maturity_date, Frequency::Quarterly)
                .with_convention(BusinessDayConvention::ModifiedFollowing)
                .with_generation(ScheduleGeneration::Forward),
        )?;

        let calendar = UsGovernmentBond;
        let settlement = calendar.add_business_days(curve.reference_date(), 2);
        let accrual = DayCountConvention::Act360;

        // Fixed leg annuity
        let mut fixed_pv = 0.0;
        for (start, end) in fixed_schedule.periods() {
            if end <= settlement {
                continue;
            }
            let tau = accrual.year_fraction(start, end);
            fixed_pv += self.notional * self.fixed_rate * tau * curve.discount_factor_at(end)?;
        }

        // Floating leg: simply-compounded forwards off the same curve
        let mut float_pv = 0.0;
        for (start, end) in float_schedule.periods() {
            if end <= settlement {
                continue;
            }
            let tau = accrual.year_fraction(start, end);
            if tau <= 0.0 {
                continue;
            }

            let df_start = curve.discount_factor_at(start)?;
            let df_end = curve.discount_factor_at(end)?;
            let forward = (df_start / df_end - 1.0) / tau;

            float_pv += self.notional * forward * tau * df_end;
        }

        let payer_npv = float_pv - fixed_pv;
        match self.pay_receive {
            PayReceive::Pay => Ok(payer_npv),
            PayReceive::Receive => Ok(-payer_npv),
        }
    }
}
