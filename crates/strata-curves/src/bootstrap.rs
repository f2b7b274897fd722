//! Sequential curve bootstrap.
//!
//! Discount factors are solved one calibration instrument at a time, in
//! maturity order. Each solve prices against the curve assembled from
//! the pillars already known; the seed pillar DF(0) = 1 is enough for
//! the first instrument because a one-pillar curve interpolates flat in
//! log-discount space.

use strata_core::Date;

use crate::curves::{DiscountCurve, DiscountCurveBuilder};
use crate::error::{CurveError, CurveResult};
use crate::instruments::{year_fraction_act365, CurveInstrument};
use crate::interpolation::InterpolationMethod;

/// Sequential bootstrapper for building discount curves.
///
/// Instruments may be added in any order; they are sorted by pillar
/// date before solving. Two instruments maturing on the same pillar
/// would make the system over-determined, so that is rejected rather
/// than silently resolved.
pub struct SequentialBootstrapper {
    /// Reference date for the curve.
    reference_date: Date,
    /// Instruments to calibrate against.
    instruments: Vec<Box<dyn CurveInstrument>>,
    /// Interpolation method for the final curve.
    interpolation: InterpolationMethod,
    /// Whether the final curve extrapolates beyond the last pillar.
    allow_extrapolation: bool,
}

impl SequentialBootstrapper {
    /// Creates a new sequential bootstrapper.
    #[must_use]
    pub fn new(reference_date: Date) -> Self {
        Self {
            reference_date,
            instruments: Vec::new(),
            interpolation: InterpolationMethod::LogCubic,
            allow_extrapolation: true,
        }
    }

    /// Sets the interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, method: InterpolationMethod) -> Self {
        self.interpolation = method;
        self
    }

    /// Enables or disables extrapolation on the final curve.
    #[must_use]
    pub fn with_extrapolation(mut self, enabled: bool) -> Self {
        self.allow_extrapolation = enabled;
        self
    }

    /// Adds an instrument to the calibration set.
    #[must_use]
    pub fn add_instrument<I: CurveInstrument + 'static>(mut self, instrument: I) -> Self {
        self.instruments.push(Box::new(instrument));
        self
    }

    /// Adds an already-boxed instrument to the calibration set.
    #[must_use]
    pub fn add_boxed(mut self, instrument: Box<dyn CurveInstrument>) -> Self {
        self.instruments.push(instrument);
        self
    }

    /// Solves the pillar discount factors and builds the curve.
    ///
    /// # Errors
    ///
    /// Returns an error when no instruments were added, when two
    /// instruments share a pillar, when a solved discount factor falls
    /// outside (0, 1], or when curve construction fails.
    pub fn bootstrap(mut self) -> CurveResult<DiscountCurve> {
        if self.instruments.is_empty() {
            return Err(CurveError::invalid_data(
                "No instruments provided for bootstrap",
            ));
        }

        self.instruments.sort_by_key(|inst| inst.pillar_date());

        let mut solved: Vec<(f64, f64)> = Vec::with_capacity(self.instruments.len() + 1);
        solved.push((0.0, 1.0));

        for instrument in &self.instruments {
            let t = year_fraction_act365(self.reference_date, instrument.pillar_date());

            // Sorted input, so a non-advancing pillar means a collision
            let (last_t, _) = solved[solved.len() - 1];
            if t - last_t < 1e-10 {
                return Err(CurveError::bootstrap_failed(
                    instrument.description(),
                    "pillar does not extend the curve; instruments must have distinct maturities",
                ));
            }

            let known = assemble(self.reference_date, &solved, self.interpolation, true)?;
            let df = instrument.implied_df(&known).map_err(|e| {
                CurveError::bootstrap_failed(
                    instrument.description(),
                    format!("Failed to solve for DF: {e}"),
                )
            })?;

            if !(df > 0.0 && df <= 1.0) {
                return Err(CurveError::bootstrap_failed(
                    instrument.description(),
                    format!("Invalid discount factor: {df} (must be in (0, 1])"),
                ));
            }

            solved.push((t, df));
        }

        assemble(
            self.reference_date,
            &solved,
            self.interpolation,
            self.allow_extrapolation,
        )
    }
}

/// Builds a curve over the given pillars.
///
/// Used both for the growing partial curve during the solve (where
/// extrapolation is always on, since the next pillar lies beyond it)
/// and for the final result.
fn assemble(
    reference_date: Date,
    pillars: &[(f64, f64)],
    interpolation: InterpolationMethod,
    extrapolate: bool,
) -> CurveResult<DiscountCurve> {
    let mut builder = DiscountCurveBuilder::new(reference_date).with_interpolation(interpolation);

    for &(t, df) in pillars {
        builder = builder.add_pillar(t, df);
    }

    if extrapolate {
        builder = builder.with_extrapolation();
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::{Deposit, OvernightIndexSwap};
    use crate::traits::Curve;
    use approx::assert_relative_eq;
    use strata_core::calendars::WeekendCalendar;
    use strata_core::Tenor;

    fn ref_date() -> Date {
        Date::from_ymd(2026, 1, 28).unwrap()
    }

    #[test]
    fn deposit_pillar_matches_par_relation() {
        // One 6M deposit: the solved pillar must satisfy
        // DF = 1 / (1 + r tau) exactly, since DF(start) = 1
        let end = Date::from_ymd(2026, 7, 28).unwrap();
        let deposit = Deposit::new(ref_date(), end, 0.05);
        let tau = deposit.year_fraction();

        let curve = SequentialBootstrapper::new(ref_date())
            .add_instrument(deposit)
            .bootstrap()
            .unwrap();

        assert_eq!(curve.reference_date(), ref_date());
        assert_relative_eq!(curve.discount_factor(0.0).unwrap(), 1.0, epsilon = 1e-12);

        let t = year_fraction_act365(ref_date(), end);
        assert_relative_eq!(
            curve.discount_factor(t).unwrap(),
            1.0 / (1.0 + 0.05 * tau),
            epsilon = 1e-12
        );
    }

    #[test]
    fn ois_pillar_matches_par_relation() {
        let cal = WeekendCalendar;
        let ois = OvernightIndexSwap::spanning(ref_date(), Tenor::Y1, 0.045, &cal).unwrap();
        let tau = ois.year_fraction();

        let curve = SequentialBootstrapper::new(ref_date())
            .add_instrument(ois)
            .bootstrap()
            .unwrap();

        let t = year_fraction_act365(ref_date(), ois.termination_date());
        assert_relative_eq!(
            curve.discount_factor(t).unwrap(),
            1.0 / (1.0 + 0.045 * tau),
            epsilon = 1e-12
        );
    }

    #[test]
    fn calibrated_curve_reprices_every_helper() {
        // A full short-end-plus-long-end set must come back to par
        let cal = WeekendCalendar;
        let helpers: Vec<Box<dyn CurveInstrument>> = vec![
            Box::new(Deposit::spanning(ref_date(), Tenor::M3, 0.052, &cal).unwrap()),
            Box::new(Deposit::spanning(ref_date(), Tenor::M6, 0.051, &cal).unwrap()),
            Box::new(Deposit::spanning(ref_date(), Tenor::Y1, 0.048, &cal).unwrap()),
            Box::new(OvernightIndexSwap::spanning(ref_date(), Tenor::Y2, 0.042, &cal).unwrap()),
            Box::new(OvernightIndexSwap::spanning(ref_date(), Tenor::Y5, 0.041, &cal).unwrap()),
        ];
        let check: Vec<Box<dyn CurveInstrument>> = vec![
            Box::new(Deposit::spanning(ref_date(), Tenor::M3, 0.052, &cal).unwrap()),
            Box::new(Deposit::spanning(ref_date(), Tenor::M6, 0.051, &cal).unwrap()),
            Box::new(Deposit::spanning(ref_date(), Tenor::Y1, 0.048, &cal).unwrap()),
            Box::new(OvernightIndexSwap::spanning(ref_date(), Tenor::Y2, 0.042, &cal).unwrap()),
            Box::new(OvernightIndexSwap::spanning(ref_date(), Tenor::Y5, 0.041, &cal).unwrap()),
        ];

        let mut bootstrapper = SequentialBootstrapper::new(ref_date());
        for helper in helpers {
            bootstrapper = bootstrapper.add_boxed(helper);
        }
        let curve = bootstrapper.bootstrap().unwrap();

        for instrument in &check {
            let pv = instrument.pv(&curve).unwrap();
            assert!(
                pv.abs() < 1e-9,
                "{} does not reprice to par: {pv}",
                instrument.description()
            );
        }
    }

    #[test]
    fn rising_short_rates_give_decreasing_pillars() {
        let curve = SequentialBootstrapper::new(ref_date())
            .add_instrument(Deposit::new(
                ref_date(),
                Date::from_ymd(2026, 2, 27).unwrap(),
                0.045,
            ))
            .add_instrument(Deposit::new(
                ref_date(),
                Date::from_ymd(2026, 4, 28).unwrap(),
                0.050,
            ))
            .add_instrument(Deposit::new(
                ref_date(),
                Date::from_ymd(2026, 7, 28).unwrap(),
                0.052,
            ))
            .bootstrap()
            .unwrap();

        let mut prev = 1.0;
        for months in [1, 3, 6] {
            let df = curve.discount_factor(f64::from(months) / 12.0).unwrap();
            assert!(df < prev, "DF should decrease: {df} >= {prev}");
            prev = df;
        }
    }

    #[test]
    fn insertion_order_is_irrelevant() {
        let late = Deposit::new(ref_date(), Date::from_ymd(2026, 7, 28).unwrap(), 0.052);
        let early = Deposit::new(ref_date(), Date::from_ymd(2026, 4, 28).unwrap(), 0.050);

        let forward = SequentialBootstrapper::new(ref_date())
            .add_instrument(early)
            .add_instrument(late)
            .bootstrap()
            .unwrap();
        let reversed = SequentialBootstrapper::new(ref_date())
            .add_instrument(late)
            .add_instrument(early)
            .bootstrap()
            .unwrap();

        for t in [0.2, 0.35, 0.5] {
            assert_relative_eq!(
                forward.discount_factor(t).unwrap(),
                reversed.discount_factor(t).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn no_instruments_is_an_error() {
        assert!(SequentialBootstrapper::new(ref_date()).bootstrap().is_err());
    }

    #[test]
    fn shared_maturity_is_rejected() {
        let end = Date::from_ymd(2026, 7, 28).unwrap();

        let result = SequentialBootstrapper::new(ref_date())
            .add_instrument(Deposit::new(ref_date(), end, 0.050))
            .add_instrument(Deposit::new(ref_date(), end, 0.052))
            .bootstrap();

        assert!(matches!(result, Err(CurveError::BootstrapFailed { .. })));
    }
}
