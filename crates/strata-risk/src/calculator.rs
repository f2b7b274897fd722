//! Bump-and-reprice risk calculator.

use std::collections::BTreeMap;

use strata_core::Tenor;
use strata_curves::CurveBook;
use strata_instruments::Instrument;

use crate::error::{RiskError, RiskResult};
use crate::guard::QuoteGuard;
use crate::metrics::RiskMetrics;

/// Default bump size: 1 basis point.
pub const DEFAULT_BUMP_SIZE: f64 = 0.0001;

/// Computes NPV, DV01, and key-rate durations for one instrument under
/// the current curve.
///
/// The calculator owns the [`CurveBook`]; the coordinator applies each
/// tick through [`curves_mut`](RiskCalculator::curves_mut) and then
/// calls [`calculate`](RiskCalculator::calculate) per instrument. All
/// sensitivities are central differences:
///
/// ```text
/// DV01 = (NPV(quotes - h) - NPV(quotes + h)) / 2      h = bump size
/// ```
///
/// so a long fixed-income position carries positive DV01. The symmetric
/// bump cancels second-order curvature to first order.
pub struct RiskCalculator {
    curves: CurveBook,
    bump: f64,
}

impl RiskCalculator {
    /// Creates a calculator over the given curve book with the default
    /// 1 bp bump.
    #[must_use]
    pub fn new(curves: CurveBook) -> Self {
        Self {
            curves,
            bump: DEFAULT_BUMP_SIZE,
        }
    }

    /// Overrides the bump size (decimal, 0.0001 = 1 bp).
    #[must_use]
    pub fn with_bump_size(self, bump: f64) -> Self {
        Self { bump, ..self }
    }

    /// Read access to the curve book.
    #[must_use]
    pub fn curves(&self) -> &CurveBook {
        &self.curves
    }

    /// Mutable access to the curve book, used by the coordinator to
    /// apply market ticks.
    pub fn curves_mut(&mut self) -> &mut CurveBook {
        &mut self.curves
    }

    /// Calculates all risk metrics for an instrument.
    ///
    /// The quote vector is bit-for-bit identical before and after this
    /// call, including when an inner pricing step fails.
    ///
    /// # Errors
    ///
    /// [`RiskError::CurveNotBuilt`] before the first tick (tick-fatal);
    /// [`RiskError::Pricing`] when the instrument fails to price
    /// (contained per instrument).
    pub fn calculate(&mut self, instrument: &Instrument) -> RiskResult<RiskMetrics> {
        let npv = price(&mut self.curves, instrument)?;
        let dv01 = self.parallel_dv01(instrument)?;
        let krd = self.key_rate_durations(instrument)?;

        Ok(RiskMetrics {
            instrument_id: instrument.id().to_string(),
            npv,
            dv01,
            krd,
        })
    }

    /// DV01 via a parallel shift of every recognized tenor.
    fn parallel_dv01(&mut self, instrument: &Instrument) -> RiskResult<f64> {
        let bump = self.bump;
        let mut guard = QuoteGuard::capture(&mut self.curves, &Tenor::ALL);

        guard.shift(bump);
        let npv_up = price(guard.book_mut(), instrument)?;

        guard.shift(-bump);
        let npv_down = price(guard.book_mut(), instrument)?;

        Ok((npv_down - npv_up) / 2.0)
    }

    /// Key-rate durations via single-tenor shifts.
    fn key_rate_durations(&mut self, instrument: &Instrument) -> RiskResult<BTreeMap<Tenor, f64>> {
        let bump = self.bump;
        let mut krd = BTreeMap::new();

        for tenor in Tenor::KEY_RATES {
            let mut guard = QuoteGuard::capture(&mut self.curves, &[tenor]);

            guard.shift(bump);
            let npv_up = price(guard.book_mut(), instrument)?;

            guard.shift(-bump);
            let npv_down = price(guard.book_mut(), instrument)?;

            drop(guard);
            krd.insert(tenor, (npv_down - npv_up) / 2.0);
        }

        Ok(krd)
    }
}

/// Prices an instrument on the book's current curve.
fn price(book: &mut CurveBook, instrument: &Instrument) -> RiskResult<f64> {
    let curve = book.curve().map_err(RiskError::from)?;
    instrument
        .npv(curve)
        .map_err(|e| RiskError::pricing(instrument.id(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::daycounts::DayCountConvention;
    use strata_core::{Date, Frequency};
    use strata_instruments::Bond;

    fn sample_rates() -> Vec<(Tenor, f64)> {
        vec![
            (Tenor::M1, 0.0525),
            (Tenor::M3, 0.0520),
            (Tenor::M6, 0.0510),
            (Tenor::Y1, 0.0480),
            (Tenor::Y2, 0.0420),
            (Tenor::Y5, 0.0410),
            (Tenor::Y10, 0.0420),
            (Tenor::Y30, 0.0450),
        ]
    }

    fn seeded_calculator() -> RiskCalculator {
        let mut book = CurveBook::new();
        book.update_rates(sample_rates(), Date::from_ymd(2026, 1, 28).unwrap())
            .unwrap();
        RiskCalculator::new(book)
    }

    fn treasury_bond() -> Instrument {
        Instrument::Bond(Bond {
            id: "test-bond".to_string(),
            isin: "US912810TM25".to_string(),
            notional: 1_000_000.0,
            currency: "USD".to_string(),
            coupon_rate: 0.0375,
            maturity_date: Date::from_ymd(2028, 11, 15).unwrap(),
            issue_date: Some(Date::from_ymd(2023, 11, 15).unwrap()),
            payment_frequency: Frequency::SemiAnnual,
            day_count: DayCountConvention::ActActIsda,
        })
    }

    #[test]
    fn test_curve_not_built_is_tick_fatal() {
        let mut calc = RiskCalculator::new(CurveBook::new());

        let err = calc.calculate(&treasury_bond()).unwrap_err();
        assert!(matches!(err, RiskError::CurveNotBuilt));
        assert!(err.is_tick_fatal());
    }

    #[test]
    fn test_metrics_shape() {
        let mut calc = seeded_calculator();
        let metrics = calc.calculate(&treasury_bond()).unwrap();

        assert_eq!(metrics.instrument_id, "test-bond");
        assert!(metrics.npv.is_finite());
        assert!(metrics.dv01.is_finite());
        for tenor in Tenor::KEY_RATES {
            assert!(metrics.krd.contains_key(&tenor));
        }
        assert!(metrics.krd.values().any(|v| v.abs() > 0.0));
    }

    #[test]
    fn test_long_bond_has_positive_dv01() {
        let mut calc = seeded_calculator();
        let metrics = calc.calculate(&treasury_bond()).unwrap();

        assert!(metrics.dv01 > 0.0, "dv01 {}", metrics.dv01);
    }

    #[test]
    fn test_quotes_restored_after_calculate() {
        let mut calc = seeded_calculator();

        let before: Vec<(Tenor, u64)> = Tenor::ALL
            .iter()
            .map(|&t| (t, calc.curves().quote(t).to_bits()))
            .collect();

        calc.calculate(&treasury_bond()).unwrap();

        for (tenor, bits) in before {
            assert_eq!(
                calc.curves().quote(tenor).to_bits(),
                bits,
                "quote {tenor} changed"
            );
        }
    }

    #[test]
    fn test_quotes_restored_after_pricing_error() {
        let mut calc = seeded_calculator();

        // Issue after maturity makes the pricer fail on every call
        let broken = Instrument::Bond(Bond {
            issue_date: Some(Date::from_ymd(2030, 1, 1).unwrap()),
            ..match treasury_bond() {
                Instrument::Bond(b) => b,
                Instrument::Swap(_) => unreachable!(),
            }
        });

        let before: Vec<(Tenor, u64)> = Tenor::ALL
            .iter()
            .map(|&t| (t, calc.curves().quote(t).to_bits()))
            .collect();

        assert!(calc.calculate(&broken).is_err());

        for (tenor, bits) in before {
            assert_eq!(calc.curves().quote(tenor).to_bits(), bits);
        }
    }

    #[test]
    fn test_custom_bump_size_scales_consistently() {
        let mut one_bp = seeded_calculator();
        let mut two_bp = {
            let mut book = CurveBook::new();
            book.update_rates(sample_rates(), Date::from_ymd(2026, 1, 28).unwrap())
                .unwrap();
            RiskCalculator::new(book).with_bump_size(0.0002)
        };

        let m1 = one_bp.calculate(&treasury_bond()).unwrap();
        let m2 = two_bp.calculate(&treasury_bond()).unwrap();

        // A doubled bump roughly doubles the central difference
        let ratio = m2.dv01 / m1.dv01;
        assert!(ratio > 1.8 && ratio < 2.2, "ratio {ratio}");
    }
}
