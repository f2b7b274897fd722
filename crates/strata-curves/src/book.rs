//! Mutable quote vector and lazily rebuilt discount curve.

use std::collections::BTreeMap;

use tracing::{debug, info};

use strata_core::calendars::{Calendar, UsGovernmentBond};
use strata_core::{Date, Tenor};

use crate::bootstrap::SequentialBootstrapper;
use crate::compounding::Compounding;
use crate::curves::DiscountCurve;
use crate::error::{CurveError, CurveResult};
use crate::instruments::{CurveInstrument, Deposit, OvernightIndexSwap};
use crate::traits::Curve;

/// Owns the per-tenor rate quotes and the discount curve derived from them.
///
/// Every recognized [`Tenor`] carries one quote, initialized to 0.0 and
/// overwritten by market ticks. Mutating a quote marks the cached curve
/// dirty; the next [`curve`](CurveBook::curve) access re-bootstraps, so
/// pricing always observes the current quote vector. This is what makes
/// bump-and-reprice sensitivities work: the risk calculator writes a
/// shifted quote, reprices, and restores.
///
/// The bootstrap uses deposit helpers for the money-market tenors and
/// OIS helpers for 2Y and beyond, with settlement two business days
/// after the evaluation date on the US government bond calendar, and
/// piecewise log-cubic interpolation on discount factors.
pub struct CurveBook {
    quotes: BTreeMap<Tenor, f64>,
    eval_date: Option<Date>,
    curve: Option<DiscountCurve>,
    dirty: bool,
}

impl CurveBook {
    /// Creates a book with all quotes at 0.0 and no curve.
    #[must_use]
    pub fn new() -> Self {
        let quotes = Tenor::ALL.iter().map(|&t| (t, 0.0)).collect();

        Self {
            quotes,
            eval_date: None,
            curve: None,
            dirty: false,
        }
    }

    /// Applies a market tick: sets the given quotes and the evaluation
    /// date, then (re)builds the curve.
    ///
    /// Tenors absent from `rates` keep their previous values.
    ///
    /// # Errors
    ///
    /// Returns an error if the bootstrap fails.
    pub fn update_rates(
        &mut self,
        rates: impl IntoIterator<Item = (Tenor, f64)>,
        curve_date: Date,
    ) -> CurveResult<()> {
        let mut updated = 0usize;
        for (tenor, rate) in rates {
            self.quotes.insert(tenor, rate);
            updated += 1;
        }

        let first_build = self.curve.is_none();
        self.eval_date = Some(curve_date);
        self.dirty = true;
        self.rebuild()?;

        if first_build {
            info!(
                instruments = Tenor::ALL.len(),
                %curve_date,
                "Built yield curve"
            );
        }
        debug!(updated, %curve_date, "Updated rates");

        Ok(())
    }

    /// Returns the current quote for a tenor.
    #[must_use]
    pub fn quote(&self, tenor: Tenor) -> f64 {
        self.quotes.get(&tenor).copied().unwrap_or(0.0)
    }

    /// Sets a quote, invalidating the cached curve.
    pub fn set_quote(&mut self, tenor: Tenor, value: f64) {
        self.quotes.insert(tenor, value);
        self.dirty = true;
    }

    /// Returns the evaluation date set by the last tick.
    #[must_use]
    pub fn evaluation_date(&self) -> Option<Date> {
        self.eval_date
    }

    /// Returns true once a curve has been bootstrapped.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.curve.is_some()
    }

    /// Returns the active curve, rebuilding it first if any quote
    /// changed since the last access.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NotBuilt`] before the first
    /// [`update_rates`](CurveBook::update_rates), or a bootstrap error
    /// if recalibration fails.
    pub fn curve(&mut self) -> CurveResult<&DiscountCurve> {
        if self.eval_date.is_none() {
            return Err(CurveError::NotBuilt);
        }

        if self.dirty || self.curve.is_none() {
            self.rebuild()?;
        }

        Ok(self.curve.as_ref().expect("curve present after rebuild"))
    }

    /// Discount factor readout for a time in years.
    ///
    /// Returns 1.0 while the curve is unbuilt.
    pub fn discount_factor(&mut self, years: f64) -> f64 {
        match self.curve() {
            Ok(curve) => curve.discount_factor(years).unwrap_or(1.0),
            Err(_) => 1.0,
        }
    }

    /// Annually compounded zero rate readout for a time in years.
    ///
    /// Returns 0.0 while the curve is unbuilt.
    pub fn zero_rate(&mut self, years: f64) -> f64 {
        match self.curve() {
            Ok(curve) => curve.zero_rate(years, Compounding::Annual).unwrap_or(0.0),
            Err(_) => 0.0,
        }
    }

    /// Re-bootstraps the curve from the current quote vector.
    fn rebuild(&mut self) -> CurveResult<()> {
        let eval = self.eval_date.ok_or(CurveError::NotBuilt)?;
        let calendar = UsGovernmentBond;
        let settlement = calendar.add_business_days(eval, 2);

        let mut bootstrapper = SequentialBootstrapper::new(eval);

        for &tenor in &Tenor::ALL {
            let rate = self.quote(tenor);
            let helper: Box<dyn CurveInstrument> = if tenor.is_money_market() {
                Box::new(Deposit::spanning(settlement, tenor, rate, &calendar)?)
            } else {
                Box::new(OvernightIndexSwap::spanning(
                    settlement, tenor, rate, &calendar,
                )?)
            };
            bootstrapper = bootstrapper.add_boxed(helper);
        }

        self.curve = Some(bootstrapper.bootstrap()?);
        self.dirty = false;

        debug!(%eval, %settlement, "Re-bootstrapped curve");
        Ok(())
    }
}

impl Default for CurveBook {
    fn default() -> Self {
        Self::new()
    }
}
