//! Discount factor curve with interpolation and extrapolation support.
//!
//! A [`DiscountCurve`] stores discount factors at pillar points and
//! interpolates between them. The production configuration is a natural
//! cubic spline on log discount factors ("log-cubic discount"), with
//! extrapolation beyond the last pillar.

use std::sync::Arc;

use strata_core::Date;

use crate::error::{CurveError, CurveResult};
use crate::interpolation::{CubicSpline, InterpolationMethod, Interpolator, LogLinear};
use crate::traits::Curve;

/// A discount factor curve with configurable interpolation.
///
/// # Construction
///
/// Use [`DiscountCurveBuilder`] for ergonomic curve construction:
///
/// ```rust
/// use strata_core::Date;
/// use strata_curves::{Curve, DiscountCurveBuilder, InterpolationMethod};
///
/// let curve = DiscountCurveBuilder::new(Date::from_ymd(2026, 1, 28).unwrap())
///     .add_pillar(0.25, 0.99)
///     .add_pillar(1.0, 0.96)
///     .add_pillar(5.0, 0.80)
///     .with_interpolation(InterpolationMethod::LogCubic)
///     .with_extrapolation()
///     .build()
///     .unwrap();
///
/// assert!(curve.discount_factor(2.0).unwrap() < 0.96);
/// ```
#[derive(Clone)]
pub struct DiscountCurve {
    /// Reference (valuation) date.
    reference_date: Date,
    /// Pillar times (year fractions from reference date).
    pillar_times: Vec<f64>,
    /// Discount factors at each pillar.
    discount_factors: Vec<f64>,
    /// Interpolation method.
    interpolation: InterpolationMethod,
    /// Interpolator over (time, log DF) or (time, DF) depending on method.
    interpolator: Arc<dyn Interpolator>,
    /// Allow extrapolation beyond curve range.
    allow_extrapolation: bool,
}

impl std::fmt::Debug for DiscountCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscountCurve")
            .field("reference_date", &self.reference_date)
            .field("pillar_times", &self.pillar_times)
            .field("discount_factors", &self.discount_factors)
            .field("interpolation", &self.interpolation)
            .field("allow_extrapolation", &self.allow_extrapolation)
            .finish()
    }
}

impl DiscountCurve {
    /// Creates a new discount curve.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No pillar points are provided
    /// - Pillar times and discount factors have different lengths
    /// - Pillar times are not strictly increasing
    /// - Any discount factor is non-positive
    pub fn new(
        reference_date: Date,
        pillar_times: Vec<f64>,
        discount_factors: Vec<f64>,
        interpolation: InterpolationMethod,
    ) -> CurveResult<Self> {
        if pillar_times.is_empty() {
            return Err(CurveError::EmptyCurve);
        }

        if pillar_times.len() != discount_factors.len() {
            return Err(CurveError::invalid_data(format!(
                "pillar_times ({}) and discount_factors ({}) must have same length",
                pillar_times.len(),
                discount_factors.len()
            )));
        }

        for (i, &df) in discount_factors.iter().enumerate() {
            if df <= 0.0 {
                return Err(CurveError::invalid_data(format!(
                    "discount_factor[{i}] = {df} is not positive"
                )));
            }
        }

        let interpolator = build_interpolator(interpolation, &pillar_times, &discount_factors)?;

        Ok(Self {
            reference_date,
            pillar_times,
            discount_factors,
            interpolation,
            interpolator,
            allow_extrapolation: false,
        })
    }

    /// Creates the curve with extrapolation enabled.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Returns the pillar times.
    #[must_use]
    pub fn pillar_times(&self) -> &[f64] {
        &self.pillar_times
    }

    /// Returns the discount factors at pillars.
    #[must_use]
    pub fn discount_factors_raw(&self) -> &[f64] {
        &self.discount_factors
    }

    /// Returns the interpolation method.
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMethod {
        self.interpolation
    }

    /// Returns the last pillar time in years.
    #[must_use]
    pub fn max_time(&self) -> f64 {
        *self.pillar_times.last().unwrap_or(&0.0)
    }

    fn interpolate_df(&self, t: f64) -> CurveResult<f64> {
        if t <= 0.0 {
            return Ok(1.0);
        }

        let min = *self.pillar_times.first().unwrap_or(&0.0);
        if !self.allow_extrapolation && (t < min || t > self.max_time()) {
            return Err(CurveError::OutOfRange {
                t,
                min,
                max: self.max_time(),
            });
        }

        match self.interpolation {
            InterpolationMethod::LogCubic => {
                // Spline is on log(DF), convert back
                let log_df = self.interpolator.interpolate(t)?;
                Ok(log_df.exp())
            }
            InterpolationMethod::LogLinear => self.interpolator.interpolate(t),
        }
    }
}

/// Builds the interpolator for the given method.
///
/// The log-cubic spline needs at least three knots; curves with fewer
/// pillars (partial curves early in a bootstrap) fall back to log-linear.
fn build_interpolator(
    method: InterpolationMethod,
    times: &[f64],
    dfs: &[f64],
) -> CurveResult<Arc<dyn Interpolator>> {
    let interp: Arc<dyn Interpolator> = match method {
        InterpolationMethod::LogCubic if times.len() >= 3 => {
            let log_dfs: Vec<f64> = dfs.iter().map(|df| df.ln()).collect();
            Arc::new(CubicSpline::new(times.to_vec(), log_dfs)?.with_extrapolation())
        }
        InterpolationMethod::LogCubic | InterpolationMethod::LogLinear if times.len() >= 2 => {
            Arc::new(LogLinear::new(times.to_vec(), dfs.to_vec())?.with_extrapolation())
        }
        _ => {
            // Single pillar: flat in log space
            let t = times[0];
            let df = dfs[0];
            Arc::new(LogLinear::new(vec![t, t + 1.0], vec![df, df])?.with_extrapolation())
        }
    };

    Ok(interp)
}

impl Curve for DiscountCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        self.interpolate_df(t)
    }

    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn max_date(&self) -> Date {
        self.reference_date
            .add_days((self.max_time() * 365.0).round() as i64)
    }
}

/// Builder for constructing discount curves.
#[derive(Debug, Clone)]
pub struct DiscountCurveBuilder {
    reference_date: Date,
    pillars: Vec<(f64, f64)>, // (time, df)
    interpolation: InterpolationMethod,
    allow_extrapolation: bool,
}

impl DiscountCurveBuilder {
    /// Creates a new builder with the given reference date.
    #[must_use]
    pub fn new(reference_date: Date) -> Self {
        Self {
            reference_date,
            pillars: Vec::new(),
            interpolation: InterpolationMethod::LogCubic,
            allow_extrapolation: false,
        }
    }

    /// Adds a pillar point (time in years, discount factor).
    #[must_use]
    pub fn add_pillar(mut self, time: f64, df: f64) -> Self {
        self.pillars.push((time, df));
        self
    }

    /// Adds a pillar from a continuously compounded zero rate.
    #[must_use]
    pub fn add_zero_rate(mut self, time: f64, rate: f64) -> Self {
        let df = (-rate * time).exp();
        self.pillars.push((time, df));
        self
    }

    /// Sets the interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, method: InterpolationMethod) -> Self {
        self.interpolation = method;
        self
    }

    /// Enables extrapolation beyond the curve range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }

    /// Builds the discount curve.
    ///
    /// # Errors
    ///
    /// Returns an error if no pillars were added or the data is invalid.
    pub fn build(mut self) -> CurveResult<DiscountCurve> {
        if self.pillars.is_empty() {
            return Err(CurveError::EmptyCurve);
        }

        // Sort by time and drop duplicate pillar times
        self.pillars
            .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        self.pillars.dedup_by(|a, b| (a.0 - b.0).abs() < 1e-12);

        let (times, dfs): (Vec<f64>, Vec<f64>) = self.pillars.into_iter().unzip();

        let mut curve = DiscountCurve::new(self.reference_date, times, dfs, self.interpolation)?;

        if self.allow_extrapolation {
            curve = curve.with_extrapolation();
        }

        Ok(curve)
    }
}
