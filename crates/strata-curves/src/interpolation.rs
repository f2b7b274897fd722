//! Interpolation methods for curve construction.
//!
//! Two methods are carried here, both operating on discount factors:
//!
//! - [`LogLinear`]: linear interpolation on log discount factors,
//!   equivalent to piecewise-flat forward rates
//! - [`CubicSpline`]: natural cubic spline, applied to log discount
//!   factors by the curve layer ("log-cubic discount")

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Interpolation method selector for discount curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolationMethod {
    /// Log-linear on discount factors.
    LogLinear,
    /// Natural cubic spline on log discount factors.
    #[default]
    LogCubic,
}

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> CurveResult<f64>;

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        false
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;
}

fn validate_knots(xs: &[f64], ys: &[f64], min_points: usize) -> CurveResult<()> {
    if xs.len() < min_points {
        return Err(CurveError::invalid_data(format!(
            "need at least {} points, got {}",
            min_points,
            xs.len()
        )));
    }
    if xs.len() != ys.len() {
        return Err(CurveError::invalid_data(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    for i in 1..xs.len() {
        if xs[i] <= xs[i - 1] {
            return Err(CurveError::invalid_data(
                "x values must be strictly increasing",
            ));
        }
    }
    Ok(())
}

fn check_range(x: f64, xs: &[f64], allow_extrapolation: bool) -> CurveResult<()> {
    if !allow_extrapolation && (x < xs[0] || x > xs[xs.len() - 1]) {
        return Err(CurveError::OutOfRange {
            t: x,
            min: xs[0],
            max: xs[xs.len() - 1],
        });
    }
    Ok(())
}

/// Finds the index i such that xs[i] <= x < xs[i+1], clamped to valid segments.
fn find_segment(xs: &[f64], x: f64) -> usize {
    match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal)) {
        Ok(i) => i.min(xs.len() - 2),
        Err(i) => i.saturating_sub(1).min(xs.len() - 2),
    }
}

/// Log-linear interpolation.
///
/// Interpolates linearly on the natural log of the values, which keeps
/// interpolated discount factors strictly positive. Extrapolation extends
/// the boundary segments.
#[derive(Debug, Clone)]
pub struct LogLinear {
    xs: Vec<f64>,
    log_ys: Vec<f64>,
    allow_extrapolation: bool,
}

impl LogLinear {
    /// Creates a log-linear interpolator over strictly positive values.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 2 points are supplied, lengths
    /// differ, xs are not strictly increasing, or any value is
    /// non-positive.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> CurveResult<Self> {
        validate_knots(&xs, &ys, 2)?;
        for (i, &y) in ys.iter().enumerate() {
            if y <= 0.0 {
                return Err(CurveError::invalid_data(format!(
                    "value[{i}] = {y} is not positive"
                )));
            }
        }

        let log_ys = ys.iter().map(|y| y.ln()).collect();

        Ok(Self {
            xs,
            log_ys,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }
}

impl Interpolator for LogLinear {
    fn interpolate(&self, x: f64) -> CurveResult<f64> {
        check_range(x, &self.xs, self.allow_extrapolation)?;

        let i = find_segment(&self.xs, x);
        let slope = (self.log_ys[i + 1] - self.log_ys[i]) / (self.xs[i + 1] - self.xs[i]);
        let log_y = self.log_ys[i] + slope * (x - self.xs[i]);

        Ok(log_y.exp())
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

/// Natural cubic spline interpolation.
///
/// Constructs a smooth curve through data points using piecewise cubic
/// polynomials with continuous first and second derivatives. "Natural"
/// means the second derivative is zero at the endpoints. Extrapolation
/// extends the boundary cubics.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at each knot
    y2s: Vec<f64>,
    allow_extrapolation: bool,
}

impl CubicSpline {
    /// Creates a natural cubic spline interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 3 points, lengths differ,
    /// or xs are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> CurveResult<Self> {
        validate_knots(&xs, &ys, 3)?;

        let y2s = compute_second_derivatives(&xs, &ys);

        Ok(Self {
            xs,
            ys,
            y2s,
            allow_extrapolation: false,
        })
    }

    /// Enables extrapolation beyond the data range.
    #[must_use]
    pub fn with_extrapolation(mut self) -> Self {
        self.allow_extrapolation = true;
        self
    }
}

impl Interpolator for CubicSpline {
    fn interpolate(&self, x: f64) -> CurveResult<f64> {
        check_range(x, &self.xs, self.allow_extrapolation)?;

        let i = find_segment(&self.xs, x);

        let x_lo = self.xs[i];
        let x_hi = self.xs[i + 1];
        let y_lo = self.ys[i];
        let y_hi = self.ys[i + 1];
        let y2_lo = self.y2s[i];
        let y2_hi = self.y2s[i + 1];

        let h = x_hi - x_lo;
        let a = (x_hi - x) / h;
        let b = (x - x_lo) / h;

        let y =
            a * y_lo + b * y_hi + ((a * a * a - a) * y2_lo + (b * b * b - b) * y2_hi) * (h * h) / 6.0;

        Ok(y)
    }

    fn allows_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

/// Computes the second derivatives for a natural cubic spline.
fn compute_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2s = vec![0.0; n];
    let mut u = vec![0.0; n - 1];

    // Natural spline: y2[0] = 0
    y2s[0] = 0.0;
    u[0] = 0.0;

    // Decomposition loop
    for i in 1..n - 1 {
        let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
        let p = sig * y2s[i - 1] + 2.0;
        y2s[i] = (sig - 1.0) / p;
        u[i] =
            (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i]) - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        u[i] = (6.0 * u[i] / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
    }

    // Natural spline: y2[n-1] = 0
    y2s[n - 1] = 0.0;

    // Back-substitution loop
    for i in (0..n - 1).rev() {
        y2s[i] = y2s[i] * y2s[i + 1] + u[i];
    }

    y2s
}
