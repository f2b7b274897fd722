//! Rate compounding conventions.

use serde::{Deserialize, Serialize};

/// Interest compounding convention for zero rate readouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compounding {
    /// Annual compounding - the convention for curve readouts.
    #[default]
    Annual,
    /// Semi-annual compounding.
    SemiAnnual,
    /// Continuous compounding.
    Continuous,
}

impl Compounding {
    /// Converts a discount factor at time `t` into a zero rate.
    ///
    /// Returns 0.0 for non-positive times or discount factors.
    #[must_use]
    pub fn zero_rate(&self, df: f64, t: f64) -> f64 {
        if t <= 0.0 || df <= 0.0 {
            return 0.0;
        }

        match self {
            Compounding::Annual => df.powf(-1.0 / t) - 1.0,
            Compounding::SemiAnnual => 2.0 * (df.powf(-1.0 / (2.0 * t)) - 1.0),
            Compounding::Continuous => -df.ln() / t,
        }
    }

    /// Converts a zero rate at time `t` into a discount factor.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }

        match self {
            Compounding::Annual => (1.0 + rate).powf(-t),
            Compounding::SemiAnnual => (1.0 + rate / 2.0).powf(-2.0 * t),
            Compounding::Continuous => (-rate * t).exp(),
        }
    }
}
