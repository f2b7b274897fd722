//! # Strata Risk
//!
//! Bump-and-reprice sensitivities for the Strata risk pipeline.
//!
//! [`RiskCalculator`] owns the [`CurveBook`](strata_curves::CurveBook)
//! and computes, per instrument: base NPV, DV01 via a parallel shift of
//! every quoted tenor, and key-rate durations via single-tenor shifts.
//! All bumps are central differences, and every mutation of the quote
//! vector goes through a [`QuoteGuard`] that restores the captured
//! values on drop - error and panic paths included - so the book is
//! bit-for-bit unchanged after every `calculate` call.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod calculator;
pub mod error;
pub mod guard;
pub mod metrics;

pub use calculator::RiskCalculator;
pub use error::{RiskError, RiskResult};
pub use guard::QuoteGuard;
pub use metrics::{aggregate_portfolio, PortfolioAggregate, RiskMetrics};
