//! # Strata Instruments
//!
//! Priced instruments for the Strata risk pipeline: fixed-rate bonds and
//! vanilla interest-rate swaps, both valued by discounting on a yield
//! curve from `strata-curves`.
//!
//! Instruments are immutable for the lifetime of the worker; the sum
//! type [`Instrument`] is the unit the portfolio loader materializes and
//! the risk calculator consumes. Adding a new instrument kind means
//! extending the enum and its `npv` dispatch.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bond;
pub mod error;
pub mod instrument;
pub mod schedule;
pub mod swap;

pub use bond::Bond;
pub use error::{PricingError, PricingResult};
pub use instrument::Instrument;
pub use schedule::{Schedule, ScheduleConfig, ScheduleGeneration};
pub use swap::Swap;
