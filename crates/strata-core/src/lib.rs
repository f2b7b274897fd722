//! # Strata Core
//!
//! Core types for the Strata fixed-income risk pipeline.
//!
//! This crate provides the building blocks shared by the curve, pricing,
//! and risk crates:
//!
//! - **Types**: `Date`, `Tenor`, `Frequency`, `PayReceive`
//! - **Day Count Conventions**: ACT/360, ACT/365F, ACT/ACT ISDA, 30/360 US
//! - **Business Day Calendars**: weekend-only and US government bond market
//!
//! Everything here is deliberately free of I/O and async concerns; the
//! worker crates compose these types into the streaming pipeline.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{BusinessDayConvention, Calendar, UsGovernmentBond};
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, Frequency, PayReceive, Tenor};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Date, Frequency, PayReceive, Tenor};
