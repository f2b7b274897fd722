//! Day count conventions for fixed income calculations.
//!
//! Day count conventions determine how accrued interest is calculated
//! by specifying how to count days between two dates and the year basis.
//!
//! The pipeline carries the four conventions quoted by the reference
//! service:
//!
//! - [`Act360`]: Actual/360 - money market and swap legs
//! - [`Act365Fixed`]: Actual/365 Fixed - curve time axis
//! - [`ActActIsda`]: Actual/Actual ISDA - government bonds
//! - [`Thirty360US`]: 30/360 US - corporate bonds

mod act360;
mod act365;
mod actact;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use actact::ActActIsda;
pub use thirty360::Thirty360US;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;
use rust_decimal::Decimal;

/// Trait for day count conventions.
///
/// Implementations provide the year fraction calculation between two dates
/// according to specific market conventions.
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Can be negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Calculates the day count between two dates.
    ///
    /// For ACT conventions, this is actual calendar days.
    /// For 30/360 conventions, this uses the 30-day month assumption.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Enumeration of the supported day count conventions.
///
/// Provides runtime selection and conversion to boxed trait objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/Actual ISDA - US government bonds
    #[default]
    #[serde(rename = "ACT_ACT")]
    ActActIsda,

    /// Actual/360 - money market instruments, swap legs
    #[serde(rename = "ACT_360")]
    Act360,

    /// Actual/365 Fixed
    #[serde(rename = "ACT_365")]
    Act365Fixed,

    /// 30/360 US (Bond Basis)
    #[serde(rename = "30_360")]
    Thirty360US,
}

impl DayCountConvention {
    /// Creates a boxed day count implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
        }
    }

    /// Year fraction between two dates as `f64`, for pricing paths.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        self.to_day_count()
            .year_fraction(start, end)
            .to_f64()
            .unwrap_or(0.0)
    }

    /// Returns the market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::ActActIsda => "ACT/ACT ISDA",
            DayCountConvention::Thirty360US => "30/360 US",
        }
    }

    /// Returns all supported conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::ActActIsda,
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::Thirty360US,
        ]
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = CoreError;

    /// Parses a day count convention from a string.
    ///
    /// Accepts both the reference-service spellings (`ACT_ACT`, `30_360`)
    /// and the market slash forms (`ACT/ACT`, `30/360`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_uppercase();
        let normalized = normalized.trim();

        match normalized {
            "ACT_ACT" | "ACT/ACT" | "ACT/ACT ISDA" | "ACTUAL/ACTUAL" => {
                Ok(DayCountConvention::ActActIsda)
            }
            "ACT_360" | "ACT/360" | "ACTUAL/360" => Ok(DayCountConvention::Act360),
            "ACT_365" | "ACT/365" | "ACT/365F" | "ACTUAL/365" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "30_360" | "30/360" | "30/360 US" | "BOND" => Ok(DayCountConvention::Thirty360US),
            _ => Err(CoreError::UnknownDayCount {
                label: s.to_string(),
            }),
        }
    }
}
