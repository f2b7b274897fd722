//! Curve tenor labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// A symbolic term point on the yield curve.
///
/// The set is closed: these are the eleven pillars quoted by the market
/// data feed. The short end (1M through 1Y) is calibrated with
/// deposit-style instruments, the long end (2Y through 30Y) with
/// overnight index swaps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Tenor {
    /// One month
    #[serde(rename = "1M")]
    M1,
    /// Three months
    #[serde(rename = "3M")]
    M3,
    /// Six months
    #[serde(rename = "6M")]
    M6,
    /// One year
    #[serde(rename = "1Y")]
    Y1,
    /// Two years
    #[serde(rename = "2Y")]
    Y2,
    /// Three years
    #[serde(rename = "3Y")]
    Y3,
    /// Five years
    #[serde(rename = "5Y")]
    Y5,
    /// Seven years
    #[serde(rename = "7Y")]
    Y7,
    /// Ten years
    #[serde(rename = "10Y")]
    Y10,
    /// Twenty years
    #[serde(rename = "20Y")]
    Y20,
    /// Thirty years
    #[serde(rename = "30Y")]
    Y30,
}

impl Tenor {
    /// All recognized tenors in ascending maturity order.
    pub const ALL: [Tenor; 11] = [
        Tenor::M1,
        Tenor::M3,
        Tenor::M6,
        Tenor::Y1,
        Tenor::Y2,
        Tenor::Y3,
        Tenor::Y5,
        Tenor::Y7,
        Tenor::Y10,
        Tenor::Y20,
        Tenor::Y30,
    ];

    /// Tenors used for key-rate duration bumps.
    pub const KEY_RATES: [Tenor; 4] = [Tenor::Y2, Tenor::Y5, Tenor::Y10, Tenor::Y30];

    /// Returns the tenor length in months.
    #[must_use]
    pub fn months(&self) -> u32 {
        match self {
            Tenor::M1 => 1,
            Tenor::M3 => 3,
            Tenor::M6 => 6,
            Tenor::Y1 => 12,
            Tenor::Y2 => 24,
            Tenor::Y3 => 36,
            Tenor::Y5 => 60,
            Tenor::Y7 => 84,
            Tenor::Y10 => 120,
            Tenor::Y20 => 240,
            Tenor::Y30 => 360,
        }
    }

    /// Returns the tenor length in years.
    #[must_use]
    pub fn years(&self) -> f64 {
        f64::from(self.months()) / 12.0
    }

    /// Returns true for the deposit-style short end (1Y and below).
    #[must_use]
    pub fn is_money_market(&self) -> bool {
        self.months() <= 12
    }

    /// Returns the market label, e.g. `"5Y"`.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Tenor::M1 => "1M",
            Tenor::M3 => "3M",
            Tenor::M6 => "6M",
            Tenor::Y1 => "1Y",
            Tenor::Y2 => "2Y",
            Tenor::Y3 => "3Y",
            Tenor::Y5 => "5Y",
            Tenor::Y7 => "7Y",
            Tenor::Y10 => "10Y",
            Tenor::Y20 => "20Y",
            Tenor::Y30 => "30Y",
        }
    }

    /// Returns the lowercase label used for store field names, e.g. `"5y"`.
    #[must_use]
    pub fn field_label(&self) -> &'static str {
        match self {
            Tenor::M1 => "1m",
            Tenor::M3 => "3m",
            Tenor::M6 => "6m",
            Tenor::Y1 => "1y",
            Tenor::Y2 => "2y",
            Tenor::Y3 => "3y",
            Tenor::Y5 => "5y",
            Tenor::Y7 => "7y",
            Tenor::Y10 => "10y",
            Tenor::Y20 => "20y",
            Tenor::Y30 => "30y",
        }
    }

    /// Returns the date this tenor lands on from the given start date.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the month arithmetic overflows.
    pub fn end_date(&self, start: Date) -> CoreResult<Date> {
        start.add_months(self.months() as i32)
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Tenor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1M" => Ok(Tenor::M1),
            "3M" => Ok(Tenor::M3),
            "6M" => Ok(Tenor::M6),
            "1Y" | "12M" => Ok(Tenor::Y1),
            "2Y" => Ok(Tenor::Y2),
            "3Y" => Ok(Tenor::Y3),
            "5Y" => Ok(Tenor::Y5),
            "7Y" => Ok(Tenor::Y7),
            "10Y" => Ok(Tenor::Y10),
            "20Y" => Ok(Tenor::Y20),
            "30Y" => Ok(Tenor::Y30),
            _ => Err(CoreError::unknown_tenor(s)),
        }
    }
}
