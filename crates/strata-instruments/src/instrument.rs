//! Instrument sum type.

use serde::{Deserialize, Serialize};

use strata_curves::Curve;

use crate::bond::Bond;
use crate::error::PricingResult;
use crate::swap::Swap;

/// A priced instrument: a bond or a swap.
///
/// The portfolio is a vector of these, loaded once at startup and
/// immutable for the worker's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "instrument_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Instrument {
    /// Fixed-rate bullet bond.
    Bond(Bond),
    /// Vanilla interest-rate swap.
    Swap(Swap),
}

impl Instrument {
    /// Returns the instrument identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Instrument::Bond(bond) => &bond.id,
            Instrument::Swap(swap) => &swap.id,
        }
    }

    /// Returns the notional in currency units.
    #[must_use]
    pub fn notional(&self) -> f64 {
        match self {
            Instrument::Bond(bond) => bond.notional,
            Instrument::Swap(swap) => swap.notional,
        }
    }

    /// Returns the trade currency.
    #[must_use]
    pub fn currency(&self) -> &str {
        match self {
            Instrument::Bond(bond) => &bond.currency,
            Instrument::Swap(swap) => &swap.currency,
        }
    }

    /// Returns a short kind label for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Instrument::Bond(_) => "BOND",
            Instrument::Swap(_) => "SWAP",
        }
    }

    /// Net present value on the given curve.
    ///
    /// # Errors
    ///
    /// Propagates the underlying pricer's [`crate::PricingError`].
    pub fn npv(&self, curve: &dyn Curve) -> PricingResult<f64> {
        match self {
            Instrument::Bond(bond) => bond.npv(curve),
            Instrument::Swap(swap) => swap.npv(curve),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::daycounts::DayCountConvention;
    use strata_core::{Date, Frequency, PayReceive};

    fn bond() -> Instrument {
        Instrument::Bond(Bond {
            id: "b-1".to_string(),
            isin: "US0000000001".to_string(),
            notional: 1_000_000.0,
            currency: "USD".to_string(),
            coupon_rate: 0.04,
            maturity_date: Date::from_ymd(2030, 6, 15).unwrap(),
            issue_date: None,
            payment_frequency: Frequency::SemiAnnual,
            day_count: DayCountConvention::ActActIsda,
        })
    }

    fn swap() -> Instrument {
        Instrument::Swap(Swap {
            id: "s-1".to_string(),
            notional: 10_000_000.0,
            currency: "USD".to_string(),
            fixed_rate: 0.041,
            tenor_label: "5Y".to_string(),
            trade_date: Date::from_ymd(2026, 1, 28).unwrap(),
            maturity_date: Date::from_ymd(2031, 1, 28).unwrap(),
            effective_date: None,
            pay_receive: PayReceive::Pay,
            float_index: "SOFR".to_string(),
            payment_frequency: Frequency::Quarterly,
        })
    }

    #[test]
    fn test_common_accessors() {
        assert_eq!(bond().id(), "b-1");
        assert_eq!(swap().id(), "s-1");
        assert_eq!(bond().notional(), 1_000_000.0);
        assert_eq!(swap().notional(), 10_000_000.0);
        assert_eq!(bond().currency(), "USD");
        assert_eq!(bond().kind(), "BOND");
        assert_eq!(swap().kind(), "SWAP");
    }

    #[test]
    fn test_tagged_serde() {
        let json = serde_json::to_string(&bond()).unwrap();
        assert!(json.contains("\"instrument_type\":\"BOND\""));

        let parsed: Instrument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id(), "b-1");

        let json = serde_json::to_string(&swap()).unwrap();
        assert!(json.contains("\"instrument_type\":\"SWAP\""));
    }
}
