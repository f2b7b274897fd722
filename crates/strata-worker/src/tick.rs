//! Curve tick wire format.

use std::collections::BTreeMap;

use serde::Deserialize;

use strata_core::{CoreResult, Date, Tenor};

/// One yield-curve snapshot from the bus.
///
/// Only tenors in the recognized set are applied to the quote vector;
/// unknown tenors and non-numeric rate values are skipped, leaving the
/// previous quotes in place.
#[derive(Debug, Clone, Deserialize)]
pub struct CurveTick {
    /// Tick timestamp, epoch milliseconds.
    pub timestamp: i64,
    /// Curve date as YYYY-MM-DD.
    pub curve_date: String,
    /// Curve family label, e.g. "USD_SOFR".
    #[serde(default)]
    pub curve_type: String,
    /// Raw tenor label to rate value map.
    #[serde(default)]
    pub rates: BTreeMap<String, serde_json::Value>,
}

impl CurveTick {
    /// Decodes a tick from a UTF-8 JSON payload.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error for malformed payloads; the
    /// coordinator treats those as poison pills.
    pub fn decode(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }

    /// Parses the curve date.
    ///
    /// # Errors
    ///
    /// Returns an error when `curve_date` is not a valid YYYY-MM-DD date.
    pub fn parse_curve_date(&self) -> CoreResult<Date> {
        Date::parse(&self.curve_date)
    }

    /// Returns the recognized, numeric rates as quote updates.
    #[must_use]
    pub fn tenor_rates(&self) -> Vec<(Tenor, f64)> {
        self.rates
            .iter()
            .filter_map(|(label, value)| {
                let tenor = label.parse::<Tenor>().ok()?;
                let rate = value.as_f64()?;
                Some((tenor, rate))
            })
            .collect()
    }

    /// Returns every numeric rate keyed by its original label, for the
    /// curve snapshot written to the store.
    #[must_use]
    pub fn numeric_rates(&self) -> BTreeMap<String, f64> {
        self.rates
            .iter()
            .filter_map(|(label, value)| Some((label.clone(), value.as_f64()?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tick() {
        let payload = br#"{
            "timestamp": 1769558400000,
            "curve_date": "2026-01-28",
            "curve_type": "USD_SOFR",
            "rates": {"2Y": 0.0420, "5Y": 0.0410, "10Y": 0.0420, "30Y": 0.0450}
        }"#;

        let tick = CurveTick::decode(payload).unwrap();
        assert_eq!(tick.timestamp, 1_769_558_400_000);
        assert_eq!(tick.curve_type, "USD_SOFR");
        assert_eq!(
            tick.parse_curve_date().unwrap(),
            Date::from_ymd(2026, 1, 28).unwrap()
        );

        let rates = tick.tenor_rates();
        assert_eq!(rates.len(), 4);
        assert!(rates.contains(&(Tenor::Y2, 0.0420)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(CurveTick::decode(b"not json").is_err());
        assert!(CurveTick::decode(b"{}").is_err()); // missing timestamp
    }

    #[test]
    fn test_unknown_tenors_ignored() {
        let payload = br#"{
            "timestamp": 1,
            "curve_date": "2026-01-28",
            "rates": {"4Y": 0.05, "2Y": 0.042, "FOO": 1.0}
        }"#;

        let tick = CurveTick::decode(payload).unwrap();
        let rates = tick.tenor_rates();

        assert_eq!(rates, vec![(Tenor::Y2, 0.042)]);
        // The raw snapshot still carries everything numeric
        assert_eq!(tick.numeric_rates().len(), 3);
    }

    #[test]
    fn test_non_numeric_values_skipped() {
        let payload = br#"{
            "timestamp": 1,
            "curve_date": "2026-01-28",
            "rates": {"2Y": "n/a", "5Y": null, "10Y": 0.042}
        }"#;

        let tick = CurveTick::decode(payload).unwrap();
        assert_eq!(tick.tenor_rates(), vec![(Tenor::Y10, 0.042)]);
        assert_eq!(tick.numeric_rates().len(), 1);
    }

    #[test]
    fn test_empty_rates() {
        let payload = br#"{"timestamp": 1, "curve_date": "2026-01-28"}"#;

        let tick = CurveTick::decode(payload).unwrap();
        assert!(tick.tenor_rates().is_empty());
        assert!(tick.numeric_rates().is_empty());
    }
}
