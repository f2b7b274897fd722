//! Risk metric types and portfolio aggregation.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use strata_core::Tenor;

/// Risk metrics for one instrument under one curve tick.
///
/// `dv01` is currency units per 1 bp parallel shift; a long
/// fixed-income position has positive DV01 (it loses when rates rise).
/// `krd` holds the same measure per key-rate tenor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// The instrument this was computed for.
    pub instrument_id: String,
    /// Net present value in currency units.
    pub npv: f64,
    /// Currency change per 1 bp parallel downward shift.
    pub dv01: f64,
    /// Key-rate durations by tenor.
    pub krd: BTreeMap<Tenor, f64>,
}

/// Portfolio-level totals computed from published per-trade records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAggregate {
    /// Sum of per-trade NPVs.
    pub total_npv: f64,
    /// Sum of per-trade DV01s.
    pub total_dv01: f64,
    /// Number of trades that contributed.
    pub instrument_count: usize,
    /// Sum of per-trade key-rate durations by tenor.
    pub krd_totals: BTreeMap<Tenor, f64>,
    /// When the aggregation ran, epoch milliseconds.
    pub updated_at_ms: i64,
}

/// Sums the per-trade hash records read back from the store.
///
/// Each record is the field map of one `trade:{id}:risk` hash. Records
/// with unparsable numeric fields are skipped with a warning; the
/// aggregate reflects whatever the store currently holds, which under
/// multiple workers is the union of each partition's latest writes.
#[must_use]
pub fn aggregate_portfolio(
    records: &HashMap<String, HashMap<String, String>>,
    updated_at_ms: i64,
) -> PortfolioAggregate {
    let mut total_npv = 0.0;
    let mut total_dv01 = 0.0;
    let mut krd_totals: BTreeMap<Tenor, f64> =
        Tenor::KEY_RATES.iter().map(|&t| (t, 0.0)).collect();

    for (instrument_id, fields) in records {
        let npv = fields.get("npv").map(|v| v.parse::<f64>());
        let dv01 = fields.get("dv01").map(|v| v.parse::<f64>());

        let (npv, dv01) = match (npv, dv01) {
            (Some(Ok(npv)), Some(Ok(dv01))) => (npv, dv01),
            _ => {
                warn!(%instrument_id, "Skipping trade with invalid risk fields");
                continue;
            }
        };

        total_npv += npv;
        total_dv01 += dv01;

        for tenor in Tenor::KEY_RATES {
            let field = format!("krd_{}", tenor.field_label());
            if let Some(Ok(value)) = fields.get(&field).map(|v| v.parse::<f64>()) {
                *krd_totals.entry(tenor).or_insert(0.0) += value;
            }
        }
    }

    PortfolioAggregate {
        total_npv,
        total_dv01,
        instrument_count: records.len(),
        krd_totals,
        updated_at_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(npv: &str, dv01: &str, krd_5y: &str) -> HashMap<String, String> {
        let mut fields = HashMap::new();
        fields.insert("npv".to_string(), npv.to_string());
        fields.insert("dv01".to_string(), dv01.to_string());
        fields.insert("krd_5y".to_string(), krd_5y.to_string());
        fields
    }

    #[test]
    fn test_aggregate_sums_fields() {
        let mut records = HashMap::new();
        records.insert("a".to_string(), record("1000.5", "250", "120"));
        records.insert("b".to_string(), record("-200.5", "-175", "30"));

        let agg = aggregate_portfolio(&records, 1_769_558_400_000);

        assert_eq!(agg.instrument_count, 2);
        assert!((agg.total_npv - 800.0).abs() < 1e-9);
        assert!((agg.total_dv01 - 75.0).abs() < 1e-9);
        assert!((agg.krd_totals[&Tenor::Y5] - 150.0).abs() < 1e-9);
        assert_eq!(agg.krd_totals[&Tenor::Y30], 0.0);
        assert_eq!(agg.updated_at_ms, 1_769_558_400_000);
    }

    #[test]
    fn test_aggregate_skips_malformed() {
        let mut records = HashMap::new();
        records.insert("good".to_string(), record("100", "10", "5"));
        records.insert("bad".to_string(), record("not-a-number", "10", "5"));

        let agg = aggregate_portfolio(&records, 0);

        assert!((agg.total_dv01 - 10.0).abs() < 1e-9);
        // Count follows the scan, matching what the store holds
        assert_eq!(agg.instrument_count, 2);
    }

    #[test]
    fn test_aggregate_empty() {
        let agg = aggregate_portfolio(&HashMap::new(), 42);

        assert_eq!(agg.instrument_count, 0);
        assert_eq!(agg.total_npv, 0.0);
        assert_eq!(agg.krd_totals.len(), Tenor::KEY_RATES.len());
    }

    #[test]
    fn test_metrics_serialize() {
        let metrics = RiskMetrics {
            instrument_id: "a".to_string(),
            npv: 1.5,
            dv01: 0.25,
            krd: BTreeMap::from([(Tenor::Y2, 0.1)]),
        };
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("\"2Y\""));
    }
}
