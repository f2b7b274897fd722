//! Redis publisher for pipeline outputs.
//!
//! Key layout:
//! - `trade:{id}:risk` - hash, TTL-bounded per-trade risk record
//! - `portfolio:aggregates` - hash, no TTL
//! - `yield_curve:latest` - hash, most recent curve snapshot
//! - `yield_curve:history` - sorted set scored by tick timestamp,
//!   pruned to the last hour
//! - `portfolio:dv01_history` / `portfolio:npv_history` - sorted sets,
//!   pruned to the last seven days
//! - pub/sub channel `risk_updates` - change notification per risk write
//!
//! Every write is an idempotent overwrite; replaying a tick leaves the
//! store in the same state. Writes are batched into one pipeline per
//! operation and retried once on transient failure.

use std::collections::{BTreeMap, HashMap};

use redis::AsyncCommands;
use tracing::{debug, info, warn};

use strata_risk::{PortfolioAggregate, RiskMetrics};

use crate::error::WorkerError;

/// Curve history retention, milliseconds.
const CURVE_HISTORY_MS: i64 = 3_600_000;

/// Portfolio snapshot history retention, milliseconds.
const SNAPSHOT_HISTORY_MS: i64 = 7 * 24 * 3_600_000;

/// SCAN batch size for the aggregation read-back.
const SCAN_COUNT: u32 = 100;

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Fields written to `trade:{id}:risk`.
fn risk_fields(
    metrics: &RiskMetrics,
    curve_timestamp: i64,
    updated_at: i64,
) -> Vec<(String, String)> {
    let mut fields = vec![
        ("npv".to_string(), metrics.npv.to_string()),
        ("dv01".to_string(), metrics.dv01.to_string()),
        ("curve_timestamp".to_string(), curve_timestamp.to_string()),
        ("updated_at".to_string(), updated_at.to_string()),
    ];

    for (tenor, value) in &metrics.krd {
        fields.push((format!("krd_{}", tenor.field_label()), value.to_string()));
    }

    fields
}

/// Fields written to `yield_curve:latest`.
fn curve_fields(
    rates: &BTreeMap<String, f64>,
    curve_timestamp: i64,
    updated_at: i64,
) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = rates
        .iter()
        .map(|(label, rate)| (format!("rate_{}", label.to_lowercase()), rate.to_string()))
        .collect();

    fields.push(("timestamp".to_string(), curve_timestamp.to_string()));
    fields.push(("updated_at".to_string(), updated_at.to_string()));
    fields
}

/// Sorted-set member for the portfolio history sets.
///
/// The timestamp is embedded so equal values on different ticks stay
/// distinct members.
fn history_point(timestamp: i64, value: f64) -> String {
    serde_json::json!({"timestamp": timestamp, "value": value}).to_string()
}

/// Fields written to `portfolio:aggregates`.
fn aggregate_fields(aggregate: &PortfolioAggregate) -> Vec<(String, String)> {
    let mut fields = vec![
        ("total_npv".to_string(), aggregate.total_npv.to_string()),
        ("total_dv01".to_string(), aggregate.total_dv01.to_string()),
        (
            "instrument_count".to_string(),
            aggregate.instrument_count.to_string(),
        ),
        (
            "updated_at".to_string(),
            aggregate.updated_at_ms.to_string(),
        ),
    ];

    for (tenor, value) in &aggregate.krd_totals {
        fields.push((
            format!("total_krd_{}", tenor.field_label()),
            value.to_string(),
        ));
    }

    fields
}

/// Publisher over a Redis multiplexed connection.
pub struct RiskStore {
    con: redis::aio::MultiplexedConnection,
    ttl: i64,
}

impl RiskStore {
    /// Connects and verifies the store with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Store`] when the store is unreachable.
    pub async fn connect(host: &str, port: u16, ttl: i64) -> Result<Self, WorkerError> {
        let client = redis::Client::open((host, port))?;
        let mut con = client.get_multiplexed_async_connection().await?;

        let _: String = redis::cmd("PING").query_async(&mut con).await?;
        info!(host, port, "Store connected");

        Ok(Self { con, ttl })
    }

    /// Runs a pipeline, retrying once on failure.
    async fn exec_with_retry(
        &mut self,
        pipe: &redis::Pipeline,
        what: &'static str,
    ) -> Result<(), WorkerError> {
        let first: redis::RedisResult<()> = pipe.query_async(&mut self.con).await;
        if let Err(first) = first {
            warn!(error = %first, what, "Store write failed, retrying once");
            let _: () = pipe.query_async(&mut self.con).await?;
        }
        Ok(())
    }

    /// Writes one instrument's risk record and publishes a change
    /// notification on `risk_updates`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Store`] when the write fails after the
    /// retry; the coordinator then skips the commit.
    pub async fn write_risk(
        &mut self,
        metrics: &RiskMetrics,
        curve_timestamp: i64,
    ) -> Result<(), WorkerError> {
        let key = format!("trade:{}:risk", metrics.instrument_id);
        let fields = risk_fields(metrics, curve_timestamp, now_ms());

        let mut pipe = redis::pipe();
        pipe.atomic()
            .hset_multiple(&key, &fields)
            .ignore()
            .expire(&key, self.ttl)
            .ignore();
        self.exec_with_retry(&pipe, "write_risk").await?;

        let notification = serde_json::json!({
            "instrument_id": metrics.instrument_id,
            "timestamp": curve_timestamp,
        })
        .to_string();
        let _: i64 = self.con.publish("risk_updates", notification).await?;

        debug!(
            instrument_id = %metrics.instrument_id,
            dv01 = metrics.dv01,
            "Wrote risk record"
        );
        Ok(())
    }

    /// Writes the latest curve snapshot and appends it to the pruned
    /// one-hour history.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Store`] when the write fails after the retry.
    pub async fn write_yield_curve(
        &mut self,
        rates: &BTreeMap<String, f64>,
        curve_timestamp: i64,
    ) -> Result<(), WorkerError> {
        let fields = curve_fields(rates, curve_timestamp, now_ms());
        let history_json =
            serde_json::to_string(rates).map_err(|e| WorkerError::parse(e.to_string()))?;
        let cutoff = now_ms() - CURVE_HISTORY_MS;

        let mut pipe = redis::pipe();
        pipe.atomic()
            .hset_multiple("yield_curve:latest", &fields)
            .ignore()
            .zadd("yield_curve:history", history_json, curve_timestamp)
            .ignore()
            .zrembyscore("yield_curve:history", "-inf", cutoff)
            .ignore();
        self.exec_with_retry(&pipe, "write_yield_curve").await?;

        debug!(curve_timestamp, "Wrote yield curve snapshot");
        Ok(())
    }

    /// Writes the portfolio aggregate hash.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Store`] when the write fails after the retry.
    pub async fn write_portfolio_aggregates(
        &mut self,
        aggregate: &PortfolioAggregate,
    ) -> Result<(), WorkerError> {
        let fields = aggregate_fields(aggregate);

        let mut pipe = redis::pipe();
        pipe.atomic()
            .hset_multiple("portfolio:aggregates", &fields)
            .ignore();
        self.exec_with_retry(&pipe, "write_portfolio_aggregates")
            .await?;

        info!(
            total_dv01 = aggregate.total_dv01,
            instruments = aggregate.instrument_count,
            "Portfolio aggregates updated"
        );
        Ok(())
    }

    /// Appends portfolio DV01/NPV points to the seven-day history
    /// sorted sets backing the dashboard sparklines. Called on the
    /// aggregation cadence with the freshly computed totals.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Store`] when the write fails after the retry.
    pub async fn snapshot_history(&mut self, dv01: f64, npv: f64) -> Result<(), WorkerError> {
        let now = now_ms();
        let cutoff = now - SNAPSHOT_HISTORY_MS;

        let dv01_point = history_point(now, dv01);
        let npv_point = history_point(now, npv);

        let mut pipe = redis::pipe();
        pipe.atomic()
            .zadd("portfolio:dv01_history", dv01_point, now)
            .ignore()
            .zrembyscore("portfolio:dv01_history", "-inf", cutoff)
            .ignore()
            .zadd("portfolio:npv_history", npv_point, now)
            .ignore()
            .zrembyscore("portfolio:npv_history", "-inf", cutoff)
            .ignore();
        self.exec_with_retry(&pipe, "snapshot_history").await
    }

    /// Reads every `trade:*:risk` hash back for aggregation.
    ///
    /// Scans with a cursor in batches, then fetches the hashes in one
    /// pipeline per batch.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Store`] when the scan or read fails.
    pub async fn get_all_trade_risks(
        &mut self,
    ) -> Result<HashMap<String, HashMap<String, String>>, WorkerError> {
        let mut result = HashMap::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg("trade:*:risk")
                .arg("COUNT")
                .arg(SCAN_COUNT)
                .query_async(&mut self.con)
                .await?;

            if !keys.is_empty() {
                let mut pipe = redis::pipe();
                for key in &keys {
                    pipe.hgetall(key);
                }
                let maps: Vec<HashMap<String, String>> =
                    pipe.query_async(&mut self.con).await?;

                for (key, fields) in keys.iter().zip(maps) {
                    if let Some(instrument_id) = key.split(':').nth(1) {
                        result.insert(instrument_id.to_string(), fields);
                    }
                }
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use strata_core::Tenor;

    #[test]
    fn test_risk_fields_layout() {
        let metrics = RiskMetrics {
            instrument_id: "b-1".to_string(),
            npv: 1_000_000.25,
            dv01: 250.0,
            krd: BTreeMap::from([
                (Tenor::Y2, 120.0),
                (Tenor::Y5, 80.0),
                (Tenor::Y10, 0.5),
                (Tenor::Y30, 0.0),
            ]),
        };

        let fields = risk_fields(&metrics, 1_769_558_400_000, 1_769_558_400_123);
        let map: HashMap<_, _> = fields.into_iter().collect();

        assert_eq!(map["npv"], "1000000.25");
        assert_eq!(map["dv01"], "250");
        assert_eq!(map["curve_timestamp"], "1769558400000");
        assert_eq!(map["updated_at"], "1769558400123");
        assert_eq!(map["krd_2y"], "120");
        assert_eq!(map["krd_5y"], "80");
        assert_eq!(map["krd_10y"], "0.5");
        assert_eq!(map["krd_30y"], "0");
    }

    #[test]
    fn test_curve_fields_layout() {
        let rates = BTreeMap::from([
            ("2Y".to_string(), 0.0420),
            ("5Y".to_string(), 0.0410),
            ("10Y".to_string(), 0.0420),
            ("30Y".to_string(), 0.0450),
        ]);

        let fields = curve_fields(&rates, 1_769_558_400_000, 1_769_558_400_123);
        let map: HashMap<_, _> = fields.into_iter().collect();

        assert_eq!(map["rate_2y"], "0.042");
        assert_eq!(map["rate_5y"], "0.041");
        assert_eq!(map["rate_30y"], "0.045");
        assert_eq!(map["timestamp"], "1769558400000");
        assert!(map.contains_key("updated_at"));
    }

    #[test]
    fn test_aggregate_fields_layout() {
        let aggregate = PortfolioAggregate {
            total_npv: 800.0,
            total_dv01: 75.0,
            instrument_count: 2,
            krd_totals: BTreeMap::from([(Tenor::Y2, 150.0), (Tenor::Y5, -25.0)]),
            updated_at_ms: 1_769_558_400_000,
        };

        let fields = aggregate_fields(&aggregate);
        let map: HashMap<_, _> = fields.into_iter().collect();

        assert_eq!(map["total_npv"], "800");
        assert_eq!(map["total_dv01"], "75");
        assert_eq!(map["instrument_count"], "2");
        assert_eq!(map["total_krd_2y"], "150");
        assert_eq!(map["total_krd_5y"], "-25");
        assert_eq!(map["updated_at"], "1769558400000");
    }

    #[test]
    fn test_fields_roundtrip_full_precision() {
        let metrics = RiskMetrics {
            instrument_id: "b-1".to_string(),
            npv: 1_234_567.891_234_567_8,
            dv01: 0.1 + 0.2, // not representable exactly
            krd: BTreeMap::from([(Tenor::Y5, -175.000_000_000_1)]),
        };

        let fields: HashMap<_, _> = risk_fields(&metrics, 0, 0).into_iter().collect();

        assert_eq!(fields["npv"].parse::<f64>().unwrap(), metrics.npv);
        assert_eq!(fields["dv01"].parse::<f64>().unwrap(), metrics.dv01);
        assert_eq!(
            fields["krd_5y"].parse::<f64>().unwrap(),
            metrics.krd[&Tenor::Y5]
        );
    }

    #[test]
    fn test_curve_history_member_is_rate_map_json() {
        let rates = BTreeMap::from([("2Y".to_string(), 0.042)]);
        let json = serde_json::to_string(&rates).unwrap();
        assert_eq!(json, r#"{"2Y":0.042}"#);
    }

    #[test]
    fn test_history_point_shape() {
        let point = history_point(1_769_558_400_000, 75.0);
        assert_eq!(point, r#"{"timestamp":1769558400000,"value":75.0}"#);

        // Same total on a later tick is still a distinct member
        assert_ne!(point, history_point(1_769_558_460_000, 75.0));
    }
}
