//! Curve tick replay from a CSV file.
//!
//! Reads one row at a time, so memory stays O(1) regardless of file
//! size. Each row carries a timestamp, an optional `curve_type`, and
//! one column per tenor label; the gap between consecutive row
//! timestamps, divided by the replay speed, becomes the pacing delay
//! before the row is published.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::warn;

use strata_core::Tenor;

use crate::error::FeedError;

/// Longest pacing sleep, regardless of gaps in the data.
const MAX_SLEEP: Duration = Duration::from_secs(60);

/// One curve tick as published on the bus.
#[derive(Debug, Clone, Serialize)]
pub struct CurveTick {
    /// Epoch milliseconds of the snapshot.
    pub timestamp: i64,
    /// Snapshot date as YYYY-MM-DD.
    pub curve_date: String,
    /// Curve family label.
    pub curve_type: String,
    /// Tenor label to rate value.
    pub rates: BTreeMap<String, f64>,
}

/// Parses a row timestamp.
///
/// Accepts ISO datetimes (`2026-01-28T10:00:00`, with or without the
/// `T`), bare dates, and epoch milliseconds.
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, FeedError> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    if let Ok(millis) = raw.parse::<i64>() {
        if let Some(dt) = DateTime::from_timestamp_millis(millis) {
            return Ok(dt.naive_utc());
        }
    }

    Err(FeedError::config(format!("cannot parse timestamp: {raw}")))
}

/// Builds the bus message for one CSV row.
fn format_tick(row: &HashMap<String, String>, timestamp: NaiveDateTime) -> CurveTick {
    let mut rates = BTreeMap::new();
    for tenor in Tenor::ALL {
        if let Some(raw) = row.get(tenor.label()) {
            if raw.is_empty() {
                continue;
            }
            if let Ok(rate) = raw.parse::<f64>() {
                rates.insert(tenor.label().to_string(), rate);
            }
        }
    }

    let curve_type = row
        .get("curve_type")
        .filter(|s| !s.is_empty())
        .cloned()
        .unwrap_or_else(|| "USD_SOFR".to_string());

    CurveTick {
        timestamp: timestamp.and_utc().timestamp_millis(),
        curve_date: timestamp.format("%Y-%m-%d").to_string(),
        curve_type,
        rates,
    }
}

/// Pacing delay between two row timestamps at the given replay speed.
fn pacing(prev: Option<NaiveDateTime>, current: NaiveDateTime, speed: f64) -> Duration {
    let Some(prev) = prev else {
        return Duration::ZERO;
    };

    if current <= prev || speed <= 0.0 {
        return Duration::ZERO;
    }

    let delta_secs = (current - prev).num_milliseconds() as f64 / 1000.0;
    let sleep = Duration::from_secs_f64(delta_secs / speed).min(MAX_SLEEP);

    if sleep > Duration::from_millis(1) {
        sleep
    } else {
        Duration::ZERO
    }
}

/// Streaming replay over a CSV source.
///
/// Yields `(pacing delay, tick)` pairs; rows with unusable timestamps
/// are skipped with a warning.
pub struct TickReplay<R: std::io::Read> {
    rows: csv::DeserializeRecordsIntoIter<R, HashMap<String, String>>,
    prev: Option<NaiveDateTime>,
    speed: f64,
}

impl TickReplay<std::fs::File> {
    /// Opens a replay over a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Data`] when the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, speed: f64) -> Result<Self, FeedError> {
        let reader = csv::Reader::from_path(path)?;
        Ok(Self {
            rows: reader.into_deserialize(),
            prev: None,
            speed,
        })
    }
}

impl<R: std::io::Read> TickReplay<R> {
    /// Opens a replay over any CSV reader.
    pub fn from_reader(reader: R, speed: f64) -> Self {
        Self {
            rows: csv::Reader::from_reader(reader).into_deserialize(),
            prev: None,
            speed,
        }
    }
}

impl<R: std::io::Read> Iterator for TickReplay<R> {
    type Item = Result<(Duration, CurveTick), FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.rows.next()? {
                Ok(row) => row,
                Err(e) => return Some(Err(e.into())),
            };

            let Some(raw_timestamp) = row.get("timestamp") else {
                warn!("Skipping row without timestamp column");
                continue;
            };

            let timestamp = match parse_timestamp(raw_timestamp) {
                Ok(ts) => ts,
                Err(e) => {
                    warn!(error = %e, "Skipping row with invalid timestamp");
                    continue;
                }
            };

            let delay = pacing(self.prev, timestamp, self.speed);
            self.prev = Some(timestamp);

            return Some(Ok((delay, format_tick(&row, timestamp))));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
timestamp,curve_type,1M,2Y,5Y,10Y,30Y
2026-01-28T10:00:00,USD_SOFR,0.0525,0.0420,0.0410,0.0420,0.0450
2026-01-28T10:00:05,USD_SOFR,0.0526,0.0421,,0.0421,0.0451
";

    #[test]
    fn test_replay_yields_ticks() {
        let ticks: Vec<_> = TickReplay::from_reader(SAMPLE.as_bytes(), 1.0)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(ticks.len(), 2);

        let (first_delay, first) = &ticks[0];
        assert_eq!(*first_delay, Duration::ZERO);
        assert_eq!(first.curve_date, "2026-01-28");
        assert_eq!(first.curve_type, "USD_SOFR");
        assert_eq!(first.rates["2Y"], 0.0420);
        assert_eq!(first.rates.len(), 5);

        // Blank 5Y cell dropped from the second row
        let (second_delay, second) = &ticks[1];
        assert_eq!(*second_delay, Duration::from_secs(5));
        assert!(!second.rates.contains_key("5Y"));
    }

    #[test]
    fn test_replay_speed_scales_delay() {
        let ticks: Vec<_> = TickReplay::from_reader(SAMPLE.as_bytes(), 10.0)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(ticks[1].0, Duration::from_millis(500));
    }

    #[test]
    fn test_bad_timestamp_rows_skipped() {
        let source = "\
timestamp,2Y
garbage,0.04
2026-01-28,0.042
";
        let ticks: Vec<_> = TickReplay::from_reader(source.as_bytes(), 1.0)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].1.curve_date, "2026-01-28");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2026-01-28T10:00:00").is_ok());
        assert!(parse_timestamp("2026-01-28 10:00:00").is_ok());
        assert!(parse_timestamp("2026-01-28").is_ok());

        let from_millis = parse_timestamp("1769558400000").unwrap();
        assert_eq!(from_millis.and_utc().timestamp_millis(), 1_769_558_400_000);

        assert!(parse_timestamp("soon").is_err());
    }

    #[test]
    fn test_sleep_capped_at_one_minute() {
        let prev = parse_timestamp("2026-01-28T10:00:00").unwrap();
        let current = parse_timestamp("2026-01-28T12:00:00").unwrap();

        assert_eq!(pacing(Some(prev), current, 1.0), MAX_SLEEP);
    }

    #[test]
    fn test_out_of_order_rows_do_not_sleep() {
        let prev = parse_timestamp("2026-01-28T10:00:05").unwrap();
        let current = parse_timestamp("2026-01-28T10:00:00").unwrap();

        assert_eq!(pacing(Some(prev), current, 1.0), Duration::ZERO);
    }

    #[test]
    fn test_message_shape() {
        let ticks: Vec<_> = TickReplay::from_reader(SAMPLE.as_bytes(), 1.0)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let json = serde_json::to_value(&ticks[0].1).unwrap();
        assert!(json.get("timestamp").unwrap().is_i64());
        assert_eq!(json["curve_type"], "USD_SOFR");
        assert_eq!(json["rates"]["30Y"], 0.0450);
    }
}
