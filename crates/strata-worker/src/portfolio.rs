//! Portfolio loading from the reference-data service.

use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

use strata_core::daycounts::DayCountConvention;
use strata_core::{Date, Frequency, PayReceive};
use strata_instruments::{Bond, Instrument, Swap};

use crate::error::WorkerError;

/// Server-side page size cap.
const PAGE_SIZE: u32 = 100;

/// One page of the instrument listing.
#[derive(Debug, Deserialize)]
struct InstrumentPage {
    items: Vec<serde_json::Value>,
    pages: u32,
    total: u64,
}

/// Bond payload as served by the reference service.
#[derive(Debug, Deserialize)]
struct BondPayload {
    id: String,
    isin: String,
    #[serde(deserialize_with = "lenient_f64")]
    notional: f64,
    #[serde(deserialize_with = "lenient_f64")]
    coupon_rate: f64,
    maturity_date: Date,
    #[serde(default, deserialize_with = "lenient_date")]
    issue_date: Option<Date>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    payment_frequency: Option<Frequency>,
    #[serde(default)]
    day_count_convention: Option<DayCountConvention>,
}

/// Swap payload as served by the reference service.
#[derive(Debug, Deserialize)]
struct SwapPayload {
    id: String,
    #[serde(deserialize_with = "lenient_f64")]
    notional: f64,
    #[serde(deserialize_with = "lenient_f64")]
    fixed_rate: f64,
    tenor: String,
    trade_date: Date,
    maturity_date: Date,
    #[serde(default, deserialize_with = "lenient_date")]
    effective_date: Option<Date>,
    pay_receive: PayReceive,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    float_index: Option<String>,
    #[serde(default)]
    payment_frequency: Option<Frequency>,
}

/// Accepts a number or a numeric string (the service serializes its
/// decimal columns as strings).
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("number out of range")),
        serde_json::Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("not a number: {s}"))),
        other => Err(serde::de::Error::custom(format!(
            "expected number, got {other}"
        ))),
    }
}

/// Accepts a date string, an empty string, or null.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => Date::parse(s)
            .map(Some)
            .map_err(|e| serde::de::Error::custom(e.to_string())),
    }
}

impl From<BondPayload> for Bond {
    fn from(payload: BondPayload) -> Self {
        Bond {
            id: payload.id,
            isin: payload.isin,
            notional: payload.notional,
            currency: payload.currency.unwrap_or_else(|| "USD".to_string()),
            coupon_rate: payload.coupon_rate,
            maturity_date: payload.maturity_date,
            issue_date: payload.issue_date,
            payment_frequency: payload.payment_frequency.unwrap_or(Frequency::SemiAnnual),
            day_count: payload
                .day_count_convention
                .unwrap_or(DayCountConvention::ActActIsda),
        }
    }
}

impl From<SwapPayload> for Swap {
    fn from(payload: SwapPayload) -> Self {
        Swap {
            id: payload.id,
            notional: payload.notional,
            currency: payload.currency.unwrap_or_else(|| "USD".to_string()),
            fixed_rate: payload.fixed_rate,
            tenor_label: payload.tenor,
            trade_date: payload.trade_date,
            maturity_date: payload.maturity_date,
            effective_date: payload.effective_date,
            pay_receive: payload.pay_receive,
            float_index: payload.float_index.unwrap_or_else(|| "SOFR".to_string()),
            payment_frequency: payload.payment_frequency.unwrap_or(Frequency::Quarterly),
        }
    }
}

/// Parses one listing item into an instrument.
fn parse_item(item: &serde_json::Value) -> Result<Instrument, WorkerError> {
    match item.get("instrument_type").and_then(|v| v.as_str()) {
        Some("BOND") => serde_json::from_value::<BondPayload>(item.clone())
            .map(|p| Instrument::Bond(p.into()))
            .map_err(|e| WorkerError::parse(e.to_string())),
        Some("SWAP") => serde_json::from_value::<SwapPayload>(item.clone())
            .map(|p| Instrument::Swap(p.into()))
            .map_err(|e| WorkerError::parse(e.to_string())),
        other => Err(WorkerError::parse(format!(
            "unknown instrument_type: {other:?}"
        ))),
    }
}

/// Loads the complete instrument universe from the reference service.
///
/// Pages through the listing endpoint; items that fail schema validation
/// are dropped with a warning. The loader never aborts on a single bad
/// record.
///
/// # Errors
///
/// Returns [`WorkerError::Upstream`] when the service is unreachable or
/// answers non-2xx.
pub async fn load_portfolio(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<Vec<Instrument>, WorkerError> {
    let mut instruments = Vec::new();
    let mut page = 1u32;

    loop {
        let url = format!("{base_url}/api/v1/instruments?page={page}&page_size={PAGE_SIZE}");
        let response = client.get(&url).send().await?.error_for_status()?;
        let data: InstrumentPage = response.json().await?;

        if page == 1 {
            info!(total = data.total, "Total instruments in reference service");
        }

        if data.items.is_empty() {
            break;
        }

        for item in &data.items {
            match parse_item(item) {
                Ok(instrument) => instruments.push(instrument),
                Err(e) => {
                    let id = item.get("id").and_then(|v| v.as_str()).unwrap_or("?");
                    warn!(id, error = %e, "Dropping instrument that failed validation");
                }
            }
        }

        info!(
            page,
            pages = data.pages,
            loaded = instruments.len(),
            total = data.total,
            "Loading portfolio page"
        );

        if page >= data.pages {
            break;
        }
        page += 1;
    }

    let bonds = instruments
        .iter()
        .filter(|i| matches!(i, Instrument::Bond(_)))
        .count();
    info!(
        instruments = instruments.len(),
        bonds,
        swaps = instruments.len() - bonds,
        "Portfolio loaded"
    );

    Ok(instruments)
}
