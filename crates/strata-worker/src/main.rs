//! Risk worker entry point.
//!
//! Startup order matters: configuration, then the portfolio load from
//! the reference service, then store and bus connections, and only then
//! the processing loop. A zero-instrument portfolio aborts before the
//! consumer joins its group.

mod config;
mod consumer;
mod coordinator;
mod error;
mod portfolio;
mod store;
mod tick;

use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use strata_curves::CurveBook;
use strata_risk::RiskCalculator;

use crate::config::WorkerConfig;
use crate::consumer::BusConsumer;
use crate::coordinator::Coordinator;
use crate::store::RiskStore;

#[tokio::main]
async fn main() {
    std::process::exit(run().await);
}

async fn run() -> i32 {
    let config = match WorkerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return 1;
        }
    };

    init_tracing(&config.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        worker_id = %config.worker_id,
        "Risk worker starting"
    );
    info!(
        bus = %config.bus_endpoint,
        topic = %config.bus_topic,
        group = %config.bus_group_id,
        store = format_args!("{}:{}", config.store_host, config.store_port),
        ref_service = %config.ref_service_url,
        "Configuration loaded"
    );

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return 1;
        }
    };

    info!("Loading portfolio from reference service");
    let portfolio = match portfolio::load_portfolio(&client, &config.ref_service_url).await {
        Ok(portfolio) => portfolio,
        Err(e) => {
            error!(error = %e, "Failed to load portfolio");
            return e.exit_code();
        }
    };

    if portfolio.is_empty() {
        error!("No instruments loaded, exiting");
        return 1;
    }

    let store = match RiskStore::connect(&config.store_host, config.store_port, config.store_ttl)
        .await
    {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Failed to connect to store");
            return 1;
        }
    };

    let consumer = match BusConsumer::connect(&config) {
        Ok(consumer) => consumer,
        Err(e) => {
            error!(error = %e, "Failed to create bus consumer");
            return 1;
        }
    };

    let calculator = RiskCalculator::new(CurveBook::new()).with_bump_size(config.bump_size);
    let mut coordinator = Coordinator::new(consumer, store, calculator, portfolio);

    match coordinator.run().await {
        Ok(()) => {
            info!("Risk worker stopped");
            0
        }
        Err(e) => {
            error!(error = %e, "Fatal runtime error");
            e.exit_code()
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(log_level.to_lowercase())
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
