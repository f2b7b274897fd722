//! Market data feed entry point.
//!
//! Replays a CSV of historical curve snapshots onto the bus at a
//! configurable speed, optionally looping forever. Shutdown is
//! cooperative: a signal sets a flag checked before each message.

mod config;
mod error;
mod generator;
mod producer;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::FeedConfig;
use crate::generator::TickReplay;
use crate::producer::FeedProducer;

#[tokio::main]
async fn main() {
    std::process::exit(run().await);
}

async fn run() -> i32 {
    let config = match FeedConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return 1;
        }
    };

    init_tracing(&config.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        bus = %config.bus_endpoint,
        topic = %config.bus_topic,
        data_file = %config.data_file,
        replay_speed = config.replay_speed,
        loop_forever = config.loop_forever,
        "Market data feed starting"
    );

    if !std::path::Path::new(&config.data_file).exists() {
        error!(data_file = %config.data_file, "Data file not found");
        return 1;
    }

    let producer = match FeedProducer::connect(&config.bus_endpoint, &config.bus_topic) {
        Ok(producer) => producer,
        Err(e) => {
            error!(error = %e, "Failed to create producer");
            return 1;
        }
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    tokio::spawn({
        let shutdown = Arc::clone(&shutdown);
        async move {
            shutdown_signal().await;
            info!("Shutdown requested");
            shutdown.store(true, Ordering::SeqCst);
        }
    });

    let mut published = 0u64;
    let mut iteration = 0u64;

    'replay: loop {
        iteration += 1;
        info!(iteration, "Starting data replay");

        let replay = match TickReplay::open(&config.data_file, config.replay_speed) {
            Ok(replay) => replay,
            Err(e) => {
                error!(error = %e, "Cannot open data file");
                producer.close();
                return e.exit_code();
            }
        };

        for item in replay {
            if shutdown.load(Ordering::SeqCst) {
                break 'replay;
            }

            let (delay, tick) = match item {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable row");
                    continue;
                }
            };

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            if let Err(e) = producer.publish(&tick).await {
                error!(error = %e, "Failed to publish tick");
                producer.close();
                return e.exit_code();
            }

            published += 1;
            if published % 10 == 0 {
                info!(
                    published,
                    curve_type = %tick.curve_type,
                    curve_date = %tick.curve_date,
                    "Published messages"
                );
            }
        }

        if !config.loop_forever || shutdown.load(Ordering::SeqCst) {
            break;
        }

        info!("Restarting replay from beginning");
        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    }

    producer.close();
    info!(published, "Market data feed stopped");
    0
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable, watching SIGINT only");
                let _ = signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = signal::ctrl_c().await;
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
