//! Stream coordinator: drives the pipeline for each bus message.
//!
//! Control loop per message: decode (malformed payloads are committed
//! and dropped), apply the tick to the curve, publish the curve
//! snapshot, price and publish every instrument, then commit the offset
//! synchronously. Every fifth tick the coordinator recomputes portfolio
//! aggregates by scanning the store. A tick-level failure skips the
//! commit so the bus redelivers it; publication therefore completes
//! before the commit and the store sees at-least-once delivery over
//! idempotent writes.

use std::time::Instant;

use rdkafka::message::BorrowedMessage;
use rdkafka::Message;
use tokio::signal;
use tracing::{error, info, warn};

use strata_curves::CurveError;
use strata_instruments::Instrument;
use strata_risk::{aggregate_portfolio, PortfolioAggregate, RiskCalculator};

use crate::consumer::BusConsumer;
use crate::error::WorkerError;
use crate::store::RiskStore;
use crate::tick::CurveTick;

/// Recompute portfolio aggregates every N committed ticks.
const AGGREGATE_EVERY: u64 = 5;

/// Outcome of one bus message.
enum Handled {
    /// Tick fully processed and published; commit it.
    Processed(usize),
    /// Poison pill; commit it so it is never redelivered.
    Malformed,
    /// Tick-level failure; do not commit, the bus will redeliver.
    Failed(WorkerError),
}

/// Owns the consumer, the store, the calculator, and the portfolio, and
/// runs the synchronous processing loop.
pub struct Coordinator {
    consumer: BusConsumer,
    store: RiskStore,
    calculator: RiskCalculator,
    portfolio: Vec<Instrument>,
}

impl Coordinator {
    /// Wires the pipeline stages together.
    pub fn new(
        consumer: BusConsumer,
        store: RiskStore,
        calculator: RiskCalculator,
        portfolio: Vec<Instrument>,
    ) -> Self {
        Self {
            consumer,
            store,
            calculator,
            portfolio,
        }
    }

    /// Runs until shutdown is requested or the bus fails.
    ///
    /// Shutdown is cooperative: SIGINT/SIGTERM stop the loop between
    /// messages, after the in-flight message has published and
    /// committed.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Bus`] on non-transient consumer failures.
    pub async fn run(&mut self) -> Result<(), WorkerError> {
        let started = Instant::now();
        let mut tick_count = 0u64;

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        info!(
            instruments = self.portfolio.len(),
            "Starting market data consumption"
        );

        loop {
            // Aggregation runs after the message borrow is released
            let mut aggregate_due: Option<usize> = None;

            tokio::select! {
                biased;

                () = &mut shutdown => {
                    info!("Shutdown requested, stopping");
                    break;
                }

                received = self.consumer.recv() => {
                    let message = received?;
                    let outcome = Self::handle_message(
                        &mut self.calculator,
                        &mut self.store,
                        &self.portfolio,
                        &message,
                    )
                    .await;

                    match outcome {
                        Handled::Malformed => {
                            self.consumer.commit(&message)?;
                        }
                        Handled::Processed(processed) => {
                            self.consumer.commit(&message)?;

                            tick_count += 1;
                            if tick_count % AGGREGATE_EVERY == 0 {
                                aggregate_due = Some(processed);
                            }
                        }
                        Handled::Failed(e) => {
                            error!(error = %e, "Tick failed; offset not committed");
                        }
                    }
                }
            }

            if let Some(processed) = aggregate_due {
                match self.publish_aggregates().await {
                    Ok(aggregate) => {
                        let elapsed = started.elapsed().as_secs_f64();
                        let rate = if elapsed > 0.0 {
                            tick_count as f64 / elapsed
                        } else {
                            0.0
                        };
                        info!(
                            ticks = tick_count,
                            per_sec = format_args!("{rate:.1}"),
                            instruments = processed,
                            portfolio_dv01 = format_args!("{:.0}", aggregate.total_dv01),
                            "Processed update"
                        );
                    }
                    Err(e) => {
                        warn!(error = %e, "Aggregation pass failed");
                    }
                }
            }
        }

        Ok(())
    }

    /// Decodes and processes one message.
    async fn handle_message(
        calculator: &mut RiskCalculator,
        store: &mut RiskStore,
        portfolio: &[Instrument],
        message: &BorrowedMessage<'_>,
    ) -> Handled {
        let Some(payload) = message.payload() else {
            warn!("Empty message payload, dropping");
            return Handled::Malformed;
        };

        let tick = match CurveTick::decode(payload) {
            Ok(tick) => tick,
            Err(e) => {
                warn!(error = %e, "Failed to parse message, dropping");
                return Handled::Malformed;
            }
        };

        let curve_date = match tick.parse_curve_date() {
            Ok(date) => date,
            Err(e) => {
                warn!(error = %e, "Invalid curve date, dropping");
                return Handled::Malformed;
            }
        };

        match Self::process_tick(calculator, store, portfolio, &tick, curve_date).await {
            Ok(processed) => Handled::Processed(processed),
            Err(e) => Handled::Failed(e),
        }
    }

    /// Runs the four pipeline stages for one well-formed tick.
    async fn process_tick(
        calculator: &mut RiskCalculator,
        store: &mut RiskStore,
        portfolio: &[Instrument],
        tick: &CurveTick,
        curve_date: strata_core::Date,
    ) -> Result<usize, WorkerError> {
        calculator
            .curves_mut()
            .update_rates(tick.tenor_rates(), curve_date)?;

        store
            .write_yield_curve(&tick.numeric_rates(), tick.timestamp)
            .await?;

        let mut processed = 0usize;
        for instrument in portfolio {
            let metrics = match calculator.calculate(instrument) {
                Ok(metrics) => metrics,
                Err(e) if e.is_tick_fatal() => {
                    return Err(WorkerError::Curve(CurveError::NotBuilt));
                }
                Err(e) => {
                    error!(
                        instrument_id = instrument.id(),
                        kind = instrument.kind(),
                        error = %e,
                        "Failed to calculate risk, skipping instrument"
                    );
                    continue;
                }
            };

            store.write_risk(&metrics, tick.timestamp).await?;
            processed += 1;
        }

        Ok(processed)
    }

    /// Scans the store, republishes portfolio aggregates, and samples
    /// the totals into the dashboard history sets.
    async fn publish_aggregates(&mut self) -> Result<PortfolioAggregate, WorkerError> {
        let records = self.store.get_all_trade_risks().await?;
        let aggregate = aggregate_portfolio(&records, chrono::Utc::now().timestamp_millis());
        self.store.write_portfolio_aggregates(&aggregate).await?;
        self.store
            .snapshot_history(aggregate.total_dv01, aggregate.total_npv)
            .await?;
        Ok(aggregate)
    }
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
