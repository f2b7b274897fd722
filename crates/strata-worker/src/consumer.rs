//! Kafka consumer for curve ticks.

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::BorrowedMessage;
use tracing::info;

use crate::config::WorkerConfig;
use crate::error::WorkerError;

/// Bus consumer with manual offset commits.
///
/// Offsets are committed synchronously only after a tick's results are
/// fully published, so a crash redelivers the in-flight tick
/// (at-least-once; the store writes are idempotent overwrites).
pub struct BusConsumer {
    inner: StreamConsumer,
}

impl BusConsumer {
    /// Connects and subscribes to the tick topic.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Bus`] if the consumer cannot be created
    /// or the subscription fails.
    pub fn connect(config: &WorkerConfig) -> Result<Self, WorkerError> {
        let inner: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.bus_endpoint)
            .set("group.id", &config.bus_group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "latest")
            .set("session.timeout.ms", "30000")
            .set("max.poll.interval.ms", "300000")
            .create()?;

        inner.subscribe(&[&config.bus_topic])?;

        info!(
            endpoint = %config.bus_endpoint,
            topic = %config.bus_topic,
            group = %config.bus_group_id,
            "Consumer initialized"
        );

        Ok(Self { inner })
    }

    /// Awaits the next message from the bus.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Bus`] on non-transient consumer failures;
    /// the worker exits and supervision restarts it.
    pub async fn recv(&self) -> Result<BorrowedMessage<'_>, WorkerError> {
        Ok(self.inner.recv().await?)
    }

    /// Synchronously commits the offset of a processed message.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Bus`] if the commit fails.
    pub fn commit(&self, message: &BorrowedMessage<'_>) -> Result<(), WorkerError> {
        self.inner.commit_message(message, CommitMode::Sync)?;
        Ok(())
    }
}
