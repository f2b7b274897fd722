//! Kafka producer for curve ticks.

use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::generator::CurveTick;

/// Delivery wait budget per message.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Publishes curve ticks, keyed by curve type for partitioning.
pub struct FeedProducer {
    inner: FutureProducer,
    topic: String,
}

impl FeedProducer {
    /// Creates the producer.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Bus`] when the producer cannot be created.
    pub fn connect(endpoint: &str, topic: &str) -> Result<Self, FeedError> {
        let inner: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", endpoint)
            .set("client.id", "strata-feed")
            .set("acks", "all")
            .set("message.send.max.retries", "3")
            .set("retry.backoff.ms", "100")
            .set("linger.ms", "5")
            .create()?;

        info!(endpoint, topic, "Producer initialized");

        Ok(Self {
            inner,
            topic: topic.to_string(),
        })
    }

    /// Publishes one tick and awaits its delivery report.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Encode`] for serialization failures and
    /// [`FeedError::Bus`] when delivery fails.
    pub async fn publish(&self, tick: &CurveTick) -> Result<(), FeedError> {
        let payload = serde_json::to_string(tick)?;
        let record = FutureRecord::to(&self.topic)
            .key(&tick.curve_type)
            .payload(&payload);

        match self.inner.send(record, SEND_TIMEOUT).await {
            Ok((partition, offset)) => {
                debug!(partition, offset, curve_date = %tick.curve_date, "Delivered tick");
                Ok(())
            }
            Err((e, _)) => Err(e.into()),
        }
    }

    /// Flushes buffered messages before shutdown.
    pub fn close(&self) {
        info!("Flushing producer");
        if let Err(e) = self.inner.flush(SEND_TIMEOUT) {
            warn!(error = %e, "Producer flush incomplete");
        }
    }
}
