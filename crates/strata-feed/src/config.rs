//! Feed configuration.

use crate::error::FeedError;

/// Feed configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Kafka bootstrap servers.
    pub bus_endpoint: String,
    /// Topic to publish curve ticks on.
    pub bus_topic: String,
    /// Path to the CSV file with historical curves.
    pub data_file: String,
    /// Replay speed multiplier (1.0 = real time).
    pub replay_speed: f64,
    /// Restart from the beginning when the file ends.
    pub loop_forever: bool,
    /// Log filter.
    pub log_level: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            bus_endpoint: "localhost:9092".to_string(),
            bus_topic: "yield_curve_ticks".to_string(),
            data_file: "data/yield_curves.csv".to_string(),
            replay_speed: 1.0,
            loop_forever: true,
            log_level: "info".to_string(),
        }
    }
}

impl FeedConfig {
    /// Builds the configuration from the environment.
    ///
    /// Supported variables: `BUS_ENDPOINT`, `BUS_TOPIC`, `DATA_FILE`,
    /// `REPLAY_SPEED`, `LOOP_FOREVER`, `LOG_LEVEL`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] when a numeric or boolean variable
    /// does not parse.
    pub fn from_env() -> Result<Self, FeedError> {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("BUS_ENDPOINT") {
            config.bus_endpoint = endpoint;
        }
        if let Ok(topic) = std::env::var("BUS_TOPIC") {
            config.bus_topic = topic;
        }
        if let Ok(file) = std::env::var("DATA_FILE") {
            config.data_file = file;
        }
        if let Ok(speed) = std::env::var("REPLAY_SPEED") {
            config.replay_speed = speed
                .parse()
                .map_err(|_| FeedError::config(format!("invalid REPLAY_SPEED: {speed}")))?;
        }
        if let Ok(flag) = std::env::var("LOOP_FOREVER") {
            config.loop_forever = match flag.to_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => {
                    return Err(FeedError::config(format!("invalid LOOP_FOREVER: {other}")))
                }
            };
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }
}
