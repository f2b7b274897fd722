//! Worker configuration.

use crate::error::WorkerError;

/// Worker configuration, loaded from environment variables with
/// sensible local-development defaults.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Kafka bootstrap servers.
    pub bus_endpoint: String,
    /// Topic carrying curve ticks.
    pub bus_topic: String,
    /// Consumer group id for load balancing across workers.
    pub bus_group_id: String,
    /// Redis host.
    pub store_host: String,
    /// Redis port.
    pub store_port: u16,
    /// TTL for per-trade risk hashes, seconds.
    pub store_ttl: i64,
    /// Base URL of the reference-data service.
    pub ref_service_url: String,
    /// Log filter (e.g. "info", "debug").
    pub log_level: String,
    /// Worker identifier for log correlation.
    pub worker_id: String,
    /// Rate bump for sensitivities, decimal (0.0001 = 1 bp).
    pub bump_size: f64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            bus_endpoint: "localhost:9092".to_string(),
            bus_topic: "yield_curve_ticks".to_string(),
            bus_group_id: "risk-engine".to_string(),
            store_host: "localhost".to_string(),
            store_port: 6379,
            store_ttl: 3600,
            ref_service_url: "http://localhost:8000".to_string(),
            log_level: "info".to_string(),
            worker_id: "worker-1".to_string(),
            bump_size: 0.0001,
        }
    }
}

impl WorkerConfig {
    /// Builds the configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::Config`] when a numeric variable does not
    /// parse; missing variables fall back to defaults.
    pub fn from_env() -> Result<Self, WorkerError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Applies environment variable overrides.
    ///
    /// Supported variables: `BUS_ENDPOINT`, `BUS_TOPIC`, `BUS_GROUP_ID`,
    /// `STORE_HOST`, `STORE_PORT`, `STORE_TTL`, `REF_SERVICE_URL`,
    /// `LOG_LEVEL`, `WORKER_ID`, `BUMP_SIZE`.
    pub fn apply_env_overrides(&mut self) -> Result<(), WorkerError> {
        if let Ok(endpoint) = std::env::var("BUS_ENDPOINT") {
            self.bus_endpoint = endpoint;
        }
        if let Ok(topic) = std::env::var("BUS_TOPIC") {
            self.bus_topic = topic;
        }
        if let Ok(group) = std::env::var("BUS_GROUP_ID") {
            self.bus_group_id = group;
        }
        if let Ok(host) = std::env::var("STORE_HOST") {
            self.store_host = host;
        }
        if let Ok(port) = std::env::var("STORE_PORT") {
            self.store_port = port
                .parse()
                .map_err(|_| WorkerError::config(format!("invalid STORE_PORT: {port}")))?;
        }
        if let Ok(ttl) = std::env::var("STORE_TTL") {
            self.store_ttl = ttl
                .parse()
                .map_err(|_| WorkerError::config(format!("invalid STORE_TTL: {ttl}")))?;
        }
        if let Ok(url) = std::env::var("REF_SERVICE_URL") {
            self.ref_service_url = url;
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.log_level = level;
        }
        if let Ok(id) = std::env::var("WORKER_ID") {
            self.worker_id = id;
        }
        if let Ok(bump) = std::env::var("BUMP_SIZE") {
            self.bump_size = bump
                .parse()
                .map_err(|_| WorkerError::config(format!("invalid BUMP_SIZE: {bump}")))?;
        }

        Ok(())
    }

    /// Names of all supported environment variables.
    #[must_use]
    pub fn env_var_names() -> &'static [&'static str] {
        &[
            "BUS_ENDPOINT",
            "BUS_TOPIC",
            "BUS_GROUP_ID",
            "STORE_HOST",
            "STORE_PORT",
            "STORE_TTL",
            "REF_SERVICE_URL",
            "LOG_LEVEL",
            "WORKER_ID",
            "BUMP_SIZE",
        ]
    }
}
