//! Real-time session configuration with validation.

use serde::{Deserialize, Serialize};
use shared_types::ConfigError;
use std::time::Duration;

/// Environment variable overriding [`RealtimeConfig::endpoint`].
pub const ENV_WS_URL: &str = "LL_WS_URL";

/// Environment variable overriding [`RealtimeConfig::queue_capacity`].
pub const ENV_QUEUE_CAPACITY: &str = "LL_QUEUE_CAPACITY";

/// Settings for one notification session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// Node websocket endpoint (`ws://` or `wss://`)
    pub endpoint: String,
    /// Per-subscription delivery queue capacity (default: 1024)
    pub queue_capacity: usize,
    /// How long to wait for the node's uid frame
    #[serde(with = "humantime_serde")]
    pub handshake_timeout: Duration,
    /// Largest inbound frame accepted, in bytes (default: 1 MiB)
    pub max_frame_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://localhost:3000/ws".to_string(),
            queue_capacity: 1024,
            handshake_timeout: Duration::from_secs(10),
            max_frame_size: 1024 * 1024,
        }
    }
}

impl RealtimeConfig {
    /// Config pointing at `endpoint` with default limits.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::invalid("realtime.endpoint", e.to_string()))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ConfigError::invalid(
                "realtime.endpoint",
                format!("scheme must be ws or wss, got {}", url.scheme()),
            ));
        }

        if self.queue_capacity == 0 {
            return Err(ConfigError::invalid(
                "realtime.queue_capacity",
                "cannot be 0",
            ));
        }

        if self.handshake_timeout.is_zero() {
            return Err(ConfigError::invalid(
                "realtime.handshake_timeout",
                "cannot be 0",
            ));
        }

        if self.max_frame_size == 0 {
            return Err(ConfigError::invalid(
                "realtime.max_frame_size",
                "cannot be 0",
            ));
        }

        Ok(())
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_WS_URL) {
            self.endpoint = endpoint;
        }
        if let Some(capacity) = lookup(ENV_QUEUE_CAPACITY) {
            self.queue_capacity = capacity.trim().parse().map_err(|_| {
                ConfigError::invalid(
                    "realtime.queue_capacity",
                    format!("{} is not a number: {}", ENV_QUEUE_CAPACITY, capacity),
                )
            })?;
        }
        Ok(())
    }
}
