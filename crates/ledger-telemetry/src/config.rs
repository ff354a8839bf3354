//! Telemetry configuration from environment variables.

use std::env;

/// Environment variable holding the log filter.
pub const ENV_LOG_LEVEL: &str = "LL_LOG_LEVEL";

/// Environment variable switching to JSON output.
pub const ENV_JSON_LOGS: &str = "LL_JSON_LOGS";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to the startup log line
    pub service_name: String,

    /// `EnvFilter` directive (trace, debug, info, warn, error, or per-target)
    pub log_level: String,

    /// Whether to emit JSON lines instead of human-readable output
    pub json_logs: bool,

    /// Whether to include the event target (module path)
    pub with_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "ledger-link".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_target: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `LL_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `LL_JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`TelemetryConfig::from_env`] over an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            service_name: defaults.service_name,
            log_level: lookup(ENV_LOG_LEVEL)
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
            json_logs: lookup(ENV_JSON_LOGS)
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.json_logs),
            with_target: defaults.with_target,
        }
    }

    /// Override the service name.
    pub fn for_service(mut self, service_name: &str) -> Self {
        self.service_name = service_name.to_string();
        self
    }
}
