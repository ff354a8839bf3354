//! Announce client configuration.

use serde::{Deserialize, Serialize};
use shared_types::ConfigError;
use std::time::Duration;

/// Environment variable overriding [`AnnounceConfig::rest_url`].
pub const ENV_REST_URL: &str = "LL_REST_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnounceConfig {
    /// Node REST base URL
    pub rest_url: String,
    /// Whole-request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for AnnounceConfig {
    fn default() -> Self {
        Self {
            rest_url: "http://localhost:3000".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl AnnounceConfig {
    pub fn with_rest_url(rest_url: impl Into<String>) -> Self {
        Self {
            rest_url: rest_url.into(),
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = url::Url::parse(&self.rest_url)
            .map_err(|e| ConfigError::invalid("announce.rest_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid(
                "announce.rest_url",
                format!("scheme must be http or https, got {}", url.scheme()),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::invalid(
                "announce.request_timeout",
                "cannot be 0",
            ));
        }
        Ok(())
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rest_url) = lookup(ENV_REST_URL) {
            self.rest_url = rest_url;
        }
    }

    /// `PUT` target for announcements.
    pub(crate) fn transaction_url(&self) -> Result<url::Url, ConfigError> {
        let base = self.rest_url.trim_end_matches('/');
        url::Url::parse(&format!("{}/transaction", base))
            .map_err(|e| ConfigError::invalid("announce.rest_url", e.to_string()))
    }
}
