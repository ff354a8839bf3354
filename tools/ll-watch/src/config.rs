//! Client configuration file.
//!
//! ```toml
//! network = "TEST_NET"
//!
//! [realtime]
//! endpoint = "ws://localhost:3000/ws"
//! queue_capacity = 1024
//! handshake_timeout = "10s"
//!
//! [announce]
//! rest_url = "http://localhost:3000"
//! request_timeout = "10s"
//! ```

use ll_02_realtime::RealtimeConfig;
use ll_03_announce::AnnounceConfig;
use serde::{Deserialize, Serialize};
use shared_types::{ConfigError, NetworkType};
use std::path::Path;

/// Environment variable overriding [`ClientConfig::network`].
pub const ENV_NETWORK: &str = "LL_NETWORK";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Network addresses are derived for
    pub network: NetworkType,
    /// Notification session
    pub realtime: RealtimeConfig,
    /// Transaction announcement
    pub announce: AnnounceConfig,
}

impl ClientConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `LL_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(network) = lookup(ENV_NETWORK) {
            self.network = network
                .parse()
                .map_err(|e| ConfigError::invalid("network", format!("{}", e)))?;
        }
        self.realtime.apply_env_with(&lookup)?;
        self.announce.apply_env_with(&lookup);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.realtime.validate()?;
        self.announce.validate()
    }
}
