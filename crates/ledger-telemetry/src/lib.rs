//! # Ledger Telemetry
//!
//! Structured logging for Ledger-Link binaries: a `tracing-subscriber`
//! registry with an `EnvFilter` and either a human-readable or a JSON
//! formatting layer. Libraries in the workspace only emit `tracing`
//! events; binaries call [`init_logging`] once at startup.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_logging, TelemetryConfig};
//!
//! init_logging(&TelemetryConfig::from_env().for_service("ll-watch"))?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LL_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `LL_JSON_LOGS` | `false` | Emit JSON lines |

mod config;
mod tracing_setup;

pub use config::{TelemetryConfig, ENV_JSON_LOGS, ENV_LOG_LEVEL};
pub use tracing_setup::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Global subscriber already set: {0}")]
    AlreadyInitialized(String),
}
