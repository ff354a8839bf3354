//! # Error Types
//!
//! Parse errors for the shared envelope types.

use thiserror::Error;

/// Errors produced while parsing shared types from text or bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// Byte does not name one of the known networks.
    #[error("Unknown network identifier: 0x{0:02x}")]
    UnknownNetwork(u8),

    /// Text does not name one of the known networks.
    #[error("Unknown network name: {0}")]
    UnknownNetworkName(String),

    /// Input is not valid hexadecimal.
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded value has the wrong length.
    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },
}

impl From<hex::FromHexError> for TypeError {
    fn from(e: hex::FromHexError) -> Self {
        TypeError::InvalidHex(e.to_string())
    }
}

/// Configuration loading and validation errors, shared by every crate that
/// owns a config section.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for the expected shape.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A field holds a value the client cannot run with.
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted field path
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::Invalid`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
