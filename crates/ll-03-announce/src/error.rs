//! Announce errors.

use shared_types::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnounceError {
    /// Request could not be sent, timed out, or the response could not be
    /// understood.
    #[error("connection error: {0}")]
    Connection(String),

    /// The node answered with a non-success status.
    #[error("rejected with HTTP {status}: {code}: {message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AnnounceError {
    /// Whether the node itself refused the transaction.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AnnounceError::Rejected { .. })
    }
}

impl From<reqwest::Error> for AnnounceError {
    fn from(err: reqwest::Error) -> Self {
        AnnounceError::Connection(err.to_string())
    }
}
