//! Error types for the real-time session.

use crate::domain::topic::Topic;
use shared_types::ConfigError;
use thiserror::Error;

/// Errors returned by session and registry operations.
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// Transport could not be opened, or a control message could not be sent.
    #[error("connection error: {0}")]
    Connection(String),

    /// The node did not announce a session uid as its first frame.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// The session has been closed or lost its connection.
    #[error("session terminated: {reason}")]
    SessionTerminated { reason: String },

    /// Topic and qualifier do not form a valid channel.
    #[error("invalid channel: {0}")]
    InvalidChannel(#[from] DecodeError),

    /// Invalid client configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<TransportError> for RealtimeError {
    fn from(err: TransportError) -> Self {
        RealtimeError::Connection(err.to_string())
    }
}

/// Outcome of reading from a subscription that will never yield again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecvError {
    /// The session ended. Returned once per subscription.
    #[error("session terminated: {reason}")]
    SessionTerminated { reason: String },

    /// The subscription was cancelled and its queue is drained.
    #[error("subscription cancelled")]
    Unsubscribed,

    /// The terminal signal has already been consumed.
    #[error("subscription closed")]
    Closed,
}

/// Inbound frame decode failures. Logged and counted, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("frame is neither a uid nor a notification")]
    UnrecognizedFrame,

    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    #[error("topic {0} requires an address qualifier")]
    MissingQualifier(Topic),

    #[error("topic {0} does not take a qualifier")]
    UnexpectedQualifier(Topic),

    #[error("invalid qualifier: {0}")]
    InvalidQualifier(String),

    #[error("invalid {topic} payload: {reason}")]
    InvalidPayload { topic: Topic, reason: String },

    #[error("frame of {size} bytes exceeds limit of {limit}")]
    Oversize { size: usize, limit: usize },
}

/// Failures reported by a frame transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("send failed: {0}")]
    Send(String),

    #[error("receive failed: {0}")]
    Receive(String),

    #[error("transport closed")]
    Closed,
}
