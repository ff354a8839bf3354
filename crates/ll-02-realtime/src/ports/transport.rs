//! Frame transport port.
//!
//! The session only needs two things from a connection: a way to send
//! text frames, and a stream of inbound frame bytes that ends when the
//! connection does.

use crate::error::TransportError;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt;
use std::sync::Arc;

/// Inbound frames. `None` means the peer closed cleanly; an `Err` is an
/// unrecoverable read failure.
pub type FrameStream = BoxStream<'static, Result<Vec<u8>, TransportError>>;

/// Outbound half of a connection.
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// Send one text frame.
    async fn send(&self, text: String) -> Result<(), TransportError>;

    /// Close the connection. Must tolerate repeated calls.
    async fn close(&self) -> Result<(), TransportError>;
}

impl fmt::Debug for dyn FrameSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FrameSink")
    }
}

/// An open connection split into its two halves.
pub struct FrameChannel {
    pub sink: Arc<dyn FrameSink>,
    pub stream: FrameStream,
}

impl fmt::Debug for FrameChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameChannel")
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

/// Opens connections to a node endpoint.
#[async_trait]
pub trait FrameTransport: Send + Sync {
    async fn connect(&self, endpoint: &str) -> Result<FrameChannel, TransportError>;
}
