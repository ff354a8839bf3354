//! Outbound ports.

pub mod transport;

pub use transport::{FrameChannel, FrameSink, FrameStream, FrameTransport};
