//! Transport adapters.
//!
//! - [`websocket`]: tokio-tungstenite client for real nodes.
//! - [`memory`]: in-process channel pair for tests and embedding.

pub mod memory;
pub mod websocket;

pub use memory::{MemoryNode, MemoryTransport};
pub use websocket::WsTransport;
