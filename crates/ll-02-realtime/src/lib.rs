//! # Real-Time Notification Session
//!
//! Multiplexes many independent notification subscriptions over one
//! connection to a ledger node.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  subscribe/unsubscribe   ┌──────────────────────┐
//! │   caller     │ ───────────────────────▶ │  ConnectionSession   │
//! │              │                          │  (uid, sink)         │
//! │ Subscription │ ◀── DeliveryQueue ────── │  SubscriptionRegistry│
//! └──────────────┘                          └──────────▲───────────┘
//!                                                      │ route
//!                                           ┌──────────┴───────────┐
//!                                           │  read loop (1 task)  │
//!                                           │  FrameStream         │
//!                                           └──────────────────────┘
//! ```
//!
//! - **Ports**: [`FrameTransport`], [`FrameSink`], [`FrameStream`]
//! - **Adapters**: [`WsTransport`] (tokio-tungstenite), [`MemoryTransport`]
//!
//! ## Delivery Guarantees
//!
//! - FIFO per subscription, in connection order.
//! - Every subscription on a channel gets its own copy (multicast).
//! - A full queue drops its oldest item; the router never blocks.
//! - Unsubscribe stops routing immediately. Items queued before it remain
//!   readable, then reads fail with [`RecvError::Unsubscribed`].
//! - Session end discards queued items; each subscription reports
//!   [`RecvError::SessionTerminated`] exactly once, then
//!   [`RecvError::Closed`].
//!
//! ## Usage
//!
//! ```ignore
//! let session = ConnectionSession::open(&RealtimeConfig::default()).await?;
//! let confirmed = session.confirmed_added(&address).await?;
//! while let Ok(notification) = confirmed.recv().await {
//!     println!("{:?}", notification);
//! }
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod registry;
pub mod session;

pub use adapters::{MemoryNode, MemoryTransport, WsTransport};
pub use config::RealtimeConfig;
pub use domain::{
    BlockInfo, Channel, CosignatureInfo, DeliveryQueue, InboundFrame, Notification, Topic,
    TransactionInfo, TransactionStatus,
};
pub use error::{DecodeError, RealtimeError, RecvError, TransportError};
pub use metrics::{MetricsSnapshot, SessionMetrics};
pub use ports::{FrameChannel, FrameSink, FrameStream, FrameTransport};
pub use registry::{Subscription, SubscriptionId, SubscriptionRegistry};
pub use session::ConnectionSession;
pub use shared_types::ConfigError;
