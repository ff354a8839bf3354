//! # Connection Session
//!
//! One physical connection to a node, its negotiated uid and the read loop
//! that routes inbound notifications into subscription queues.
//!
//! ## Lifecycle
//!
//! 1. Connect through a [`FrameTransport`].
//! 2. Wait (bounded by `handshake_timeout`) for the node's `{"uid": ..}`.
//! 3. Spawn the read loop. It runs until the node closes the connection,
//!    a read fails, or [`ConnectionSession::close`] is called.
//! 4. On any of those, the registry is terminated: every subscription is
//!    cancelled and its readers observe the terminal reason, then the
//!    transport is closed.
//!
//! Decode failures on individual frames are logged and counted; they never
//! end the session.

use crate::adapters::websocket::WsTransport;
use crate::config::RealtimeConfig;
use crate::domain::frame::{ControlMessage, InboundFrame};
use crate::domain::topic::{Channel, Topic};
use crate::error::RealtimeError;
use crate::metrics::{MetricsSnapshot, SessionMetrics};
use crate::ports::transport::{FrameSink, FrameStream, FrameTransport};
use crate::registry::{Subscription, SubscriptionRegistry};
use futures::StreamExt;
use ll_01_address::Address;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Shared state between the session handle, the read loop and
/// subscription handles.
#[derive(Debug)]
pub(crate) struct SessionInner {
    uid: String,
    endpoint: String,
    sink: Arc<dyn FrameSink>,
    registry: SubscriptionRegistry,
    metrics: Arc<SessionMetrics>,
    max_frame_size: usize,
    /// Held from a registry change until the node has been told about it,
    /// so control messages reach the node in registry order.
    control: tokio::sync::Mutex<()>,
}

impl SessionInner {
    async fn send_control(&self, message: ControlMessage) -> Result<(), RealtimeError> {
        self.sink.send(message.to_json()).await?;
        self.metrics.record_control_sent();
        Ok(())
    }

    async fn subscribe(self: &Arc<Self>, channel: Channel) -> Result<Subscription, RealtimeError> {
        let _control = self.control.lock().await;
        let entry = self.registry.register(channel)?;

        if let Err(e) = self
            .send_control(ControlMessage::subscribe(&self.uid, &channel))
            .await
        {
            self.registry.remove(entry.id);
            warn!(channel = %channel, error = %e, "Subscribe message failed");
            return Err(e);
        }

        debug!(subscription_id = %entry.id, channel = %channel, "Subscribed");
        Ok(Subscription::new(entry, Arc::downgrade(self)))
    }

    pub(crate) async fn unsubscribe(&self, subscription: &Subscription) -> Result<(), RealtimeError> {
        let _control = self.control.lock().await;
        let Some((entry, last)) = self.registry.remove(subscription.id()) else {
            return Ok(());
        };

        // Siblings on the same channel still need the node to keep publishing.
        if last {
            if let Err(e) = self
                .send_control(ControlMessage::unsubscribe(&self.uid, &entry.channel))
                .await
            {
                warn!(channel = %entry.channel, error = %e, "Unsubscribe message failed");
                self.registry.restore(entry);
                return Err(e);
            }
        }

        entry.queue.close_unsubscribed();
        debug!(subscription_id = %entry.id, channel = %entry.channel, "Unsubscribed");
        Ok(())
    }

    fn handle_frame(&self, bytes: &[u8]) {
        self.metrics.record_received();

        match InboundFrame::decode(bytes, self.max_frame_size) {
            Ok(InboundFrame::Notification {
                channel,
                notification,
            }) => {
                let delivered = self.registry.route(&channel, notification);
                debug!(channel = %channel, delivered, "Routed notification");
            }
            Ok(InboundFrame::Control { uid }) => {
                if uid != self.uid {
                    warn!(current = %self.uid, announced = %uid, "Node announced a different uid, ignoring");
                }
            }
            Err(e) => {
                self.metrics.record_decode_error();
                warn!(error = %e, size = bytes.len(), "Dropping undecodable frame");
            }
        }
    }

    fn terminate(&self, reason: &str) -> bool {
        let first = self.registry.terminate(reason);
        if first {
            warn!(uid = %self.uid, endpoint = %self.endpoint, reason = %reason, "Session terminated");
        }
        first
    }
}

async fn read_loop(inner: Arc<SessionInner>, mut stream: FrameStream) {
    let reason = loop {
        match stream.next().await {
            Some(Ok(bytes)) => inner.handle_frame(&bytes),
            Some(Err(e)) => break e.to_string(),
            None => break "connection closed by node".to_string(),
        }
    };
    inner.terminate(&reason);

    if let Err(e) = inner.sink.close().await {
        debug!(error = %e, "Transport close after termination failed");
    }
}

/// A live notification session with one node.
#[derive(Debug)]
pub struct ConnectionSession {
    inner: Arc<SessionInner>,
    reader: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl ConnectionSession {
    /// Connect over WebSocket to `config.endpoint`.
    pub async fn open(config: &RealtimeConfig) -> Result<Self, RealtimeError> {
        Self::with_transport(&WsTransport::new(), config).await
    }

    /// Connect through any transport.
    pub async fn with_transport(
        transport: &dyn FrameTransport,
        config: &RealtimeConfig,
    ) -> Result<Self, RealtimeError> {
        config.validate()?;

        let channel = transport.connect(&config.endpoint).await?;
        let sink = channel.sink;
        let mut stream = channel.stream;

        let uid = match Self::handshake(&mut stream, config).await {
            Ok(uid) => uid,
            Err(e) => {
                if let Err(close_err) = sink.close().await {
                    debug!(error = %close_err, "Transport close after failed handshake failed");
                }
                return Err(e);
            }
        };

        let metrics = Arc::new(SessionMetrics::new());
        let inner = Arc::new(SessionInner {
            uid,
            endpoint: config.endpoint.clone(),
            sink,
            registry: SubscriptionRegistry::new(config.queue_capacity, metrics.clone()),
            metrics,
            max_frame_size: config.max_frame_size,
            control: tokio::sync::Mutex::new(()),
        });

        let reader = tokio::spawn(read_loop(inner.clone(), stream));

        info!(uid = %inner.uid, endpoint = %inner.endpoint, "Session opened");

        Ok(Self {
            inner,
            reader: Mutex::new(Some(reader)),
            closed: AtomicBool::new(false),
        })
    }

    async fn handshake(
        stream: &mut FrameStream,
        config: &RealtimeConfig,
    ) -> Result<String, RealtimeError> {
        let first = tokio::time::timeout(config.handshake_timeout, stream.next())
            .await
            .map_err(|_| {
                RealtimeError::Handshake(format!(
                    "no uid frame within {:?}",
                    config.handshake_timeout
                ))
            })?;

        let bytes = match first {
            Some(Ok(bytes)) => bytes,
            Some(Err(e)) => return Err(e.into()),
            None => {
                return Err(RealtimeError::Handshake(
                    "connection closed before uid frame".into(),
                ))
            }
        };

        match InboundFrame::decode(&bytes, config.max_frame_size) {
            Ok(InboundFrame::Control { uid }) => Ok(uid),
            Ok(InboundFrame::Notification { channel, .. }) => Err(RealtimeError::Handshake(format!(
                "expected uid frame, got notification on {}",
                channel
            ))),
            Err(e) => Err(RealtimeError::Handshake(format!("invalid first frame: {}", e))),
        }
    }

    /// Session id negotiated with the node.
    pub fn uid(&self) -> &str {
        &self.inner.uid
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    pub fn is_terminated(&self) -> bool {
        self.inner.registry.terminated_reason().is_some()
    }

    /// Why the session ended, if it has.
    pub fn termination_reason(&self) -> Option<String> {
        self.inner.registry.terminated_reason()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    /// Live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.inner.registry.len()
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.inner.registry
    }

    /// Subscribe to `channel`.
    ///
    /// The subscription is routable before the node is told about it, so
    /// no notification published after the node accepts it is missed.
    pub async fn subscribe(&self, channel: Channel) -> Result<Subscription, RealtimeError> {
        self.inner.subscribe(channel).await
    }

    /// Cancel `subscription`. Idempotent.
    pub async fn unsubscribe(&self, subscription: &Subscription) -> Result<(), RealtimeError> {
        self.inner.unsubscribe(subscription).await
    }

    async fn subscribe_address(
        &self,
        topic: Topic,
        address: &Address,
    ) -> Result<Subscription, RealtimeError> {
        self.subscribe(Channel::qualified(topic, *address)?).await
    }

    /// Transactions entering the unconfirmed pool for `address`.
    pub async fn unconfirmed_added(&self, address: &Address) -> Result<Subscription, RealtimeError> {
        self.subscribe_address(Topic::UnconfirmedAdded, address).await
    }

    /// Transactions leaving the unconfirmed pool for `address`.
    pub async fn unconfirmed_removed(
        &self,
        address: &Address,
    ) -> Result<Subscription, RealtimeError> {
        self.subscribe_address(Topic::UnconfirmedRemoved, address).await
    }

    /// Transactions confirmed for `address`.
    pub async fn confirmed_added(&self, address: &Address) -> Result<Subscription, RealtimeError> {
        self.subscribe_address(Topic::ConfirmedAdded, address).await
    }

    /// Rejections of transactions signed by `address`.
    pub async fn status(&self, address: &Address) -> Result<Subscription, RealtimeError> {
        self.subscribe_address(Topic::Status, address).await
    }

    pub async fn partial_added(&self, address: &Address) -> Result<Subscription, RealtimeError> {
        self.subscribe_address(Topic::PartialAdded, address).await
    }

    pub async fn partial_removed(&self, address: &Address) -> Result<Subscription, RealtimeError> {
        self.subscribe_address(Topic::PartialRemoved, address).await
    }

    pub async fn cosignature(&self, address: &Address) -> Result<Subscription, RealtimeError> {
        self.subscribe_address(Topic::Cosignature, address).await
    }

    /// New blocks.
    pub async fn block(&self) -> Result<Subscription, RealtimeError> {
        self.subscribe(Channel::block()).await
    }

    /// Close the connection and cancel every subscription. Idempotent.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.inner.terminate("session closed");

        if let Some(reader) = self.reader.lock().take() {
            reader.abort();
        }
        if let Err(e) = self.inner.sink.close().await {
            debug!(error = %e, "Transport close failed");
        }
        info!(uid = %self.inner.uid, "Session closed");
    }
}

impl Drop for ConnectionSession {
    fn drop(&mut self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.inner.terminate("session dropped");
            if let Some(reader) = self.reader.lock().take() {
                reader.abort();
            }
        }
    }
}
