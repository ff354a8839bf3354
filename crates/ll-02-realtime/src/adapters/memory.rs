//! In-process transport.
//!
//! [`MemoryTransport::pair`] returns the client side (handed to
//! [`ConnectionSession::with_transport`](crate::ConnectionSession::with_transport))
//! and a [`MemoryNode`] that plays the node: it pushes inbound frames and
//! observes the control messages the client sends.

use crate::error::TransportError;
use crate::ports::transport::{FrameChannel, FrameSink, FrameTransport};
use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};

type Inbound = Result<Vec<u8>, TransportError>;

#[derive(Debug, Default)]
struct LinkState {
    fail_sends: AtomicBool,
    hold_sends: AtomicBool,
    released: Notify,
    closed: AtomicBool,
}

impl LinkState {
    async fn wait_released(&self) {
        loop {
            let released = self.released.notified();
            tokio::pin!(released);
            released.as_mut().enable();
            if !self.hold_sends.load(Ordering::Acquire) {
                return;
            }
            released.await;
        }
    }
}

/// Client side of an in-process link. Connects once.
#[derive(Debug)]
pub struct MemoryTransport {
    pending: Mutex<Option<FrameChannel>>,
}

/// Node side of an in-process link.
#[derive(Debug)]
pub struct MemoryNode {
    inbound: Mutex<Option<mpsc::UnboundedSender<Inbound>>>,
    outbound: tokio::sync::Mutex<mpsc::UnboundedReceiver<String>>,
    link: Arc<LinkState>,
}

impl MemoryTransport {
    /// Create a connected client/node pair.
    pub fn pair() -> (MemoryTransport, MemoryNode) {
        let (inbound_tx, mut inbound_rx) = mpsc::unbounded_channel::<Inbound>();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let link = Arc::new(LinkState::default());

        let stream = futures::stream::poll_fn(move |cx| inbound_rx.poll_recv(cx)).boxed();
        let sink = Arc::new(MemorySink {
            outbound: outbound_tx,
            link: link.clone(),
        });

        let transport = MemoryTransport {
            pending: Mutex::new(Some(FrameChannel { sink, stream })),
        };
        let node = MemoryNode {
            inbound: Mutex::new(Some(inbound_tx)),
            outbound: tokio::sync::Mutex::new(outbound_rx),
            link,
        };
        (transport, node)
    }
}

#[async_trait]
impl FrameTransport for MemoryTransport {
    async fn connect(&self, _endpoint: &str) -> Result<FrameChannel, TransportError> {
        self.pending
            .lock()
            .take()
            .ok_or_else(|| TransportError::Connect("memory link already used".into()))
    }
}

impl MemoryNode {
    /// Deliver a raw text frame to the client.
    pub fn push_text(&self, text: impl Into<String>) {
        self.push(Ok(text.into().into_bytes()));
    }

    /// Deliver the session uid frame.
    pub fn push_uid(&self, uid: &str) {
        self.push_text(serde_json::json!({ "uid": uid }).to_string());
    }

    /// Deliver a notification on `channel` (wire text).
    pub fn push_notification(&self, channel: &str, data: serde_json::Value) {
        self.push_text(serde_json::json!({ "topic": channel, "data": data }).to_string());
    }

    /// Deliver a read failure; the client treats it as fatal.
    pub fn push_error(&self, reason: &str) {
        self.push(Err(TransportError::Receive(reason.to_string())));
    }

    /// End the inbound stream as a clean close from the node.
    pub fn disconnect(&self) {
        self.inbound.lock().take();
    }

    /// Make every following client send fail.
    pub fn fail_sends(&self, fail: bool) {
        self.link.fail_sends.store(fail, Ordering::Release);
    }

    /// Park every following client send until released with `false`.
    pub fn hold_sends(&self, hold: bool) {
        self.link.hold_sends.store(hold, Ordering::Release);
        if !hold {
            self.link.released.notify_waiters();
        }
    }

    /// Whether the client closed its side.
    pub fn is_closed(&self) -> bool {
        self.link.closed.load(Ordering::Acquire)
    }

    /// Wait for the next message sent by the client.
    pub async fn next_sent(&self) -> Option<String> {
        self.outbound.lock().await.recv().await
    }

    /// Messages sent by the client that have not been read yet.
    pub fn drain_sent(&self) -> Vec<String> {
        let Ok(mut outbound) = self.outbound.try_lock() else {
            return Vec::new();
        };
        let mut sent = Vec::new();
        while let Ok(text) = outbound.try_recv() {
            sent.push(text);
        }
        sent
    }

    fn push(&self, item: Inbound) {
        if let Some(tx) = self.inbound.lock().as_ref() {
            let _ = tx.send(item);
        }
    }
}

struct MemorySink {
    outbound: mpsc::UnboundedSender<String>,
    link: Arc<LinkState>,
}

#[async_trait]
impl FrameSink for MemorySink {
    async fn send(&self, text: String) -> Result<(), TransportError> {
        self.link.wait_released().await;
        if self.link.closed.load(Ordering::Acquire) {
            return Err(TransportError::Closed);
        }
        if self.link.fail_sends.load(Ordering::Acquire) {
            return Err(TransportError::Send("injected send failure".into()));
        }
        self.outbound
            .send(text)
            .map_err(|_| TransportError::Closed)
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.link.closed.store(true, Ordering::Release);
        Ok(())
    }
}
