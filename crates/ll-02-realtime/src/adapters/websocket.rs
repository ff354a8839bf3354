//! WebSocket transport over tokio-tungstenite.

use crate::error::TransportError;
use crate::ports::transport::{FrameChannel, FrameSink, FrameTransport};
use async_trait::async_trait;
use futures::stream::{SplitSink, StreamExt};
use futures::SinkExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

type WsWrite = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Connects with `ws://` or `wss://` (native-tls).
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

impl WsTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FrameTransport for WsTransport {
    async fn connect(&self, endpoint: &str) -> Result<FrameChannel, TransportError> {
        let (ws_stream, _response) = connect_async(endpoint)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        debug!(endpoint = %endpoint, "WebSocket connected");

        let (write, read) = ws_stream.split();

        // Control frames are answered by tungstenite itself; only data
        // frames reach the session. A close frame ends the stream.
        let stream = futures::stream::unfold(read, |mut read| async move {
            loop {
                match read.next().await? {
                    Ok(Message::Text(text)) => return Some((Ok(text.as_bytes().to_vec()), read)),
                    Ok(Message::Binary(data)) => return Some((Ok(data.to_vec()), read)),
                    Ok(Message::Close(frame)) => {
                        debug!(?frame, "WebSocket closed by peer");
                        return None;
                    }
                    Ok(_) => continue,
                    Err(e) => return Some((Err(TransportError::Receive(e.to_string())), read)),
                }
            }
        })
        .boxed();

        let sink = Arc::new(WsSink {
            write: Mutex::new(write),
            closed: AtomicBool::new(false),
        });

        Ok(FrameChannel { sink, stream })
    }
}

struct WsSink {
    write: Mutex<WsWrite>,
    closed: AtomicBool,
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send(&self, text: String) -> Result<(), TransportError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TransportError::Closed);
        }
        self.write
            .lock()
            .await
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| match e {
                tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                    TransportError::Closed
                }
                other => TransportError::Send(other.to_string()),
            })
    }

    async fn close(&self) -> Result<(), TransportError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        match self.write.lock().await.close().await {
            Ok(())
            | Err(tungstenite::Error::ConnectionClosed)
            | Err(tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(e) => Err(TransportError::Send(e.to_string())),
        }
    }
}
