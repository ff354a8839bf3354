//! # Mock Node (REST)
//!
//! Serves `PUT /transaction` and answers with a configurable reply.
//! Received payloads are recorded for assertions.

use axum::{extract::State, http::StatusCode, routing::put, Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// How the node answers an announcement.
#[derive(Debug, Clone)]
pub enum RestReply {
    /// 202 with a `message` body.
    Accept,
    /// Error status with a `{code, message}` body.
    Reject {
        status: u16,
        code: String,
        message: String,
    },
    /// Any status with an arbitrary body.
    Raw { status: u16, body: String },
}

#[derive(Debug)]
struct RestState {
    reply: Mutex<RestReply>,
    payloads: Mutex<Vec<Value>>,
}

/// REST node on an ephemeral local port.
pub struct MockRest {
    addr: SocketAddr,
    state: Arc<RestState>,
    server: JoinHandle<()>,
}

impl MockRest {
    pub async fn start(reply: RestReply) -> Self {
        let state = Arc::new(RestState {
            reply: Mutex::new(reply),
            payloads: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/transaction", put(announce_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock rest");
        let addr = listener.local_addr().expect("mock rest address");
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Base URL for [`ll_03_announce::AnnounceConfig`].
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_reply(&self, reply: RestReply) {
        *self.state.reply.lock() = reply;
    }

    /// Request bodies received so far.
    pub fn received(&self) -> Vec<Value> {
        self.state.payloads.lock().clone()
    }
}

impl Drop for MockRest {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn announce_handler(
    State(state): State<Arc<RestState>>,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.payloads.lock().push(body);

    let reply = state.reply.lock().clone();
    match reply {
        RestReply::Accept => (
            StatusCode::ACCEPTED,
            json!({ "message": "packet 9 was pushed to the network via /transaction" }).to_string(),
        ),
        RestReply::Reject {
            status,
            code,
            message,
        } => (
            status_code(status),
            json!({ "code": code, "message": message }).to_string(),
        ),
        RestReply::Raw { status, body } => (status_code(status), body),
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
