//! # Announcer
//!
//! Submits a signed transaction to a node. Acceptance means the node
//! queued the transaction for validation, not that it was confirmed; the
//! outcome arrives later as a `confirmedAdded` or `status` notification
//! carrying the same hash.
//!
//! No retries: a failed announce is reported to the caller as is.

use crate::config::AnnounceConfig;
use crate::error::AnnounceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared_types::{SignedTransaction, TransactionHash};
use tracing::{info, warn};

/// Node acknowledgement of an announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnounceReceipt {
    /// Message returned by the node
    pub message: String,
    /// Hash of the announced transaction, for correlation
    pub hash: TransactionHash,
    /// HTTP status of the response
    pub status_code: u16,
}

/// Transaction submission port.
#[async_trait]
pub trait Announcer: Send + Sync {
    async fn announce(&self, tx: &SignedTransaction) -> Result<AnnounceReceipt, AnnounceError>;
}

#[derive(Debug, Serialize)]
struct AnnounceRequest {
    payload: String,
}

#[derive(Debug, Deserialize)]
struct AcceptedBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RejectedBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Map a node response onto the announce result.
pub(crate) fn interpret_response(
    status: u16,
    body: &str,
    hash: TransactionHash,
) -> Result<AnnounceReceipt, AnnounceError> {
    if (200..300).contains(&status) {
        let accepted: AcceptedBody = if body.trim().is_empty() {
            AcceptedBody {
                message: String::new(),
            }
        } else {
            serde_json::from_str(body).map_err(|e| {
                AnnounceError::Connection(format!("undecodable HTTP {} response: {}", status, e))
            })?
        };
        return Ok(AnnounceReceipt {
            message: accepted.message,
            hash,
            status_code: status,
        });
    }

    match serde_json::from_str::<RejectedBody>(body) {
        Ok(rejected) => Err(AnnounceError::Rejected {
            status,
            code: rejected.code,
            message: rejected.message,
        }),
        Err(e) => Err(AnnounceError::Connection(format!(
            "undecodable HTTP {} response: {}",
            status, e
        ))),
    }
}

/// [`Announcer`] over the node REST API: `PUT {rest_url}/transaction`.
#[derive(Debug, Clone)]
pub struct HttpAnnouncer {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl HttpAnnouncer {
    pub fn new(config: &AnnounceConfig) -> Result<Self, AnnounceError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.transaction_url()?,
        })
    }

    /// Full announce URL.
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

#[async_trait]
impl Announcer for HttpAnnouncer {
    async fn announce(&self, tx: &SignedTransaction) -> Result<AnnounceReceipt, AnnounceError> {
        let request = AnnounceRequest {
            payload: tx.payload_hex(),
        };

        let response = self
            .client
            .put(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let result = interpret_response(status, &body, tx.hash);
        match &result {
            Ok(receipt) => info!(
                hash = %tx.hash,
                status = receipt.status_code,
                message = %receipt.message,
                "Transaction announced"
            ),
            Err(e) => warn!(hash = %tx.hash, error = %e, "Announce failed"),
        }
        result
    }
}
