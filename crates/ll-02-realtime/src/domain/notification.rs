//! # Notification Payloads
//!
//! Each topic carries one payload shape. Payloads are decoded once, at the
//! router boundary, into [`Notification`]; subscribers never see raw JSON
//! except for the unknown transaction fields kept in
//! [`TransactionInfo::extra`].

use crate::domain::topic::Topic;
use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared_types::{BlockHeight, PublicKey, TransactionHash};

/// A transaction observed by the node.
///
/// Sent on `unconfirmedAdded`, `confirmedAdded` and `partialAdded`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub hash: TransactionHash,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer: Option<PublicKey>,
    /// Inclusion height; absent while unconfirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<BlockHeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<u64>,
    /// Transaction-type specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Rejection of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatus {
    pub hash: TransactionHash,
    /// Node error code, e.g. `Failure_Core_Insufficient_Balance`.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<u64>,
}

/// A newly harvested block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInfo {
    pub height: BlockHeight,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<TransactionHash>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer: Option<PublicKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_transactions: Option<u32>,
}

/// A cosignature added to a partial transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosignatureInfo {
    pub parent_hash: TransactionHash,
    pub signer: PublicKey,
    /// Hex signature; 64 bytes on current networks.
    pub signature: String,
}

#[derive(Debug, Deserialize)]
struct RemovedPayload {
    hash: TransactionHash,
}

/// Decoded payload of a notification frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// `unconfirmedAdded`, `confirmedAdded`, `partialAdded`
    Transaction(TransactionInfo),
    /// `unconfirmedRemoved`, `partialRemoved`
    TransactionRemoved(TransactionHash),
    /// `status`
    Status(TransactionStatus),
    /// `block`
    Block(BlockInfo),
    /// `cosignature`
    Cosignature(CosignatureInfo),
}

impl Notification {
    /// Decode the `data` object of a frame published on `topic`.
    pub fn decode(topic: Topic, data: Value) -> Result<Self, DecodeError> {
        let invalid = |e: serde_json::Error| DecodeError::InvalidPayload {
            topic,
            reason: e.to_string(),
        };

        let notification = match topic {
            Topic::UnconfirmedAdded | Topic::ConfirmedAdded | Topic::PartialAdded => {
                Notification::Transaction(serde_json::from_value(data).map_err(invalid)?)
            }
            Topic::UnconfirmedRemoved | Topic::PartialRemoved => {
                let removed: RemovedPayload = serde_json::from_value(data).map_err(invalid)?;
                Notification::TransactionRemoved(removed.hash)
            }
            Topic::Status => Notification::Status(serde_json::from_value(data).map_err(invalid)?),
            Topic::Block => Notification::Block(serde_json::from_value(data).map_err(invalid)?),
            Topic::Cosignature => {
                Notification::Cosignature(serde_json::from_value(data).map_err(invalid)?)
            }
        };
        Ok(notification)
    }

    /// Hash of the transaction this notification is about, if any.
    ///
    /// Used to correlate an announcement with its outcome. For
    /// cosignatures this is the parent transaction.
    #[must_use]
    pub fn transaction_hash(&self) -> Option<&TransactionHash> {
        match self {
            Notification::Transaction(tx) => Some(&tx.hash),
            Notification::TransactionRemoved(hash) => Some(hash),
            Notification::Status(status) => Some(&status.hash),
            Notification::Cosignature(cosig) => Some(&cosig.parent_hash),
            Notification::Block(_) => None,
        }
    }
}
