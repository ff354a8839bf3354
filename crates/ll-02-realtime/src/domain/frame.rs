//! Wire frames.
//!
//! Inbound: `{"uid": ..}` once at session start, then
//! `{"topic": "<channel>", "data": {..}}` notifications.
//! Outbound: `{"uid": .., "subscribe" | "unsubscribe": "<channel>"}`.

use crate::domain::notification::Notification;
use crate::domain::topic::Channel;
use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// Session uid announcement.
    Control { uid: String },
    /// Notification published on a channel.
    Notification {
        channel: Channel,
        notification: Notification,
    },
}

#[derive(Debug, Deserialize)]
struct RawFrame {
    uid: Option<String>,
    topic: Option<String>,
    data: Option<Value>,
}

impl InboundFrame {
    /// Decode one frame, rejecting anything larger than `max_size` bytes.
    pub fn decode(bytes: &[u8], max_size: usize) -> Result<Self, DecodeError> {
        if bytes.len() > max_size {
            return Err(DecodeError::Oversize {
                size: bytes.len(),
                limit: max_size,
            });
        }

        let raw: RawFrame =
            serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;

        match raw {
            RawFrame {
                topic: Some(topic),
                data: Some(data),
                ..
            } => {
                let channel: Channel = topic.parse()?;
                let notification = Notification::decode(channel.topic(), data)?;
                Ok(InboundFrame::Notification {
                    channel,
                    notification,
                })
            }
            RawFrame { uid: Some(uid), .. } if !uid.is_empty() => Ok(InboundFrame::Control { uid }),
            _ => Err(DecodeError::UnrecognizedFrame),
        }
    }
}

/// Outbound subscription control message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlMessage {
    uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    subscribe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unsubscribe: Option<String>,
}

impl ControlMessage {
    pub fn subscribe(uid: &str, channel: &Channel) -> Self {
        Self {
            uid: uid.to_string(),
            subscribe: Some(channel.to_string()),
            unsubscribe: None,
        }
    }

    pub fn unsubscribe(uid: &str, channel: &Channel) -> Self {
        Self {
            uid: uid.to_string(),
            subscribe: None,
            unsubscribe: Some(channel.to_string()),
        }
    }

    /// JSON text for the transport.
    pub fn to_json(&self) -> String {
        // Only string fields: serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
