//! # Topics and Channels
//!
//! A topic names a notification category; a channel is a topic plus its
//! optional address qualifier. The channel's wire text (`topic/ADDRESS` or
//! bare `topic`) is what subscribe/unsubscribe control messages carry and
//! what inbound notification frames are tagged with.

use crate::error::DecodeError;
use ll_01_address::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Notification categories offered by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Topic {
    /// Transaction entered the unconfirmed pool.
    UnconfirmedAdded,
    /// Transaction left the unconfirmed pool.
    UnconfirmedRemoved,
    /// Transaction was included in a block.
    ConfirmedAdded,
    /// Transaction was rejected; carries the error status.
    Status,
    /// A new block was harvested. Global, never qualified.
    Block,
    /// Aggregate transaction awaiting cosignatures was added.
    PartialAdded,
    /// Aggregate transaction awaiting cosignatures was removed.
    PartialRemoved,
    /// A cosignature was added to a partial transaction.
    Cosignature,
}

impl Topic {
    /// Every known topic.
    pub const ALL: [Topic; 8] = [
        Topic::UnconfirmedAdded,
        Topic::UnconfirmedRemoved,
        Topic::ConfirmedAdded,
        Topic::Status,
        Topic::Block,
        Topic::PartialAdded,
        Topic::PartialRemoved,
        Topic::Cosignature,
    ];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Topic::UnconfirmedAdded => "unconfirmedAdded",
            Topic::UnconfirmedRemoved => "unconfirmedRemoved",
            Topic::ConfirmedAdded => "confirmedAdded",
            Topic::Status => "status",
            Topic::Block => "block",
            Topic::PartialAdded => "partialAdded",
            Topic::PartialRemoved => "partialRemoved",
            Topic::Cosignature => "cosignature",
        }
    }

    /// Whether subscriptions to this topic must name an address.
    #[must_use]
    pub const fn requires_qualifier(self) -> bool {
        !matches!(self, Topic::Block)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DecodeError::UnknownTopic(s.to_string()))
    }
}

/// A topic scoped to an optional address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
    topic: Topic,
    qualifier: Option<Address>,
}

impl Channel {
    /// Channel for an address-scoped topic.
    ///
    /// Fails when the topic is global ([`Topic::Block`]).
    pub fn qualified(topic: Topic, address: Address) -> Result<Self, DecodeError> {
        if !topic.requires_qualifier() {
            return Err(DecodeError::UnexpectedQualifier(topic));
        }
        Ok(Self {
            topic,
            qualifier: Some(address),
        })
    }

    /// Channel for a global topic.
    ///
    /// Fails when the topic needs an address.
    pub fn global(topic: Topic) -> Result<Self, DecodeError> {
        if topic.requires_qualifier() {
            return Err(DecodeError::MissingQualifier(topic));
        }
        Ok(Self {
            topic,
            qualifier: None,
        })
    }

    /// The new-block channel.
    #[must_use]
    pub const fn block() -> Self {
        Self {
            topic: Topic::Block,
            qualifier: None,
        }
    }

    /// Topic of this channel.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        self.topic
    }

    /// Address qualifier, if any.
    #[must_use]
    pub const fn qualifier(&self) -> Option<&Address> {
        self.qualifier.as_ref()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(address) => write!(f, "{}/{}", self.topic, address),
            None => write!(f, "{}", self.topic),
        }
    }
}

impl FromStr for Channel {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((topic, qualifier)) => {
                let topic: Topic = topic.parse()?;
                let address: Address = qualifier
                    .parse()
                    .map_err(|e| DecodeError::InvalidQualifier(format!("{}", e)))?;
                Channel::qualified(topic, address)
            }
            None => Channel::global(s.parse()?),
        }
    }
}
