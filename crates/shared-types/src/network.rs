//! # Network Identifiers
//!
//! Each ledger environment is identified by a single byte. The byte is the
//! first byte of every address, so it also fixes the address's leading
//! base32 character.

use crate::errors::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known ledger networks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkType {
    /// Private test network (addresses start with `S`).
    #[default]
    MijinTest,
    /// Private network (addresses start with `M`).
    Mijin,
    /// Public test network (addresses start with `T`).
    TestNet,
    /// Public main network (addresses start with `N`).
    MainNet,
}

impl NetworkType {
    /// All known networks, in identifier order of the original deployments.
    pub const ALL: [NetworkType; 4] = [
        NetworkType::MijinTest,
        NetworkType::Mijin,
        NetworkType::TestNet,
        NetworkType::MainNet,
    ];

    /// The identifier byte embedded in addresses.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            NetworkType::MijinTest => 0x90,
            NetworkType::Mijin => 0x60,
            NetworkType::TestNet => 0x98,
            NetworkType::MainNet => 0x68,
        }
    }

    /// Look up a network by its identifier byte.
    pub fn from_byte(byte: u8) -> Result<Self, TypeError> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_byte() == byte)
            .ok_or(TypeError::UnknownNetwork(byte))
    }

    /// Canonical configuration name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            NetworkType::MijinTest => "MIJIN_TEST",
            NetworkType::Mijin => "MIJIN",
            NetworkType::TestNet => "TEST_NET",
            NetworkType::MainNet => "MAIN_NET",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for NetworkType {
    type Error = TypeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte)
    }
}

impl From<NetworkType> for u8 {
    fn from(network: NetworkType) -> Self {
        network.as_byte()
    }
}

/// Accepts the canonical name in any case, with or without separators
/// (`MIJIN_TEST`, `mijin-test`, `mijinTest`), or the decimal identifier byte.
impl FromStr for NetworkType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(byte) = trimmed.parse::<u8>() {
            return Self::from_byte(byte);
        }

        let folded: String = trimmed
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "mijintest" => Ok(NetworkType::MijinTest),
            "mijin" => Ok(NetworkType::Mijin),
            "testnet" => Ok(NetworkType::TestNet),
            "mainnet" => Ok(NetworkType::MainNet),
            _ => Err(TypeError::UnknownNetworkName(trimmed.to_string())),
        }
    }
}
