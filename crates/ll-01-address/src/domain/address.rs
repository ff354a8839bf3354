//! # Address Value
//!
//! An address is the 25-byte payload `network ‖ digest ‖ checksum`. It is
//! constructed by the codec (or by validating text or raw bytes) and is
//! read-only afterwards.

use crate::domain::hashing::{checksum, ACCOUNT_DIGEST_SIZE};
use crate::error::AddressError;
use data_encoding::BASE32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shared_types::NetworkType;
use std::fmt;
use std::str::FromStr;

/// Size of the checksum suffix in bytes.
pub const CHECKSUM_SIZE: usize = 4;

/// Size of the raw address payload in bytes.
pub const ADDRESS_DECODED_SIZE: usize = 1 + ACCOUNT_DIGEST_SIZE + CHECKSUM_SIZE;

/// Length of the base32 text form.
pub const ADDRESS_ENCODED_SIZE: usize = 40;

/// Characters per group in the pretty form.
const PRETTY_GROUP: usize = 6;

/// A validated, network-specific account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    network: NetworkType,
    raw: [u8; ADDRESS_DECODED_SIZE],
}

impl Address {
    /// Build an address from a network and account digest, computing the
    /// checksum.
    pub fn from_digest(network: NetworkType, digest: &[u8; ACCOUNT_DIGEST_SIZE]) -> Self {
        let mut raw = [0u8; ADDRESS_DECODED_SIZE];
        raw[0] = network.as_byte();
        raw[1..=ACCOUNT_DIGEST_SIZE].copy_from_slice(digest);
        let sum = checksum(&raw[..=ACCOUNT_DIGEST_SIZE]);
        raw[ACCOUNT_DIGEST_SIZE + 1..].copy_from_slice(&sum);
        Self { network, raw }
    }

    /// Validate a raw 25-byte payload.
    pub fn from_raw(raw: [u8; ADDRESS_DECODED_SIZE]) -> Result<Self, AddressError> {
        let network =
            NetworkType::from_byte(raw[0]).map_err(|_| AddressError::UnknownNetwork(raw[0]))?;

        let expected = checksum(&raw[..=ACCOUNT_DIGEST_SIZE]);
        let found = &raw[ACCOUNT_DIGEST_SIZE + 1..];
        if found != expected.as_slice() {
            return Err(AddressError::ChecksumMismatch {
                expected: hex::encode(expected),
                found: hex::encode(found),
            });
        }

        Ok(Self { network, raw })
    }

    /// Decode and validate text. Accepts lowercase and the dash-separated
    /// pretty form.
    pub fn from_text(text: &str) -> Result<Self, AddressError> {
        let plain: String = text
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .flat_map(char::to_uppercase)
            .collect();

        if plain.len() != ADDRESS_ENCODED_SIZE {
            return Err(AddressError::InvalidAddress(format!(
                "expected {} characters, got {}",
                ADDRESS_ENCODED_SIZE,
                plain.len()
            )));
        }

        let decoded = BASE32
            .decode(plain.as_bytes())
            .map_err(|e| AddressError::InvalidAddress(format!("invalid base32: {}", e)))?;

        let raw = <[u8; ADDRESS_DECODED_SIZE]>::try_from(decoded.as_slice()).map_err(|_| {
            AddressError::InvalidAddress(format!(
                "expected {} decoded bytes, got {}",
                ADDRESS_DECODED_SIZE,
                decoded.len()
            ))
        })?;

        Self::from_raw(raw)
    }

    /// Network this address belongs to.
    #[must_use]
    pub const fn network(&self) -> NetworkType {
        self.network
    }

    /// The 20-byte account digest.
    #[must_use]
    pub fn digest(&self) -> [u8; ACCOUNT_DIGEST_SIZE] {
        let mut digest = [0u8; ACCOUNT_DIGEST_SIZE];
        digest.copy_from_slice(&self.raw[1..=ACCOUNT_DIGEST_SIZE]);
        digest
    }

    /// The trailing checksum.
    #[must_use]
    pub fn checksum(&self) -> [u8; CHECKSUM_SIZE] {
        let mut sum = [0u8; CHECKSUM_SIZE];
        sum.copy_from_slice(&self.raw[ACCOUNT_DIGEST_SIZE + 1..]);
        sum
    }

    /// The full 25-byte payload.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_DECODED_SIZE] {
        &self.raw
    }

    /// Canonical 40-character text.
    #[must_use]
    pub fn plain(&self) -> String {
        BASE32.encode(&self.raw)
    }

    /// Text split into dash-separated groups of six characters.
    #[must_use]
    pub fn pretty(&self) -> String {
        let plain = self.plain();
        plain
            .as_bytes()
            .chunks(PRETTY_GROUP)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Address")
            .field("network", &self.network)
            .field("text", &self.plain())
            .finish()
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.plain())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_text(&text).map_err(serde::de::Error::custom)
    }
}
