//! # Address Codec
//!
//! Entry points for deriving and checking addresses. The free functions
//! take the network explicitly; [`AddressCodec`] binds one network for
//! callers that work against a single environment.

use crate::domain::address::Address;
use crate::domain::hashing::account_digest;
use crate::domain::public_key::normalize_public_key;
use crate::error::AddressError;
use shared_types::{NetworkType, PublicKey};

/// Derive the address of a hex-encoded public key on `network`.
pub fn encode(public_key_hex: &str, network: NetworkType) -> Result<Address, AddressError> {
    let key = normalize_public_key(public_key_hex)?;
    Ok(encode_bytes(&key, network))
}

/// Derive the address of a raw public key on `network`.
pub fn encode_bytes(public_key: &PublicKey, network: NetworkType) -> Address {
    Address::from_digest(network, &account_digest(public_key))
}

/// Decode address text into its validated value.
///
/// Encoding is one-way: the result carries the network and account
/// digest, never the public key.
pub fn decode(text: &str) -> Result<Address, AddressError> {
    Address::from_text(text)
}

/// Check that address text decodes and its checksum matches.
pub fn validate(text: &str) -> Result<(), AddressError> {
    decode(text).map(|_| ())
}

/// Codec bound to one network.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressCodec {
    network: NetworkType,
}

impl AddressCodec {
    /// Create a codec for `network`.
    pub const fn new(network: NetworkType) -> Self {
        Self { network }
    }

    /// Network this codec encodes for.
    pub const fn network(&self) -> NetworkType {
        self.network
    }

    /// Derive the address of a hex-encoded public key.
    pub fn encode(&self, public_key_hex: &str) -> Result<Address, AddressError> {
        encode(public_key_hex, self.network)
    }

    /// Derive the address of a raw public key.
    pub fn encode_bytes(&self, public_key: &PublicKey) -> Address {
        encode_bytes(public_key, self.network)
    }

    /// Decode text and require it to belong to this codec's network.
    pub fn decode(&self, text: &str) -> Result<Address, AddressError> {
        let address = decode(text)?;
        if address.network() != self.network {
            return Err(AddressError::InvalidAddress(format!(
                "address belongs to {}, expected {}",
                address.network(),
                self.network
            )));
        }
        Ok(address)
    }
}
