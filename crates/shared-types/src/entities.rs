//! # Core Domain Entities
//!
//! Fixed-size byte values that travel between the codec, the real-time
//! session and the announcer, plus the signed transaction envelope.
//!
//! Hex text is the canonical external form for every value here: parsing
//! is case-insensitive, display is uppercase.

use crate::errors::TypeError;
use crate::network::NetworkType;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Size of a transaction hash in bytes.
pub const HASH_SIZE: usize = 32;

/// Size of a raw public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Block height in the chain.
pub type BlockHeight = u64;

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], TypeError> {
    let bytes = hex::decode(s.trim())?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| TypeError::InvalidLength {
        expected: N,
        actual: bytes.len(),
    })
}

macro_rules! hex_newtype {
    ($name:ident, $size:expr) => {
        impl $name {
            /// Raw bytes.
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }

            /// Parse from hex text (case-insensitive).
            pub fn from_hex(s: &str) -> Result<Self, TypeError> {
                decode_fixed::<$size>(s).map(Self)
            }

            /// Uppercase hex text.
            #[must_use]
            pub fn to_hex(&self) -> String {
                hex::encode_upper(self.0)
            }
        }

        impl From<[u8; $size]> for $name {
            fn from(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                Self::from_hex(&text).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// A 32-byte transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TransactionHash(pub [u8; HASH_SIZE]);

hex_newtype!(TransactionHash, HASH_SIZE);

/// A 32-byte raw public key.
///
/// Length-prefix normalisation of user input lives in the address codec;
/// this type only ever holds the raw key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_SIZE]);

hex_newtype!(PublicKey, PUBLIC_KEY_SIZE);

/// A transaction that has already been serialized and signed.
///
/// Produced by an external signer; the announcer only forwards `payload`.
/// `hash` and `signer` are kept alongside so callers can correlate the
/// announcement with later notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// Serialized, signed transaction bytes.
    #[serde(with = "hex_bytes")]
    pub payload: Vec<u8>,
    /// Hash of the signed transaction.
    pub hash: TransactionHash,
    /// Public key of the signer.
    pub signer: PublicKey,
    /// Network the transaction was signed for.
    pub network: NetworkType,
}

impl SignedTransaction {
    /// Create a new envelope.
    pub fn new(
        payload: Vec<u8>,
        hash: TransactionHash,
        signer: PublicKey,
        network: NetworkType,
    ) -> Self {
        Self {
            payload,
            hash,
            signer,
            network,
        }
    }

    /// Uppercase hex of the payload, as the announce endpoint expects it.
    #[must_use]
    pub fn payload_hex(&self) -> String {
        hex::encode_upper(&self.payload)
    }
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode_upper(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(text.trim()).map_err(serde::de::Error::custom)
    }
}
