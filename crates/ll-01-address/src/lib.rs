//! # LL-01 Address
//!
//! Derives network-specific account addresses from public keys and
//! validates textual addresses.
//!
//! ## Algorithm
//!
//! ```text
//! public key (32 bytes)
//!      │ SHA3-256
//!      ▼
//! key hash (32 bytes)
//!      │ RIPEMD-160
//!      ▼
//! account digest (20 bytes)
//!      │ prepend network byte
//!      ▼
//! network ‖ digest (21 bytes) ──SHA3-256──► checksum = first 4 bytes
//!      │ append checksum
//!      ▼
//! raw address (25 bytes) ──BASE32──► 40-character text
//! ```
//!
//! Every step is deterministic and free of I/O; all functions are safe to
//! call concurrently.
//!
//! ## Usage
//!
//! ```ignore
//! use ll_01_address::{AddressCodec, NetworkType};
//!
//! let codec = AddressCodec::new(NetworkType::MijinTest);
//! let address = codec.encode("b4f12e7c9f6946091e2cb8b6d3a12b50d17ccbbf646386ea27ce2946a7423dcf")?;
//! assert_eq!(address.to_string(), "SARNASAS2BIAB6LMFA3FPMGBPGIJGK6IJETM3ZSP");
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod codec;
pub mod domain;
pub mod error;

pub use codec::{decode, encode, encode_bytes, validate, AddressCodec};
pub use domain::address::{Address, ADDRESS_DECODED_SIZE, ADDRESS_ENCODED_SIZE, CHECKSUM_SIZE};
pub use domain::hashing::{account_digest, ACCOUNT_DIGEST_SIZE};
pub use domain::public_key::normalize_public_key;
pub use error::AddressError;
pub use shared_types::NetworkType;
