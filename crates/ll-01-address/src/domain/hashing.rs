//! # Address Hashing
//!
//! SHA3-256 for key hashing and checksums, RIPEMD-160 for the account
//! digest.

use ripemd::Ripemd160;
use sha3::{Digest, Sha3_256};
use shared_types::PublicKey;

/// Size of the account digest in bytes.
pub const ACCOUNT_DIGEST_SIZE: usize = 20;

/// SHA3-256 output.
pub type Sha3Hash = [u8; 32];

/// One-shot SHA3-256.
pub fn sha3_256(data: &[u8]) -> Sha3Hash {
    Sha3_256::digest(data).into()
}

/// RIPEMD-160 of the SHA3-256 of the public key.
pub fn account_digest(public_key: &PublicKey) -> [u8; ACCOUNT_DIGEST_SIZE] {
    let key_hash = sha3_256(public_key.as_bytes());
    Ripemd160::digest(key_hash).into()
}

/// First four bytes of SHA3-256 over `network ‖ digest`.
pub fn checksum(prefix: &[u8]) -> [u8; 4] {
    let hash = sha3_256(prefix);
    [hash[0], hash[1], hash[2], hash[3]]
}
