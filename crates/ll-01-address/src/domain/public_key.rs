//! Public key input normalisation.
//!
//! Keys arrive as hex text. Some tooling serializes them with a leading
//! length byte (`0x20`); that prefix is stripped so hashing always sees
//! the raw 32 bytes.

use crate::error::AddressError;
use shared_types::{PublicKey, PUBLIC_KEY_SIZE};

/// Length prefix emitted by length-delimited key serializers.
const LENGTH_PREFIX: u8 = PUBLIC_KEY_SIZE as u8;

/// Parse and normalise hex public key text to the raw key.
pub fn normalize_public_key(text: &str) -> Result<PublicKey, AddressError> {
    let bytes = hex::decode(text.trim())
        .map_err(|e| AddressError::InvalidPublicKey(format!("invalid hex: {}", e)))?;

    let raw = match bytes.as_slice() {
        [LENGTH_PREFIX, rest @ ..] if rest.len() == PUBLIC_KEY_SIZE => rest,
        other => other,
    };

    let key = <[u8; PUBLIC_KEY_SIZE]>::try_from(raw).map_err(|_| {
        AddressError::InvalidPublicKey(format!(
            "expected {} bytes, got {}",
            PUBLIC_KEY_SIZE,
            bytes.len()
        ))
    })?;

    Ok(PublicKey(key))
}
