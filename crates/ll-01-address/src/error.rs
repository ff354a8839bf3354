//! Error types for address derivation and validation.

use thiserror::Error;

/// Errors from the address codec.
///
/// `InvalidPublicKey` fails an encode; every other variant is a flavour of
/// "invalid address" and fails a decode or validate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Public key input is not hex or not the expected size.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Address text is malformed (length, alphabet).
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Recomputed checksum does not match the trailing four bytes.
    #[error("Invalid address: checksum mismatch (expected {expected}, found {found})")]
    ChecksumMismatch {
        /// Checksum recomputed from the first 21 bytes, hex
        expected: String,
        /// Checksum carried by the address, hex
        found: String,
    },

    /// Leading byte is not a known network identifier.
    #[error("Invalid address: unknown network identifier 0x{0:02x}")]
    UnknownNetwork(u8),
}

impl AddressError {
    /// True for every variant produced by decoding or validating text.
    #[must_use]
    pub fn is_invalid_address(&self) -> bool {
        !matches!(self, AddressError::InvalidPublicKey(_))
    }
}
