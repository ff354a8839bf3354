//! Domain layer: the address value, its hashing steps, and public key
//! normalisation. No I/O.

pub mod address;
pub mod hashing;
pub mod public_key;
