//! # Shared Types Crate
//!
//! Envelope types that every Ledger-Link crate agrees on.
//!
//! ## Clusters
//!
//! - **Network**: [`NetworkType`], the one-byte discriminator embedded in
//!   every address.
//! - **Chain**: [`TransactionHash`], [`PublicKey`], [`BlockHeight`] and the
//!   [`SignedTransaction`] envelope handed to the announcer.
//!
//! Transaction construction and signing are external collaborators; this
//! crate only carries the bytes they produce.

pub mod entities;
pub mod errors;
pub mod network;

pub use entities::*;
pub use errors::*;
pub use network::NetworkType;
