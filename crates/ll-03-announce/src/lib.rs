//! # LL-03 Announce
//!
//! Hands a signed transaction to a node for inclusion.
//!
//! The [`Announcer`] trait is the port; [`HttpAnnouncer`] implements it
//! against the node REST API with JSON body `{"payload": "<HEX>"}`.
//! Correlating the announcement with its outcome is the caller's job:
//! subscribe to the signer's `confirmedAdded` and `status` channels first,
//! then announce, then match notifications on [`AnnounceReceipt::hash`].

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod announcer;
pub mod config;
pub mod error;

pub use announcer::{AnnounceReceipt, Announcer, HttpAnnouncer};
pub use config::AnnounceConfig;
pub use error::AnnounceError;
