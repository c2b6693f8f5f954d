// SPDX-License-Identifier: MIT OR Apache-2.0

#![cfg_attr(doctest, doc=include_str!("../README.md"))]

//! Signed, versioned mutable items as stored in BitTorrent DHTs ([BEP0044]).
//!
//! A mutable item is a small payload (up to 1000 bytes) published under an ed25519 public key and
//! an optional salt. Every new version carries a higher sequence number and a signature over the
//! canonical [signable payload](signable). Nodes storing items use a [`Resolver`] to decide
//! whether an incoming candidate replaces the version they already hold.
//!
//! Candidates arrive loosely typed, numbers might be floats or strings and values text or bytes.
//! [`normalize`] coerces them into a well-formed [`MutableRecord`] before any check runs.
//!
//! DHT routing, storage and the network protocol are out of scope of this crate.
//!
//! [BEP0044]: https://www.bittorrent.org/beps/bep_0044.html
//!
//! ## Example
//!
//! ```
//! use bep44::{Ed25519Verifier, RawRecord, Resolver};
//! use bep44::test_utils::{PrivateKey, sign};
//!
//! let private_key = PrivateKey::new();
//! let resolver = Resolver::new(Ed25519Verifier);
//!
//! // Publish the first version of an item
//! let first = sign(RawRecord::new("Hello World!").with_salt("greeting"), &private_key);
//! let current = resolver.resolve(None, first).into_record();
//! assert_eq!(current.seq(), 1);
//!
//! // Updates need a higher or equal sequence number and a valid signature
//! let update = sign(current.successor("Hello again!"), &private_key);
//! let resolution = resolver.resolve(Some(&current), update);
//! assert!(resolution.is_accepted());
//! assert_eq!(resolution.record().value(), b"Hello again!");
//! ```
pub mod codec;
pub mod config;
pub mod identity;
pub mod record;
pub mod resolve;
mod serde;
pub mod signable;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
#[cfg(test)]
mod tests;
pub mod verify;

pub use codec::{CodecError, bytes_to_hex, bytes_to_text, hex_to_bytes, text_to_bytes};
pub use config::Config;
pub use identity::{IdentityError, PublicKey, Signature};
pub use record::{MutableRecord, NormalizeError, RawNumber, RawRecord, RawValue, normalize};
pub use resolve::{RejectReason, Resolution, Resolver, freshest};
pub use signable::build_signable;
pub use verify::{Ed25519Verifier, Verifier};
