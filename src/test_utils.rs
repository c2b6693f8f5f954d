// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signing keys, record signing and BEP0044 test vectors for tests and demos.
//!
//! Records are only ever verified by this crate, producing signatures is left to applications.
//! The helpers here cover what tests need to build valid candidates.
use ed25519_dalek::{SECRET_KEY_LENGTH, Signer, SigningKey};
use rand::rngs::OsRng;

use crate::identity::{PublicKey, Signature};
use crate::record::{RawRecord, normalize};

/// Public key of the BEP0044 test vectors.
pub const VECTOR_PUBLIC_KEY: &str =
    "77ff84905a91936367c01360803104f92432fcd904a43511876df5cdf3e7e548";

/// Value of the first BEP0044 test vector (no salt, sequence number 1).
pub const VECTOR_1_VALUE: &str = "Hello World!";

/// Signature of the first BEP0044 test vector over `3:seqi1e1:v12:Hello World!`.
pub const VECTOR_1_SIGNATURE: &str = "305ac8aeb6c9c151fa120f120ea2cfb923564e11552d06a5d856091e5e853cff1260d3f39e4999684aa92eb73ffd136e6f4f3ecbfda0ce53a1608ecd7ae21f01";

/// Private ed25519 key used for signing records.
#[derive(Clone, Debug)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    /// Generates a new private key using the systems random number generator.
    pub fn new() -> Self {
        let mut csprng = OsRng;
        Self(SigningKey::generate(&mut csprng))
    }

    pub fn from_bytes(bytes: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self(SigningKey::from_bytes(bytes))
    }

    pub fn public_key(&self) -> PublicKey {
        self.0.verifying_key().into()
    }

    pub fn sign(&self, bytes: &[u8]) -> Signature {
        self.0.sign(bytes).into()
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

/// Signs the normalized form of a raw record and attaches public key and signature to it.
///
/// All other fields are left as they are, so malformed input stays malformed.
///
/// ## Panics
///
/// Panics if the value can not be coerced into bytes.
pub fn sign(raw: impl Into<RawRecord>, private_key: &PrivateKey) -> RawRecord {
    let raw = raw.into();
    let record = normalize(raw.clone()).expect("value of signed record is not byte-like");
    let signature = private_key.sign(&record.signable_bytes());
    raw.with_public_key(private_key.public_key())
        .with_signature(signature)
}

/// Prints logs of tests and demos when `RUST_LOG` is set.
pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}
