// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signature verification used when resolving records.
use crate::identity::{PublicKey, Signature};

/// Checks a signature over a message against a public key.
///
/// Implementations need to be deterministic and free of side effects, as the resolver treats
/// its result as a pure function of the inputs. Any closure of the form
/// `Fn(&[u8], &Signature, &PublicKey) -> bool` is a verifier.
pub trait Verifier {
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool;
}

impl<F> Verifier for F
where
    F: Fn(&[u8], &Signature, &PublicKey) -> bool,
{
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
        self(message, signature, public_key)
    }
}

/// Ed25519 signature verification as specified in RFC 8032.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Verifier;

impl Verifier for Ed25519Verifier {
    fn verify(&self, message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
        public_key.verify(message, signature)
    }
}
