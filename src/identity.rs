// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ed25519 public keys and signatures as they appear in mutable items.
//!
//! Both types are plain byte containers: a public key is not checked to be a valid curve point
//! when it is constructed, as items received from the network must be carried through unchanged
//! until their signature gets verified.
use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH, Verifier as _, VerifyingKey};
use thiserror::Error;

use crate::codec::{CodecError, bytes_to_hex, hex_to_bytes};

/// Size of an Ed25519 public key.
pub const PUBLIC_KEY_LEN: usize = PUBLIC_KEY_LENGTH;

/// Size of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = SIGNATURE_LENGTH;

/// 32-byte Ed25519 public key ("k") identifying the owner of a mutable item.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Bytes of the public key.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Convert the public key to a hex string.
    pub fn to_hex(&self) -> String {
        bytes_to_hex(self.0)
    }

    /// Verify a signature over the given bytes with this public key.
    ///
    /// Returns `false` if the key bytes do not describe a valid Ed25519 point.
    pub fn verify(&self, bytes: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.0) else {
            return false;
        };

        let signature = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
        verifying_key.verify(bytes, &signature).is_ok()
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PUBLIC_KEY_LEN]> for PublicKey {
    fn from(value: [u8; PUBLIC_KEY_LEN]) -> Self {
        Self(value)
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(value: VerifyingKey) -> Self {
        Self(value.to_bytes())
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = IdentityError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let value_len = value.len();

        let checked_value: [u8; PUBLIC_KEY_LEN] = value
            .try_into()
            .map_err(|_| IdentityError::InvalidLength(value_len, PUBLIC_KEY_LEN))?;

        Ok(Self(checked_value))
    }
}

impl FromStr for PublicKey {
    type Err = IdentityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(hex_to_bytes(value)?.as_slice())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.to_hex()).finish()
    }
}

/// 64-byte Ed25519 signature ("sig") over the signable payload of a mutable item.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Bytes of the signature.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Convert the signature to a hex string.
    pub fn to_hex(&self) -> String {
        bytes_to_hex(self.0)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; SIGNATURE_LEN]> for Signature {
    fn from(value: [u8; SIGNATURE_LEN]) -> Self {
        Self(value)
    }
}

impl From<ed25519_dalek::Signature> for Signature {
    fn from(value: ed25519_dalek::Signature) -> Self {
        Self(value.to_bytes())
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = IdentityError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let value_len = value.len();

        let checked_value: [u8; SIGNATURE_LEN] = value
            .try_into()
            .map_err(|_| IdentityError::InvalidLength(value_len, SIGNATURE_LEN))?;

        Ok(Self(checked_value))
    }
}

impl FromStr for Signature {
    type Err = IdentityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(hex_to_bytes(value)?.as_slice())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signature").field(&self.to_hex()).finish()
    }
}

/// Error types for `PublicKey` and `Signature`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IdentityError {
    /// Invalid number of bytes.
    #[error("invalid bytes length of {0}, expected {1} bytes")]
    InvalidLength(usize, usize),

    /// String contains invalid hexadecimal characters.
    #[error("invalid hex encoding in key or signature string")]
    InvalidHexEncoding(#[from] CodecError),
}

#[cfg(test)]
mod tests {
    use crate::codec::CodecError;
    use crate::test_utils::{PrivateKey, VECTOR_PUBLIC_KEY, VECTOR_1_SIGNATURE};

    use super::{IdentityError, PublicKey, Signature};

    #[test]
    fn verify() {
        let private_key = PrivateKey::new();
        let public_key = private_key.public_key();
        let signature = private_key.sign(b"3:seqi1e1:v12:Hello World!");

        assert!(public_key.verify(b"3:seqi1e1:v12:Hello World!", &signature));
        assert!(!public_key.verify(b"3:seqi2e1:v12:Hello World!", &signature));

        // Signature by someone else
        let other_public_key = PrivateKey::new().public_key();
        assert!(!other_public_key.verify(b"3:seqi1e1:v12:Hello World!", &signature));
    }

    #[test]
    fn verify_test_vector() {
        let public_key: PublicKey = VECTOR_PUBLIC_KEY.parse().unwrap();
        let signature: Signature = VECTOR_1_SIGNATURE.parse().unwrap();
        assert!(public_key.verify(b"3:seqi1e1:v12:Hello World!", &signature));
    }

    #[test]
    fn hex_representation() {
        let public_key: PublicKey = VECTOR_PUBLIC_KEY.parse().unwrap();
        assert_eq!(public_key.to_string(), VECTOR_PUBLIC_KEY);

        // Prefixed strings are accepted as well
        let prefixed: PublicKey = format!("0x{VECTOR_PUBLIC_KEY}").parse().unwrap();
        assert_eq!(prefixed, public_key);

        let signature: Signature = VECTOR_1_SIGNATURE.parse().unwrap();
        assert_eq!(signature.to_hex(), VECTOR_1_SIGNATURE);
    }

    #[test]
    fn invalid_length() {
        let result = PublicKey::try_from(&[254u8, 100, 4, 7][..]);
        assert_eq!(result, Err(IdentityError::InvalidLength(4, 32)));

        let result = Signature::try_from(&[0u8; 32][..]);
        assert_eq!(result, Err(IdentityError::InvalidLength(32, 64)));
    }

    #[test]
    fn invalid_hex_encoding() {
        let result: Result<PublicKey, IdentityError> = "notreallyahexstring".parse();
        assert!(matches!(result, Err(IdentityError::InvalidHexEncoding(_))));

        let result: Result<Signature, IdentityError> = "abc".parse();
        assert_eq!(
            result,
            Err(IdentityError::InvalidHexEncoding(
                CodecError::InvalidHexEncoding(hex::FromHexError::OddLength)
            ))
        );
    }
}
