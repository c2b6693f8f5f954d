// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversions between bytes, hexadecimal strings and UTF-8 text.
//!
//! Hex strings are always written in lowercase without a prefix. When reading them an optional
//! leading `0x` is accepted.
//!
//! Text decoding is lossy: invalid UTF-8 sequences are replaced with `U+FFFD REPLACEMENT
//! CHARACTER` instead of failing.
use thiserror::Error;

const HEX_PREFIX: &str = "0x";

/// Decodes a hexadecimal string into bytes, ignoring an optional `0x` prefix.
pub fn hex_to_bytes(value: &str) -> Result<Vec<u8>, CodecError> {
    let value = value.strip_prefix(HEX_PREFIX).unwrap_or(value);
    Ok(hex::decode(value)?)
}

/// Encodes bytes as a lowercase hexadecimal string with two characters per byte.
pub fn bytes_to_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Encodes text as UTF-8 bytes.
pub fn text_to_bytes(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Decodes UTF-8 bytes into text, substituting invalid sequences with the replacement character.
pub fn bytes_to_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// String contains invalid hexadecimal characters or has an odd length.
    #[error("invalid hex encoding: {0}")]
    InvalidHexEncoding(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{CodecError, bytes_to_hex, bytes_to_text, hex_to_bytes, text_to_bytes};

    const HELLO_BYTES: [u8; 19] = [
        72, 101, 108, 108, 111, 33, 32, 228, 184, 173, 232, 139, 177, 229, 173, 151, 229, 133, 184,
    ];

    #[rstest]
    #[case("deadbeefc0de")]
    #[case("0xdeadbeefc0de")]
    #[case("DEADBEEFC0DE")]
    fn hex_decoding(#[case] value: &str) {
        assert_eq!(
            hex_to_bytes(value).unwrap(),
            vec![222, 173, 190, 239, 192, 222]
        );
    }

    #[test]
    fn hex_encoding() {
        assert_eq!(bytes_to_hex([222u8, 173, 190, 239, 192, 222]), "deadbeefc0de");

        // Single digit values are zero-padded
        assert_eq!(bytes_to_hex([0u8, 1, 15, 16]), "00010f10");
        assert_eq!(bytes_to_hex(Vec::<u8>::new()), "");
    }

    #[rstest]
    #[case("abc")]
    #[case("0xzz")]
    #[case("hello world!")]
    fn invalid_hex(#[case] value: &str) {
        assert!(matches!(
            hex_to_bytes(value),
            Err(CodecError::InvalidHexEncoding(_))
        ));
    }

    #[test]
    fn hex_error_details() {
        assert_eq!(
            hex_to_bytes("abc"),
            Err(CodecError::InvalidHexEncoding(hex::FromHexError::OddLength))
        );
        assert_eq!(
            hex_to_bytes("0xzz"),
            Err(CodecError::InvalidHexEncoding(
                hex::FromHexError::InvalidHexCharacter { c: 'z', index: 0 }
            ))
        );
    }

    #[test]
    fn hex_round_trip() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(hex_to_bytes(&bytes_to_hex(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn text_conversion() {
        assert_eq!(text_to_bytes("Hello! 中英字典"), HELLO_BYTES.to_vec());
        assert_eq!(bytes_to_text(&HELLO_BYTES), "Hello! 中英字典");
        assert_eq!(bytes_to_text(&text_to_bytes("")), "");
    }

    #[test]
    fn lossy_text_decoding() {
        // Truncated multi-byte sequence
        assert_eq!(bytes_to_text(&[72, 105, 228, 184]), "Hi\u{FFFD}");
    }
}
