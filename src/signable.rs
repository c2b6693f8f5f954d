// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical bytes a mutable item's signature is computed over.
//!
//! The payload is the bencoded form of the "salt", "seq" and "v" entries of the item dictionary,
//! concatenated without the surrounding dictionary delimiters:
//!
//! ```text
//! 4:salt6:foobar3:seqi4e1:v12:Hello world!
//! ```
//!
//! The salt entry is only present when the record has a salt. All length prefixes count bytes,
//! not characters. Every BEP0044 implementation needs to produce these exact bytes for signatures
//! to verify across the network.
use crate::record::MutableRecord;

const SALT_KEY: &[u8] = b"4:salt";
const SEQ_KEY: &[u8] = b"3:seq";
const VALUE_KEY: &[u8] = b"1:v";

/// Serializes the signed fields of a record into its signable payload.
pub fn build_signable(record: &MutableRecord) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(signable_len_hint(record));

    if let Some(salt) = record.salt() {
        bytes.extend_from_slice(SALT_KEY);
        write_byte_string(&mut bytes, salt.as_bytes());
    }

    bytes.extend_from_slice(SEQ_KEY);
    bytes.push(b'i');
    bytes.extend_from_slice(record.seq().to_string().as_bytes());
    bytes.push(b'e');

    bytes.extend_from_slice(VALUE_KEY);
    write_byte_string(&mut bytes, record.value());

    bytes
}

/// Appends a bencoded byte string: decimal byte length, colon, raw bytes.
fn write_byte_string(bytes: &mut Vec<u8>, value: &[u8]) {
    bytes.extend_from_slice(value.len().to_string().as_bytes());
    bytes.push(b':');
    bytes.extend_from_slice(value);
}

fn signable_len_hint(record: &MutableRecord) -> usize {
    // Keys, integer delimiters and a generous allowance for the decimal numbers
    let fixed = SALT_KEY.len() + SEQ_KEY.len() + VALUE_KEY.len() + 2 + 3 * 20;
    fixed + record.salt().map_or(0, str::len) + record.value().len()
}
