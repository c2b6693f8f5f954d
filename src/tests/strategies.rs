// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generators for loosely-typed input, as it could arrive from the network.
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

use crate::identity::{PublicKey, SIGNATURE_LEN, Signature};
use crate::record::{RawNumber, RawRecord, RawValue};

/// Values which can be coerced into bytes, up to a bit over the maximum size.
pub fn byte_like_value() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        vec(any::<u8>(), 0..1100).prop_map(RawValue::Bytes),
        any::<String>().prop_map(RawValue::Text),
        vec(0i64..=255, 0..64).prop_map(RawValue::Sequence),
    ]
}

/// Values which can't be coerced into bytes.
pub fn invalid_value() -> impl Strategy<Value = RawValue> {
    prop_oneof![
        any::<f64>().prop_map(RawValue::Number),
        any::<bool>().prop_map(RawValue::Boolean),
        (vec(0i64..=255, 0..8), prop_oneof![i64::MIN..0, 256..i64::MAX]).prop_map(
            |(mut values, outside)| {
                values.push(outside);
                RawValue::Sequence(values)
            }
        ),
    ]
}

/// Any number, with a bias towards small sequence numbers so records compete with each other.
pub fn raw_number() -> impl Strategy<Value = RawNumber> {
    prop_oneof![
        (0u64..8).prop_map(RawNumber::Unsigned),
        any::<u64>().prop_map(RawNumber::Unsigned),
        any::<i64>().prop_map(RawNumber::Signed),
        (-8i64..8).prop_map(RawNumber::Signed),
        any::<f64>().prop_map(RawNumber::Float),
        (-8i32..8).prop_map(|value| RawNumber::Float(value.into())),
    ]
}

pub fn salt() -> impl Strategy<Value = String> {
    prop_oneof![any::<String>(), "[a-z]{0,8}", "\\PC{60,70}"]
}

pub fn public_key() -> impl Strategy<Value = PublicKey> {
    any::<[u8; 32]>().prop_map(PublicKey::from_bytes)
}

pub fn signature() -> impl Strategy<Value = Signature> {
    vec(any::<u8>(), SIGNATURE_LEN).prop_map(|bytes| {
        Signature::try_from(bytes.as_slice()).expect("signature has correct length")
    })
}

/// Raw records with byte-like values, every other field may be anything or missing.
pub fn raw_record() -> impl Strategy<Value = RawRecord> {
    (
        option::of(byte_like_value()),
        option::of(raw_number()),
        option::of(salt()),
        option::of(raw_number()),
        option::of(public_key()),
        option::of(signature()),
    )
        .prop_map(|(v, seq, salt, cas, k, sig)| RawRecord {
            v,
            seq,
            salt,
            cas,
            k,
            sig,
        })
}
