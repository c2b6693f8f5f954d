// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mutable items and the normalizer turning loosely-typed input into them.
//!
//! A [`RawRecord`] is what callers hand in: every field is optional and the value and number
//! fields accept more shapes than the protocol allows. [`normalize`] coerces it into a
//! [`MutableRecord`], clamping malformed numbers and over-long salts to safe values. The only
//! input it refuses is a value which can't be coerced into bytes.
//!
//! Normalizing is permissive, it is a convenience constructor. Whether a record may
//! replace the currently stored one is decided by the [resolver](crate::resolve).
use std::fmt;

use serde::de::{Error as SerdeError, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::{PublicKey, Signature};
use crate::serde::{deserialize_hex, serialize_hex};
use crate::signable::build_signable;

/// Sequence number of records which did not state a (valid) one.
pub const DEFAULT_SEQ: u64 = 1;

/// Maximum number of characters kept from a salt.
pub const MAX_SALT_CHARS: usize = 64;

/// Expected sequence number for "cas" values which can never match a normalized sequence number.
const UNMATCHABLE_CAS: u64 = 0;

/// Loosely-typed value ("v") of a raw record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum RawValue {
    /// Used as-is.
    Bytes(Vec<u8>),

    /// Encoded as UTF-8.
    Text(String),

    /// Copied into bytes, every element needs to be in the range of a byte.
    Sequence(Vec<i64>),

    /// Can't be coerced into bytes.
    Number(f64),

    /// Can't be coerced into bytes.
    Boolean(bool),
}

impl RawValue {
    /// Coerce the value into its byte representation.
    pub fn into_bytes(self) -> Result<Vec<u8>, NormalizeError> {
        match self {
            RawValue::Bytes(bytes) => Ok(bytes),
            RawValue::Text(text) => Ok(text.into_bytes()),
            RawValue::Sequence(values) => values
                .into_iter()
                .map(|value| {
                    u8::try_from(value)
                        .map_err(|_| NormalizeError::InvalidValueType("integer outside byte range"))
                })
                .collect(),
            RawValue::Number(_) => Err(NormalizeError::InvalidValueType("number")),
            RawValue::Boolean(_) => Err(NormalizeError::InvalidValueType("boolean")),
        }
    }
}

impl From<Vec<u8>> for RawValue {
    fn from(value: Vec<u8>) -> Self {
        RawValue::Bytes(value)
    }
}

impl From<&[u8]> for RawValue {
    fn from(value: &[u8]) -> Self {
        RawValue::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for RawValue {
    fn from(value: &[u8; N]) -> Self {
        RawValue::Bytes(value.to_vec())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<Vec<i64>> for RawValue {
    fn from(value: Vec<i64>) -> Self {
        RawValue::Sequence(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Boolean(value)
    }
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct RawValueVisitor;

        impl<'de> Visitor<'de> for RawValueVisitor {
            type Value = RawValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("string, bytes, integer sequence, number or boolean")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: SerdeError,
            {
                Ok(RawValue::Text(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: SerdeError,
            {
                Ok(RawValue::Text(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> Result<Self::Value, E>
            where
                E: SerdeError,
            {
                Ok(RawValue::Bytes(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Self::Value, E>
            where
                E: SerdeError,
            {
                Ok(RawValue::Bytes(value))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(value) = seq.next_element::<i64>()? {
                    values.push(value);
                }
                Ok(RawValue::Sequence(values))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: SerdeError,
            {
                Ok(RawValue::Number(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: SerdeError,
            {
                Ok(RawValue::Number(value as f64))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: SerdeError,
            {
                Ok(RawValue::Number(value))
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: SerdeError,
            {
                Ok(RawValue::Boolean(value))
            }
        }

        deserializer.deserialize_any(RawValueVisitor)
    }
}

/// Loosely-typed number used for sequence numbers ("seq") and expected sequence numbers ("cas").
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum RawNumber {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl RawNumber {
    /// Clamps the number to a positive sequence number, rounding down fractions.
    ///
    /// Values beyond `u64::MAX` saturate.
    fn to_seq(self) -> u64 {
        match self {
            RawNumber::Unsigned(value) => value.max(DEFAULT_SEQ),
            RawNumber::Signed(value) => {
                u64::try_from(value).map_or(DEFAULT_SEQ, |value| value.max(DEFAULT_SEQ))
            }
            RawNumber::Float(value) if value.is_nan() => DEFAULT_SEQ,
            // Float to integer casts saturate, negative values end up as zero
            RawNumber::Float(value) => (value.floor() as u64).max(DEFAULT_SEQ),
        }
    }

    /// Converts the number into an expected sequence number.
    ///
    /// Zero and NaN mean "no expectation". Numbers which can never equal a sequence number
    /// (negative, fractional or infinite ones) are pinned to zero, which no normalized sequence
    /// number can be.
    fn to_cas(self) -> Option<u64> {
        match self {
            RawNumber::Unsigned(0) | RawNumber::Signed(0) => None,
            RawNumber::Float(value) if value.is_nan() || value == 0.0 => None,
            RawNumber::Unsigned(value) => Some(value),
            RawNumber::Signed(value) => Some(u64::try_from(value).unwrap_or(UNMATCHABLE_CAS)),
            RawNumber::Float(value)
                if value > 0.0 && value.fract() == 0.0 && value < u64::MAX as f64 =>
            {
                Some(value as u64)
            }
            RawNumber::Float(_) => Some(UNMATCHABLE_CAS),
        }
    }
}

impl From<u64> for RawNumber {
    fn from(value: u64) -> Self {
        RawNumber::Unsigned(value)
    }
}

impl From<u32> for RawNumber {
    fn from(value: u32) -> Self {
        RawNumber::Unsigned(value.into())
    }
}

impl From<i64> for RawNumber {
    fn from(value: i64) -> Self {
        RawNumber::Signed(value)
    }
}

impl From<i32> for RawNumber {
    fn from(value: i32) -> Self {
        RawNumber::Signed(value.into())
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Float(value)
    }
}

/// Reads any number or numeric string into a `RawNumber`. Everything else is "not a number" and
/// reads as `None`.
fn deserialize_lenient_number<'de, D>(deserializer: D) -> Result<Option<RawNumber>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct LenientNumberVisitor;

    impl<'de> Visitor<'de> for LenientNumberVisitor {
        type Value = Option<RawNumber>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("number or numeric string")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: SerdeError,
        {
            Ok(Some(RawNumber::Unsigned(value)))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: SerdeError,
        {
            Ok(Some(RawNumber::Signed(value)))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: SerdeError,
        {
            Ok(Some(RawNumber::Float(value)))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: SerdeError,
        {
            let value = value.trim();
            let number = value
                .parse::<u64>()
                .map(RawNumber::Unsigned)
                .or_else(|_| value.parse::<i64>().map(RawNumber::Signed))
                .or_else(|_| value.parse::<f64>().map(RawNumber::Float))
                .ok();
            Ok(number)
        }

        fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
        where
            E: SerdeError,
        {
            Ok(None)
        }

        fn visit_bytes<E>(self, _value: &[u8]) -> Result<Self::Value, E>
        where
            E: SerdeError,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: SerdeError,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: SerdeError,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(self)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    deserializer.deserialize_any(LenientNumberVisitor)
}

/// Loosely-typed input for a mutable item.
///
/// `RawRecord::default()` represents absent input and normalizes to the default record.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct RawRecord {
    #[serde(default)]
    pub v: Option<RawValue>,

    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub seq: Option<RawNumber>,

    #[serde(default)]
    pub salt: Option<String>,

    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub cas: Option<RawNumber>,

    #[serde(default)]
    pub k: Option<PublicKey>,

    #[serde(default)]
    pub sig: Option<Signature>,
}

impl RawRecord {
    pub fn new(v: impl Into<RawValue>) -> Self {
        Self {
            v: Some(v.into()),
            ..Default::default()
        }
    }

    pub fn with_seq(mut self, seq: impl Into<RawNumber>) -> Self {
        self.seq = Some(seq.into());
        self
    }

    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    pub fn with_cas(mut self, cas: impl Into<RawNumber>) -> Self {
        self.cas = Some(cas.into());
        self
    }

    pub fn with_public_key(mut self, public_key: PublicKey) -> Self {
        self.k = Some(public_key);
        self
    }

    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.sig = Some(signature);
        self
    }
}

impl From<MutableRecord> for RawRecord {
    fn from(record: MutableRecord) -> Self {
        Self {
            v: Some(RawValue::Bytes(record.v)),
            seq: Some(RawNumber::Unsigned(record.seq)),
            salt: record.salt,
            cas: record.cas.map(raw_cas),
            k: record.k,
            sig: record.sig,
        }
    }
}

/// Turns a normalized "cas" back into raw input which normalizes to the same value.
fn raw_cas(cas: u64) -> RawNumber {
    if cas == UNMATCHABLE_CAS {
        // Zero in raw input means "no expectation"
        RawNumber::Signed(-1)
    } else {
        RawNumber::Unsigned(cas)
    }
}

impl From<&MutableRecord> for RawRecord {
    fn from(record: &MutableRecord) -> Self {
        record.clone().into()
    }
}

/// Normalized, immutable mutable item.
///
/// Every instance satisfies: `seq >= 1` and `salt` is either absent or a non-empty string of at
/// most 64 characters. The signature is not checked, see [`crate::resolve`] for that.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordRepr")]
pub struct MutableRecord {
    #[serde(serialize_with = "serialize_hex")]
    v: Vec<u8>,

    seq: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    salt: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    cas: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    k: Option<PublicKey>,

    #[serde(skip_serializing_if = "Option::is_none")]
    sig: Option<Signature>,
}

impl MutableRecord {
    /// Opaque payload ("v").
    pub fn value(&self) -> &[u8] {
        &self.v
    }

    /// Sequence number ("seq").
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn salt(&self) -> Option<&str> {
        self.salt.as_deref()
    }

    /// Expected sequence number of the record this one replaces ("cas").
    ///
    /// `Some(0)` is an expectation no record can meet.
    pub fn cas(&self) -> Option<u64> {
        self.cas
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        self.k.as_ref()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.sig.as_ref()
    }

    pub fn into_value(self) -> Vec<u8> {
        self.v
    }

    /// Bytes the signature of this record is computed over.
    pub fn signable_bytes(&self) -> Vec<u8> {
        build_signable(self)
    }

    /// Unsigned input for an update of this record with a new value.
    ///
    /// The update keeps salt and public key, increments the sequence number and expects this
    /// record's sequence number to still be the current one.
    pub fn successor(&self, v: impl Into<RawValue>) -> RawRecord {
        RawRecord {
            v: Some(v.into()),
            seq: Some(RawNumber::Unsigned(self.seq.saturating_add(1))),
            salt: self.salt.clone(),
            cas: Some(RawNumber::Unsigned(self.seq)),
            k: self.k,
            sig: None,
        }
    }
}

impl Default for MutableRecord {
    fn default() -> Self {
        Self {
            v: Vec::new(),
            seq: DEFAULT_SEQ,
            salt: None,
            cas: None,
            k: None,
            sig: None,
        }
    }
}

impl TryFrom<RawRecord> for MutableRecord {
    type Error = NormalizeError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        normalize(raw)
    }
}

/// Decoded form of a record, clamped into a `MutableRecord` on conversion.
#[derive(Deserialize)]
struct RecordRepr {
    #[serde(deserialize_with = "deserialize_hex")]
    v: Vec<u8>,

    #[serde(default = "default_seq")]
    seq: u64,

    #[serde(default)]
    salt: Option<String>,

    #[serde(default)]
    cas: Option<u64>,

    #[serde(default)]
    k: Option<PublicKey>,

    #[serde(default)]
    sig: Option<Signature>,
}

fn default_seq() -> u64 {
    DEFAULT_SEQ
}

impl From<RecordRepr> for MutableRecord {
    fn from(repr: RecordRepr) -> Self {
        Self {
            v: repr.v,
            seq: repr.seq.max(DEFAULT_SEQ),
            salt: repr.salt.and_then(clamp_salt),
            cas: repr.cas,
            k: repr.k,
            sig: repr.sig,
        }
    }
}

/// Coerces loosely-typed input into a well-formed `MutableRecord`.
///
/// - `v`: bytes are used as-is, text is UTF-8 encoded and integer sequences are copied into bytes,
///   absent values become empty bytes
/// - `seq`: absent or NaN becomes 1, otherwise `max(floor(seq), 1)`
/// - `salt`: empty salts are dropped, longer ones are cut after 64 characters (not bytes)
/// - `cas`: absent, zero or NaN mean no expectation, numbers which can't equal any sequence
///   number become 0, whole positive numbers are kept
/// - `k` and `sig`: copied unchanged
///
/// Fails only if `v` can't be coerced into bytes.
pub fn normalize(raw: impl Into<RawRecord>) -> Result<MutableRecord, NormalizeError> {
    let raw = raw.into();

    let v = match raw.v {
        Some(value) => value.into_bytes()?,
        None => Vec::new(),
    };

    Ok(MutableRecord {
        v,
        seq: raw.seq.map_or(DEFAULT_SEQ, RawNumber::to_seq),
        salt: raw.salt.and_then(clamp_salt),
        cas: raw.cas.and_then(RawNumber::to_cas),
        k: raw.k,
        sig: raw.sig,
    })
}

fn clamp_salt(mut salt: String) -> Option<String> {
    if salt.is_empty() {
        return None;
    }

    if let Some((index, _)) = salt.char_indices().nth(MAX_SALT_CHARS) {
        salt.truncate(index);
    }

    Some(salt)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("record value needs to be a string or byte sequence, got {0}")]
    InvalidValueType(&'static str),
}
