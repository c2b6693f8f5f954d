// SPDX-License-Identifier: MIT OR Apache-2.0

//! Freshness resolution: deciding whether a candidate record replaces the current one.
//!
//! Records for the same slot (public key and salt) are ordered by their sequence number. A
//! candidate replaces the current record only if it passes all of the following checks, which
//! run in this order so that cheap arithmetic rejects happen before signature verification:
//!
//! 1. The value can be coerced into bytes
//! 2. The declared sequence number is a whole number
//! 3. The declared sequence number is positive
//! 4. The sequence number is not lower than the current one
//! 5. If "cas" is given, it equals the current sequence number
//! 6. The value does not exceed the maximum size
//! 7. The salt does not exceed the maximum length
//! 8. The record is signed and the signature over its signable payload verifies
//!
//! The first failing check decides the outcome: the current record stays authoritative. When
//! there is no current record, the default record (empty value, sequence number 1) takes its
//! place, both for comparison and as the result of a rejection.
//!
//! Resolving holds no state, it is up to the caller to serialize resolutions for the same slot
//! and to persist the outcome.
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::Config;
use crate::record::{MutableRecord, NormalizeError, RawNumber, RawRecord, normalize};
use crate::verify::Verifier;

/// Outcome of resolving a candidate against the current record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Candidate is the new authoritative record.
    Accepted(MutableRecord),

    /// Candidate was rejected, the contained record is still authoritative.
    Rejected(MutableRecord, RejectReason),
}

impl Resolution {
    /// The authoritative record after resolution.
    pub fn record(&self) -> &MutableRecord {
        match self {
            Resolution::Accepted(record) => record,
            Resolution::Rejected(record, _) => record,
        }
    }

    pub fn into_record(self) -> MutableRecord {
        match self {
            Resolution::Accepted(record) => record,
            Resolution::Rejected(record, _) => record,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Resolution::Accepted(_))
    }

    pub fn reason(&self) -> Option<&RejectReason> {
        match self {
            Resolution::Accepted(_) => None,
            Resolution::Rejected(_, reason) => Some(reason),
        }
    }
}

/// Resolves candidate records against the current record of a slot.
#[derive(Clone, Debug)]
pub struct Resolver<V> {
    config: Config,
    verifier: V,
}

impl<V> Resolver<V>
where
    V: Verifier,
{
    pub fn new(verifier: V) -> Self {
        Self::with_config(Config::default(), verifier)
    }

    pub fn with_config(config: Config, verifier: V) -> Self {
        Self { config, verifier }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Decides which record is authoritative after receiving `candidate`.
    ///
    /// Never fails, every problem with the candidate results in a [`Resolution::Rejected`]
    /// carrying the reason. Resolving is deterministic as long as the verifier is.
    pub fn resolve(
        &self,
        current: Option<&MutableRecord>,
        candidate: impl Into<RawRecord>,
    ) -> Resolution {
        let current = current.cloned().unwrap_or_default();

        match self.check(&current, candidate.into()) {
            Ok(candidate) => {
                trace!(
                    seq = candidate.seq(),
                    previous_seq = current.seq(),
                    "accepted mutable record"
                );
                Resolution::Accepted(candidate)
            }
            Err(reason) => {
                debug!(%reason, seq = current.seq(), "rejected mutable record candidate");
                Resolution::Rejected(current, reason)
            }
        }
    }

    fn check(
        &self,
        current: &MutableRecord,
        candidate: RawRecord,
    ) -> Result<MutableRecord, RejectReason> {
        let declared_seq = candidate.seq;
        let candidate = normalize(candidate)?;

        if let Some(seq) = declared_seq {
            check_declared_seq(seq)?;
        }

        if candidate.seq() < current.seq() {
            return Err(RejectReason::StaleSeq(candidate.seq(), current.seq()));
        }

        if let Some(cas) = candidate.cas().filter(|cas| *cas != current.seq()) {
            return Err(RejectReason::CasMismatch(cas, current.seq()));
        }

        let value_size = candidate.value().len();
        if value_size > self.config.max_value_size {
            return Err(RejectReason::ValueTooLarge(
                value_size,
                self.config.max_value_size,
            ));
        }

        if let Some(salt_length) = candidate
            .salt()
            .map(|salt| salt.chars().count())
            .filter(|length| *length > self.config.max_salt_length)
        {
            return Err(RejectReason::SaltTooLong(
                salt_length,
                self.config.max_salt_length,
            ));
        }

        let (Some(public_key), Some(signature)) = (candidate.public_key(), candidate.signature())
        else {
            return Err(RejectReason::MissingSignature);
        };

        if !self
            .verifier
            .verify(&candidate.signable_bytes(), signature, public_key)
        {
            return Err(RejectReason::BadSignature);
        }

        Ok(candidate)
    }
}

/// Rejects sequence numbers the normalizer would otherwise round down or clamp to 1.
///
/// NaN counts as an absent sequence number.
fn check_declared_seq(seq: RawNumber) -> Result<(), RejectReason> {
    match seq {
        RawNumber::Float(value) if value.is_nan() => Ok(()),
        RawNumber::Float(value) if !value.is_finite() || value.fract() != 0.0 => {
            Err(RejectReason::NotInteger)
        }
        RawNumber::Float(value) if value <= 0.0 => Err(RejectReason::NonPositiveSeq),
        RawNumber::Signed(value) if value <= 0 => Err(RejectReason::NonPositiveSeq),
        RawNumber::Unsigned(0) => Err(RejectReason::NonPositiveSeq),
        _ => Ok(()),
    }
}

/// Returns the authoritative record after receiving `candidate`, using the default limits.
///
/// This is [`Resolver::resolve`] without the reason for a rejection.
pub fn freshest<V>(
    current: Option<&MutableRecord>,
    candidate: impl Into<RawRecord>,
    verifier: V,
) -> MutableRecord
where
    V: Verifier,
{
    Resolver::new(verifier)
        .resolve(current, candidate)
        .into_record()
}

/// Reasons for rejecting a candidate record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error(transparent)]
    InvalidValueType(#[from] NormalizeError),

    #[error("sequence number is not a whole number")]
    NotInteger,

    #[error("sequence number needs to be positive")]
    NonPositiveSeq,

    #[error("sequence number {0} is lower than current sequence number {1}")]
    StaleSeq(u64, u64),

    #[error("expected sequence number {0} does not match current sequence number {1}")]
    CasMismatch(u64, u64),

    #[error("value of {0} bytes exceeds maximum size of {1} bytes")]
    ValueTooLarge(usize, usize),

    #[error("salt of {0} characters exceeds maximum length of {1} characters")]
    SaltTooLong(usize, usize),

    #[error("record needs to be signed")]
    MissingSignature,

    #[error("signature does not match public key")]
    BadSignature,
}
