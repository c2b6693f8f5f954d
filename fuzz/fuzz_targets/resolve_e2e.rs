// SPDX-License-Identifier: MIT OR Apache-2.0

#![no_main]

use bep44::test_utils::{PrivateKey, sign};
use bep44::record::MAX_SALT_CHARS;
use bep44::{Ed25519Verifier, RawRecord, RejectReason, Resolver, normalize};
use libfuzzer_sys::fuzz_target;

// Resolve arbitrary records, once as they are and once signed, against arbitrary current records.
fuzz_target!(|input: (RawRecord, Option<RawRecord>)| {
    let (candidate, current) = input;
    let resolver = Resolver::new(Ed25519Verifier);

    let current = current.and_then(|current| normalize(current).ok());
    let expected_fallback = current.clone().unwrap_or_default();

    // Arbitrary signatures are expected to fail, but resolving never panics and always returns a
    // well-formed record.
    let resolution = resolver.resolve(current.as_ref(), candidate.clone());
    let record = resolution.record();
    assert!(record.seq() >= 1);
    assert!(record.salt().is_none_or(|salt| {
        !salt.is_empty() && salt.chars().count() <= MAX_SALT_CHARS
    }));
    if !resolution.is_accepted() {
        assert_eq!(record, &expected_fallback);
    }

    // Signed candidates are only rejected for reasons other than their signature.
    let Ok(normalized) = normalize(candidate.clone()) else {
        return;
    };
    assert_eq!(normalize(&normalized).ok().as_ref(), Some(&normalized));

    let private_key = PrivateKey::new();
    let signed = sign(candidate, &private_key);
    let resolution = resolver.resolve(current.as_ref(), signed.clone());
    match resolution.reason() {
        None => {
            let record = resolution.into_record();
            assert_eq!(record.value(), normalized.value());
            assert_eq!(record.seq(), normalized.seq());
            assert_eq!(record, normalize(signed).expect("signed record normalizes"));
        }
        Some(reason) => assert_ne!(reason, &RejectReason::BadSignature),
    }
});
