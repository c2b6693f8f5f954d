// SPDX-License-Identifier: MIT OR Apache-2.0

use bep44::test_utils::{
    PrivateKey, VECTOR_1_SIGNATURE, VECTOR_1_VALUE, VECTOR_PUBLIC_KEY, setup_logging, sign,
};
use bep44::{
    Ed25519Verifier, MutableRecord, PublicKey, RawRecord, RejectReason, Resolution, Resolver,
    Signature, freshest, normalize,
};

fn vector_1() -> RawRecord {
    let public_key: PublicKey = VECTOR_PUBLIC_KEY.parse().unwrap();
    let signature: Signature = VECTOR_1_SIGNATURE.parse().unwrap();

    RawRecord::new(VECTOR_1_VALUE)
        .with_seq(1)
        .with_public_key(public_key)
        .with_signature(signature)
}

#[test]
fn vector_1_signable_payload() {
    let record = normalize(vector_1()).unwrap();
    assert_eq!(record.signable_bytes(), b"3:seqi1e1:v12:Hello World!");
}

#[test]
fn vector_1_is_accepted() {
    setup_logging();

    let resolution = Resolver::new(Ed25519Verifier).resolve(None, vector_1());
    assert!(resolution.is_accepted());

    let record = resolution.into_record();
    assert_eq!(record.value(), b"Hello World!");
    assert_eq!(record.seq(), 1);
    assert_eq!(record.salt(), None);
    assert_eq!(
        record.public_key().map(PublicKey::to_hex).as_deref(),
        Some(VECTOR_PUBLIC_KEY)
    );
}

#[test]
fn tampered_vector_1_is_rejected() {
    setup_logging();

    let mut tampered = vector_1();
    tampered.v = Some("Hello World!!!".into());

    let resolution = Resolver::new(Ed25519Verifier).resolve(None, tampered.clone());
    assert_eq!(
        resolution,
        Resolution::Rejected(MutableRecord::default(), RejectReason::BadSignature)
    );

    let record = freshest(None, tampered, Ed25519Verifier);
    assert_eq!(record.value(), b"");
    assert_eq!(record.seq(), 1);
}

#[test]
fn vector_1_wrapped_in_json() {
    let json = format!(
        r#"{{
            "v": "{VECTOR_1_VALUE}",
            "seq": 1,
            "k": "{VECTOR_PUBLIC_KEY}",
            "sig": "{VECTOR_1_SIGNATURE}"
        }}"#
    );
    let raw: RawRecord = serde_json::from_str(&json).unwrap();

    let record = freshest(None, raw, Ed25519Verifier);
    assert_eq!(record.value(), b"Hello World!");
    assert!(record.signature().is_some());
}

#[test]
fn publish_and_update() {
    setup_logging();

    let private_key = PrivateKey::new();
    let resolver = Resolver::new(Ed25519Verifier);

    // First version of a salted item
    let first = sign(
        RawRecord::new("Hello! 中英字典").with_salt("foobar").with_seq(5),
        &private_key,
    );
    let current = resolver.resolve(None, first).into_record();
    assert_eq!(
        current.signable_bytes(),
        "4:salt6:foobar3:seqi5e1:v19:Hello! 中英字典".as_bytes()
    );

    // Update guarded by compare-and-swap
    let update = sign(current.successor("second"), &private_key);
    let updated = resolver.resolve(Some(&current), update.clone()).into_record();
    assert_eq!(updated.seq(), 6);
    assert_eq!(updated.cas(), Some(5));
    assert_eq!(updated.salt(), Some("foobar"));

    // Replaying the update after a newer version arrived fails the swap
    let newer = sign(updated.successor("third"), &private_key);
    let newest = resolver.resolve(Some(&updated), newer).into_record();
    assert_eq!(newest.seq(), 7);

    let replayed = resolver.resolve(Some(&newest), update);
    assert_eq!(replayed.reason(), Some(&RejectReason::StaleSeq(6, 7)));
    assert_eq!(replayed.into_record(), newest);

    // Someone else can't take over the item
    let intruder = PrivateKey::new();
    let hijack = sign(newest.successor("hijacked"), &intruder)
        .with_public_key(private_key.public_key());
    let resolution = resolver.resolve(Some(&newest), hijack);
    assert_eq!(resolution.reason(), Some(&RejectReason::BadSignature));
}

#[test]
fn stored_records_survive_serialization() {
    let private_key = PrivateKey::new();
    let raw = sign(
        RawRecord::new(vec![0u8, 159, 255]).with_salt("bytes").with_seq(2),
        &private_key,
    );
    let record = normalize(raw).unwrap();

    let json = serde_json::to_string(&record).unwrap();
    let restored: MutableRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, record);

    // Restored records still resolve with their signature intact
    let resolution = Resolver::new(Ed25519Verifier).resolve(None, &restored);
    assert!(resolution.is_accepted());
}
