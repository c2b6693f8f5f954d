//! A minimal example showing how a node decides which version of a mutable item to keep.
//!
//! We publish a salted item, update it with a signed successor and finally try to replay an
//! outdated version, which the resolver rejects.
use bep44::test_utils::{PrivateKey, setup_logging, sign};
use bep44::{Ed25519Verifier, RawRecord, Resolver, bytes_to_text};

fn main() {
    // Run with `RUST_LOG=bep44=trace` to see why candidates get accepted or rejected.
    setup_logging();

    // Create a new Ed25519 signing key, its public key identifies the item together with the salt.
    let private_key = PrivateKey::new();
    let resolver = Resolver::new(Ed25519Verifier);

    // There is no current record yet, so any signed candidate with a valid value wins.
    let first = sign(
        RawRecord::new("Hello, Sloth!").with_salt("greeting"),
        &private_key,
    );
    let current = resolver.resolve(None, first).into_record();
    println!(
        "seq {}: {}",
        current.seq(),
        bytes_to_text(current.value())
    );

    // Updates increment the sequence number and expect the current one via "cas".
    let update = sign(current.successor("Hello, Panda!"), &private_key);
    let updated = resolver.resolve(Some(&current), update).into_record();
    println!(
        "seq {}: {}",
        updated.seq(),
        bytes_to_text(updated.value())
    );

    // Replaying the first version does not roll the item back.
    let replay = sign(RawRecord::from(&current), &private_key);
    let resolution = resolver.resolve(Some(&updated), replay);
    if let Some(reason) = resolution.reason() {
        println!("replay rejected: {reason}");
    }
    assert_eq!(resolution.record(), &updated);
}
