//! Adversarial test: core substitution and registry manipulation.
//!
//! A swapped core must be blamed by the verifier unless it is
//! semantically identical, in which case key pinning at the record
//! loader is the layer that catches the substitution.

use keel_crypto::{CryptoEngine, Digest};
use keel_policy::{Policy, PolicyCore, PolicyError};
use keel_verify::{Attestation, IntegrityVerifier, SystemVerdict, UnitAnchor, UnitId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn base_policy() -> Policy {
    Policy::builder()
        .rule("no harm to humans")
        .curiosity(0.5)
        .build()
        .unwrap()
}

fn anchored_system(
    core: &PolicyCore,
    units: &[(&str, &[u8])],
) -> Vec<Attestation> {
    units
        .iter()
        .map(|(id, state)| {
            let digest = Digest::hash(state);
            let anchor = UnitAnchor::anchor(UnitId::new(*id), core, &digest);
            Attestation::new(anchor, digest)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn core_with_different_rules_is_blamed_through_the_anchors() {
    let engine = CryptoEngine::generate();
    let original = PolicyCore::construct(base_policy(), &engine).unwrap();
    let attestations = anchored_system(&original, &[("motor", b"m"), ("sensor", b"s")]);

    let mut verifier = IntegrityVerifier::new();
    assert_eq!(
        verifier.verify_system(&original, &attestations),
        SystemVerdict::Verified
    );

    // Swap in a core whose policy gained a rule. Its own signature is
    // fine, so the core tier passes; the lineage tier catches the swap.
    let expanded = Policy::builder()
        .rule("no harm to humans")
        .rule("no unsupervised network access")
        .curiosity(0.5)
        .build()
        .unwrap();
    let swapped = PolicyCore::construct(expanded, &engine).unwrap();
    assert!(swapped.validate());

    match verifier.verify_system(&swapped, &attestations) {
        SystemVerdict::AnchorCompromised(id) => assert_eq!(id.as_str(), "motor"),
        other => panic!("expected anchor blame, got {other:?}"),
    }
}

#[test]
fn semantically_identical_swap_is_caught_by_key_pinning() {
    let ours = CryptoEngine::generate();
    let theirs = CryptoEngine::generate();
    let original = PolicyCore::construct(base_policy(), &ours).unwrap();
    let attestations = anchored_system(&original, &[("motor", b"m")]);

    // Same policy signed by a stranger: identical content hash, so the
    // lineage tier has nothing to object to.
    let imposter = PolicyCore::construct(base_policy(), &theirs).unwrap();
    assert_eq!(imposter.content_hash(), original.content_hash());

    let mut verifier = IntegrityVerifier::new();
    assert_eq!(
        verifier.verify_system(&imposter, &attestations),
        SystemVerdict::Verified
    );

    // The loader is the layer that refuses the stranger's record.
    let record = imposter.to_record().unwrap();
    let err = PolicyCore::from_record(&record, &ours.public_key()).unwrap_err();
    assert!(matches!(err, PolicyError::UntrustedKey));
}

#[test]
fn silently_removed_unit_trips_the_system_hash() {
    let engine = CryptoEngine::generate();
    let core = PolicyCore::construct(base_policy(), &engine).unwrap();
    let attestations =
        anchored_system(&core, &[("motor", b"m"), ("sensor", b"s"), ("planner", b"p")]);

    let mut verifier = IntegrityVerifier::new();
    assert_eq!(
        verifier.verify_system(&core, &attestations),
        SystemVerdict::Verified
    );

    let shrunk: Vec<Attestation> = attestations[..2].to_vec();
    assert_eq!(
        verifier.verify_system(&core, &shrunk),
        SystemVerdict::SystemHashMismatch
    );
}

#[test]
fn silently_added_unit_trips_the_system_hash() {
    let engine = CryptoEngine::generate();
    let core = PolicyCore::construct(base_policy(), &engine).unwrap();
    let attestations = anchored_system(&core, &[("motor", b"m")]);

    let mut verifier = IntegrityVerifier::new();
    assert_eq!(
        verifier.verify_system(&core, &attestations),
        SystemVerdict::Verified
    );

    let mut grown = attestations.clone();
    grown.extend(anchored_system(&core, &[("stowaway", b"x")]));
    assert_eq!(
        verifier.verify_system(&core, &grown),
        SystemVerdict::SystemHashMismatch
    );
}

#[test]
fn drifted_attestation_is_blamed_not_the_system_hash() {
    let engine = CryptoEngine::generate();
    let core = PolicyCore::construct(base_policy(), &engine).unwrap();
    let mut attestations = anchored_system(&core, &[("motor", b"m"), ("sensor", b"s")]);

    let mut verifier = IntegrityVerifier::new();
    assert_eq!(
        verifier.verify_system(&core, &attestations),
        SystemVerdict::Verified
    );

    // The unit's state moved out from under its anchor.
    attestations[1] = Attestation::new(
        attestations[1].anchor.clone(),
        Digest::hash(b"tampered state"),
    );
    match verifier.verify_system(&core, &attestations) {
        SystemVerdict::AnchorCompromised(id) => assert_eq!(id.as_str(), "sensor"),
        other => panic!("expected anchor blame, got {other:?}"),
    }
}

#[test]
fn failed_pass_never_ratchets_the_baseline() {
    let engine = CryptoEngine::generate();
    let core = PolicyCore::construct(base_policy(), &engine).unwrap();
    let attestations = anchored_system(&core, &[("motor", b"m")]);

    let mut verifier = IntegrityVerifier::new();
    assert_eq!(
        verifier.verify_system(&core, &attestations),
        SystemVerdict::Verified
    );
    let baseline = verifier.baseline().cloned();

    // An attacker growing the set must not teach the verifier the new
    // shape just by failing a pass.
    let mut grown = attestations.clone();
    grown.extend(anchored_system(&core, &[("stowaway", b"x")]));
    assert_eq!(
        verifier.verify_system(&core, &grown),
        SystemVerdict::SystemHashMismatch
    );
    assert_eq!(verifier.baseline().cloned(), baseline);

    // The legitimate set still verifies afterwards.
    assert_eq!(
        verifier.verify_system(&core, &attestations),
        SystemVerdict::Verified
    );
}
