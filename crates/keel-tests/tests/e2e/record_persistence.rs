//! End-to-end test: durable records across process boundaries.
//!
//! Verifies that:
//! - A record survives JSON round-trips with trust intact
//! - A whole kernel can be rebuilt from reloaded records
//! - Key pinning rejects records signed by strangers
//! - Seeded engines reproduce byte-identical records

use keel_crypto::CryptoEngine;
use keel_gate::ActionDescriptor;
use keel_policy::{Policy, PolicyCore, PolicyError, PolicyRecord};
use keel_runtime::{KernelConfig, PolicyKernel};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn archival_policy() -> Policy {
    Policy::builder()
        .rule("no harm to humans")
        .humanitarian_enhanced(true)
        .curiosity(0.25)
        .trait_tag("archival")
        .build()
        .unwrap()
}

fn signed_core(engine: &CryptoEngine) -> PolicyCore {
    PolicyCore::construct(archival_policy(), engine).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn record_survives_json_round_trip() {
    let engine = CryptoEngine::generate();
    let core = signed_core(&engine);

    let json = core.to_record().unwrap().to_json().unwrap();
    let record = PolicyRecord::from_json(&json).unwrap();
    let reloaded = PolicyCore::from_record(&record, core.public_key()).unwrap();

    assert!(reloaded.validate());
    assert_eq!(reloaded.content_hash(), core.content_hash());
    assert_eq!(reloaded.policy(), core.policy());
}

#[test]
fn canonical_text_is_sorted_json() {
    let engine = CryptoEngine::generate();
    let record = signed_core(&engine).to_record().unwrap();

    // Lexicographic keys are the compatibility contract for the hash.
    assert!(record.canonical.starts_with("{\"curiosity\":"));
    let value: serde_json::Value = serde_json::from_str(&record.canonical).unwrap();
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn kernel_rebuilt_from_reloaded_records() {
    let engine = CryptoEngine::generate();
    let primary_record = signed_core(&engine).to_record().unwrap();
    let backup_record = signed_core(&engine).to_record().unwrap();
    let trusted_key = engine.public_key();

    let primary = PolicyCore::from_record(&primary_record, &trusted_key).unwrap();
    let backup = PolicyCore::from_record(&backup_record, &trusted_key).unwrap();
    let kernel = PolicyKernel::from_parts(primary, backup, KernelConfig::default()).unwrap();

    assert!(kernel.integrity_state().is_trusted());
    let verdict = kernel
        .gate(&ActionDescriptor::builder("survey").effect("scan").build())
        .unwrap();
    assert!(verdict.allowed);
}

#[test]
fn record_from_a_stranger_is_rejected() {
    let ours = CryptoEngine::generate();
    let theirs = CryptoEngine::generate();

    let record = signed_core(&theirs).to_record().unwrap();
    let err = PolicyCore::from_record(&record, &ours.public_key()).unwrap_err();
    assert!(matches!(err, PolicyError::UntrustedKey));
}

#[test]
fn seeded_engines_reproduce_identical_records() {
    let seed = [7u8; 32];
    let first = signed_core(&CryptoEngine::from_seed(seed)).to_record().unwrap();
    let second = signed_core(&CryptoEngine::from_seed(seed)).to_record().unwrap();

    assert_eq!(first.canonical, second.canonical);
    assert_eq!(first.content_hash, second.content_hash);
    assert_eq!(first.signature, second.signature);
    assert_eq!(first.public_key, second.public_key);
}

#[test]
fn verify_only_holder_can_check_but_not_sign() {
    let signer = CryptoEngine::generate();
    let core = signed_core(&signer);

    let auditor = CryptoEngine::verify_only(core.public_key()).unwrap();
    assert!(!auditor.can_sign());
    assert!(PolicyCore::construct(archival_policy(), &auditor).is_err());

    // Validation needs no key material beyond the record itself.
    let record = core.to_record().unwrap();
    let reloaded = PolicyCore::from_record(&record, &auditor.public_key()).unwrap();
    assert!(reloaded.validate());
}
