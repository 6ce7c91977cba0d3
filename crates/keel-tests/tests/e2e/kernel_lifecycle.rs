//! End-to-end test: the healthy kernel lifecycle.
//!
//! Verifies that:
//! - A freshly constructed kernel is trusted and verifies clean
//! - Anchoring, attestation and gating compose across the crates
//! - Verdicts are deterministic and every outcome carries an audit hash

use keel_crypto::{CryptoEngine, Digest};
use keel_gate::{ActionDescriptor, GateReason};
use keel_policy::Policy;
use keel_runtime::{KernelConfig, PolicyKernel};
use keel_verify::{SystemVerdict, UnitId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn conservative_policy() -> Policy {
    Policy::builder()
        .rule("no harm to humans")
        .rule("no deception")
        .curiosity(0.4)
        .trait_tag("cautious")
        .build()
        .unwrap()
}

fn fresh_kernel() -> PolicyKernel {
    let engine = CryptoEngine::generate();
    PolicyKernel::new(conservative_policy(), &engine, KernelConfig::default()).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn fresh_kernel_is_trusted_and_verifies() {
    let kernel = fresh_kernel();
    assert!(kernel.integrity_state().is_trusted());
    assert!(kernel.core_handle().validate());
    assert_eq!(kernel.verify(), SystemVerdict::Verified);
}

#[test]
fn full_lifecycle_anchor_gate_verify() {
    let kernel = fresh_kernel();

    for (id, state) in [
        ("motor", b"velocity=0".as_slice()),
        ("sensor", b"lidar=ready".as_slice()),
        ("planner", b"route=[]".as_slice()),
    ] {
        kernel.anchor(UnitId::new(id), Digest::hash(state)).unwrap();
    }
    assert_eq!(kernel.unit_count(), 3);
    assert_eq!(kernel.verify(), SystemVerdict::Verified);

    let benign = ActionDescriptor::builder("survey")
        .effect("scan terrain")
        .build();
    let verdict = kernel.gate(&benign).unwrap();
    assert!(verdict.allowed);
    assert_eq!(verdict.reason, GateReason::Permitted);

    let replicate = ActionDescriptor::builder("fork")
        .effect("copy self to node 2")
        .is_replication(true)
        .build();
    let verdict = kernel.gate(&replicate).unwrap();
    assert!(verdict.is_denied());
    assert_eq!(verdict.reason, GateReason::ReplicationDenied);

    // Gating never disturbs verification.
    assert_eq!(kernel.verify(), SystemVerdict::Verified);
}

#[test]
fn attestation_tracks_unit_state() {
    let kernel = fresh_kernel();
    let motor = UnitId::new("motor");
    let calibrated = Digest::hash(b"calibration=done");

    kernel.anchor(motor.clone(), calibrated.clone()).unwrap();
    assert!(kernel.attest(&motor, &calibrated).unwrap());
    assert!(!kernel.attest(&motor, &Digest::hash(b"drifted")).unwrap());

    // Declaring the new state through the API repairs the attestation.
    let drifted = Digest::hash(b"drifted");
    kernel.reanchor(motor.clone(), drifted.clone()).unwrap();
    assert!(kernel.attest(&motor, &drifted).unwrap());
    assert_eq!(kernel.verify(), SystemVerdict::Verified);
}

#[test]
fn unit_registry_rejects_duplicates_and_unknowns() {
    let kernel = fresh_kernel();
    let digest = Digest::hash(b"state");

    kernel.anchor(UnitId::new("motor"), digest.clone()).unwrap();
    assert!(kernel.anchor(UnitId::new("motor"), digest.clone()).is_err());
    assert!(kernel.reanchor(UnitId::new("ghost"), digest.clone()).is_err());
    assert!(kernel.attest(&UnitId::new("ghost"), &digest).is_err());
}

#[test]
fn verdicts_are_deterministic_with_audit_hashes() {
    let kernel = fresh_kernel();
    let action = ActionDescriptor::builder("survey")
        .effect("scan terrain")
        .detail("sector", "4")
        .build();

    let first = kernel.gate(&action).unwrap();
    let second = kernel.gate(&action).unwrap();
    assert_eq!(first, second);
    assert_ne!(first.audit_hash, Digest::zero());

    // A different action leaves a different trail.
    let other = ActionDescriptor::builder("survey")
        .effect("scan terrain")
        .detail("sector", "5")
        .build();
    assert_ne!(kernel.gate(&other).unwrap().audit_hash, first.audit_hash);
}

#[test]
fn policy_flags_flow_through_to_the_gate() {
    let engine = CryptoEngine::generate();
    let permissive = Policy::builder()
        .no_self_replication(false)
        .respects_all_life(false)
        .build()
        .unwrap();
    let kernel = PolicyKernel::new(permissive, &engine, KernelConfig::default()).unwrap();

    let replicate = ActionDescriptor::builder("fork")
        .is_replication(true)
        .respects_life(false)
        .build();
    assert!(kernel.gate(&replicate).unwrap().allowed);
}
