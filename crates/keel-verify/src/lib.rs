#![deny(unsafe_code)]
//! # keel-verify
//!
//! Unit anchors and the system integrity verifier.
//!
//! - [`UnitAnchor`]: a processing unit's frozen binding to the policy
//!   core, `lineage = blake3(state_digest || content_hash)`
//! - [`IntegrityVerifier`]: three tiers per pass (core self-validation,
//!   then anchor revalidation, then the combined system hash against a
//!   ratcheting baseline)
//! - [`SystemVerdict`]: the first failing tier names the verdict

pub mod anchor;
pub mod verdict;
pub mod verifier;

pub use anchor::{UnitAnchor, UnitId};
pub use verdict::SystemVerdict;
pub use verifier::{Attestation, IntegrityVerifier};
