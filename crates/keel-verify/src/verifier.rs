use crate::anchor::UnitAnchor;
use crate::verdict::SystemVerdict;
use keel_crypto::Digest;
use keel_policy::PolicyCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A unit's anchor paired with its current local state digest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Attestation {
    pub anchor: UnitAnchor,
    pub state_digest: Digest,
}

impl Attestation {
    pub fn new(anchor: UnitAnchor, state_digest: Digest) -> Self {
        Self {
            anchor,
            state_digest,
        }
    }
}

/// Three-tier integrity check with a ratcheting baseline.
///
/// Tier order on every pass: core self-validation, per-unit anchor
/// revalidation in unit-id order, then the combined system hash against
/// the baseline captured on the previous successful pass. The baseline
/// only ever advances on success; a failed pass leaves it untouched.
#[derive(Debug, Default)]
pub struct IntegrityVerifier {
    baseline: Option<Digest>,
}

impl IntegrityVerifier {
    pub fn new() -> Self {
        Self { baseline: None }
    }

    /// Run one verification pass; on success the baseline advances to
    /// the recomputed system hash.
    pub fn verify_system(
        &mut self,
        core: &PolicyCore,
        attestations: &[Attestation],
    ) -> SystemVerdict {
        if !core.validate() {
            warn!("policy core failed self-validation");
            return SystemVerdict::CoreCompromised;
        }

        // Unit-id order so the blamed unit is deterministic when several
        // have drifted.
        let mut ordered: Vec<&Attestation> = attestations.iter().collect();
        ordered.sort_by(|a, b| a.anchor.unit_id().cmp(b.anchor.unit_id()));

        for att in &ordered {
            if !att.anchor.revalidate(core, &att.state_digest) {
                warn!(unit_id = %att.anchor.unit_id(), "anchor failed revalidation");
                return SystemVerdict::AnchorCompromised(att.anchor.unit_id().clone());
            }
        }

        let system_hash = system_hash(core, attestations);
        if let Some(baseline) = &self.baseline {
            if baseline != &system_hash {
                warn!(baseline = %baseline, recomputed = %system_hash, "system hash diverged");
                return SystemVerdict::SystemHashMismatch;
            }
        }

        debug!(system_hash = %system_hash, units = attestations.len(), "system verified");
        self.baseline = Some(system_hash);
        SystemVerdict::Verified
    }

    /// Forget the captured baseline.
    ///
    /// Called when the anchor set changes through a legitimate path
    /// (anchoring, re-anchoring, restoration) so the next pass captures
    /// fresh. Changes that bypass those paths between passes still trip
    /// `SystemHashMismatch`.
    pub fn reset_baseline(&mut self) {
        self.baseline = None;
    }

    pub fn baseline(&self) -> Option<&Digest> {
        self.baseline.as_ref()
    }
}

/// Combined hash over the core and every lineage. Lineages are folded in
/// sorted order, so the result is independent of attestation order but
/// sensitive to any addition, removal, or change.
fn system_hash(core: &PolicyCore, attestations: &[Attestation]) -> Digest {
    let mut lineages: Vec<&Digest> = attestations
        .iter()
        .map(|a| a.anchor.lineage_hash())
        .collect();
    lineages.sort();
    let mut parts: Vec<&[u8]> = Vec::with_capacity(lineages.len() + 1);
    parts.push(core.content_hash().as_bytes());
    for lineage in &lineages {
        parts.push(lineage.as_bytes());
    }
    Digest::hash_parts(&parts)
}
