use keel_crypto::Digest;
use keel_policy::PolicyCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Identifier of an anchored processing unit.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit's frozen binding to the policy core.
///
/// The lineage hash folds the unit's local state digest into the core's
/// content hash, captured once when the unit comes up. A unit whose core
/// or local state has drifted fails [`UnitAnchor::revalidate`] from then
/// on; re-anchoring is the only way forward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAnchor {
    unit_id: UnitId,
    lineage_hash: Digest,
    anchored_at_ms: u64,
}

impl UnitAnchor {
    /// Bind a unit to the given core.
    pub fn anchor(unit_id: UnitId, core: &PolicyCore, state_digest: &Digest) -> Self {
        let lineage_hash = lineage(state_digest, core);
        debug!(unit_id = %unit_id, lineage = %lineage_hash, "unit anchored");
        Self {
            unit_id,
            lineage_hash,
            anchored_at_ms: now_ms(),
        }
    }

    /// Recompute the lineage hash from current inputs and compare.
    ///
    /// False whenever the core's content hash or the unit's local state
    /// digest differs from what was anchored. Note the binding is to the
    /// core's *content hash*, not the instance: a distinct core holding
    /// an equal policy revalidates successfully.
    pub fn revalidate(&self, core: &PolicyCore, state_digest: &Digest) -> bool {
        lineage(state_digest, core) == self.lineage_hash
    }

    pub fn unit_id(&self) -> &UnitId {
        &self.unit_id
    }

    pub fn lineage_hash(&self) -> &Digest {
        &self.lineage_hash
    }

    pub fn anchored_at_ms(&self) -> u64 {
        self.anchored_at_ms
    }
}

fn lineage(state_digest: &Digest, core: &PolicyCore) -> Digest {
    Digest::hash_parts(&[state_digest.as_bytes(), core.content_hash().as_bytes()])
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock")
        .as_millis() as u64
}
