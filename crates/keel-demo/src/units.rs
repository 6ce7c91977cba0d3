//! Stub processing units for the keel demo.
//!
//! Each unit stands in for a subsystem that would hold an anchor in a
//! real deployment. Local state is plain bytes; the digest over those
//! bytes is what gets anchored, so mutating the state is how the demo
//! simulates drift and legitimate state changes.

use keel_crypto::Digest;
use keel_verify::UnitId;

/// An in-process processing unit with hashable local state.
pub struct StubUnit {
    id: UnitId,
    state: Vec<u8>,
}

impl StubUnit {
    /// Locomotion subsystem, idle at a fixed heading.
    pub fn motor() -> Self {
        Self::with_state("motor", b"velocity=0;heading=90")
    }

    /// Perception subsystem with both sensors ready.
    pub fn sensor() -> Self {
        Self::with_state("sensor", b"lidar=ready;camera=ready")
    }

    /// Route planner with an empty plan.
    pub fn planner() -> Self {
        Self::with_state("planner", b"route=[];horizon=12")
    }

    fn with_state(id: &str, state: &[u8]) -> Self {
        Self {
            id: UnitId::new(id),
            state: state.to_vec(),
        }
    }

    pub fn id(&self) -> &UnitId {
        &self.id
    }

    /// Digest over the unit's current local state.
    pub fn state_digest(&self) -> Digest {
        Digest::hash(&self.state)
    }

    /// Append to local state, as a subsystem would between anchor epochs.
    pub fn advance(&mut self, note: &str) {
        self.state.push(b';');
        self.state.extend_from_slice(note.as_bytes());
    }
}
