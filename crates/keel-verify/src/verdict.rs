use crate::anchor::UnitId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one full system verification pass.
///
/// Ordered by detection tier: the first failing tier names the verdict
/// and later tiers are not consulted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemVerdict {
    /// Every tier passed; the baseline has advanced.
    Verified,
    /// The policy core failed self-validation.
    CoreCompromised,
    /// The named unit's anchor failed revalidation, or the unit has not
    /// re-anchored since a restoration.
    AnchorCompromised(UnitId),
    /// Core and anchors passed individually, but the combined system
    /// hash does not match the captured baseline.
    SystemHashMismatch,
}

impl SystemVerdict {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }
}

impl fmt::Display for SystemVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Verified => write!(f, "verified"),
            Self::CoreCompromised => write!(f, "core compromised"),
            Self::AnchorCompromised(id) => write!(f, "anchor compromised: {}", id),
            Self::SystemHashMismatch => write!(f, "system hash mismatch"),
        }
    }
}
