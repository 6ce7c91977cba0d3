use keel_crypto::Digest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the gate decided the way it did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateReason {
    /// No check fired.
    Permitted,
    /// An effect string matched a harm pattern derived from the rules.
    HarmEffect { rule: String, effect: String },
    /// The policy forbids self-replication and the action declares one.
    ReplicationDenied,
    /// The policy demands respect for life and the action declares none.
    LifeDisrespected,
}

impl fmt::Display for GateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permitted => write!(f, "permitted"),
            Self::HarmEffect { rule, effect } => {
                write!(f, "harm effect: {:?} matched rule {:?}", effect, rule)
            }
            Self::ReplicationDenied => write!(f, "replication denied"),
            Self::LifeDisrespected => write!(f, "life disrespected"),
        }
    }
}

/// A gate decision plus the audit hash that makes it reproducible.
///
/// `audit_hash = blake3(content_hash || canonical(action))`, computed on
/// every outcome. A logged hash is enough to tie a decision back to the
/// exact policy and action without storing either.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub allowed: bool,
    pub reason: GateReason,
    pub audit_hash: Digest,
}

impl Verdict {
    pub fn is_denied(&self) -> bool {
        !self.allowed
    }
}
