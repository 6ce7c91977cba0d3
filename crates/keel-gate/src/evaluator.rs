use crate::action::ActionDescriptor;
use crate::verdict::{GateReason, Verdict};
use keel_crypto::Digest;
use keel_policy::canonical::to_canonical_bytes;
use keel_policy::PolicyCore;
use tracing::{debug, info};

/// Evaluate one action against the policy bound in `core`.
///
/// Pure and total: no clock, no randomness, no I/O; the same core and
/// action always produce the same verdict, audit hash included, so
/// results are cache-safe by `(content_hash, action)`. Checks run in a
/// fixed order and the first failure names the reason:
///
/// 1. harm patterns over `effects`
/// 2. replication, when the policy forbids it
/// 3. respect for life, when the policy demands it
pub fn evaluate(core: &PolicyCore, action: &ActionDescriptor) -> Verdict {
    let audit_hash = audit_hash(core, action);

    if let Some((rule, effect)) = first_harm_match(core, action) {
        info!(kind = action.kind(), rule = %rule, effect = %effect, audit = %audit_hash,
            "gate denied: harm effect");
        return Verdict {
            allowed: false,
            reason: GateReason::HarmEffect { rule, effect },
            audit_hash,
        };
    }

    if core.policy().no_self_replication() && action.is_replication() {
        info!(kind = action.kind(), audit = %audit_hash, "gate denied: replication");
        return Verdict {
            allowed: false,
            reason: GateReason::ReplicationDenied,
            audit_hash,
        };
    }

    if core.policy().respects_all_life() && !action.respects_life() {
        info!(kind = action.kind(), audit = %audit_hash, "gate denied: life disrespected");
        return Verdict {
            allowed: false,
            reason: GateReason::LifeDisrespected,
            audit_hash,
        };
    }

    debug!(kind = action.kind(), audit = %audit_hash, "gate permitted");
    Verdict {
        allowed: true,
        reason: GateReason::Permitted,
        audit_hash,
    }
}

fn audit_hash(core: &PolicyCore, action: &ActionDescriptor) -> Digest {
    let canonical = to_canonical_bytes(action).expect("serializable");
    Digest::hash_parts(&[core.content_hash().as_bytes(), &canonical])
}

/// Case-insensitive substring scan of `effects` against patterns derived
/// from the policy rules.
///
/// This matcher is the whole harm contract, deliberately simple and
/// applied in exactly one place: effects are scanned in declared order,
/// rules in sorted order, first match wins. `details` values are never
/// interpreted. The substring semantics are over-inclusive by design
/// ("pharmacy" contains "harm"); rule authors choose patterns with that
/// in mind.
fn first_harm_match(core: &PolicyCore, action: &ActionDescriptor) -> Option<(String, String)> {
    for effect in action.effects() {
        let lowered = effect.to_lowercase();
        for rule in core.policy().rules() {
            let Some(pattern) = harm_pattern(rule) else {
                continue;
            };
            if lowered.contains(&pattern) {
                return Some((rule.clone(), effect.clone()));
            }
        }
    }
    None
}

/// Deny pattern for a rule: the rule lowercased, minus one leading
/// `"no "` prefix when present ("no harm" guards against "harm"). A bare
/// rule is its own pattern; a rule that reduces to nothing yields none.
fn harm_pattern(rule: &str) -> Option<String> {
    let lowered = rule.trim().to_lowercase();
    let pattern = lowered.strip_prefix("no ").unwrap_or(&lowered).trim();
    if pattern.is_empty() {
        None
    } else {
        Some(pattern.to_string())
    }
}
