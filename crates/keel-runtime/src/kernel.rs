//! The policy kernel facade.
//!
//! One handle owning the primary core, the backup, the verifier and the
//! anchor registry, exposing the full lifecycle: anchor, attest, gate,
//! verify, restore. The kernel fails closed: while its trust state is
//! faulted, every gate call is refused until a verification pass comes
//! back clean.

use crate::error::{KernelError, RestoreError};
use crate::restore::{self, RestorationEvent};
use keel_crypto::{CryptoEngine, Digest};
use keel_gate::{evaluate, ActionDescriptor, Verdict};
use keel_policy::{Policy, PolicyCore};
use keel_verify::{Attestation, IntegrityVerifier, SystemVerdict, UnitAnchor, UnitId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};

/// Kernel tuning knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Restoration events retained in the fault log; the oldest entry
    /// is dropped first once the limit is reached.
    pub fault_log_limit: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self { fault_log_limit: 32 }
    }
}

/// Trust state of the kernel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityState {
    /// Gate evaluations flow.
    Trusted,
    /// Gate evaluations are refused until a verification pass returns
    /// `Verified` again. Restoration alone does not leave this state.
    Faulted(SystemVerdict),
}

impl IntegrityState {
    pub fn is_trusted(&self) -> bool {
        matches!(self, Self::Trusted)
    }
}

/// Registry slot for one anchored unit.
#[derive(Clone, Debug)]
struct AnchorEntry {
    anchor: UnitAnchor,
    state_digest: Digest,
    /// Set by restoration, cleared by re-anchoring. A stale unit is
    /// reported compromised even when its lineage still checks out,
    /// because the restored core can carry the same content hash a
    /// forged record claimed.
    stale: bool,
}

/// Owner of the primary core, its backup and all verification state.
///
/// All methods take `&self`; the kernel is shared across threads as-is
/// or behind an `Arc`. Interior locks guard each piece of state, and
/// core replacement is a single pointer swap: a handle cloned out
/// before a restoration keeps observing the old core consistently.
#[derive(Debug)]
pub struct PolicyKernel {
    core: RwLock<Arc<PolicyCore>>,
    backup: Arc<PolicyCore>,
    verifier: Mutex<IntegrityVerifier>,
    registry: RwLock<BTreeMap<UnitId, AnchorEntry>>,
    state: RwLock<IntegrityState>,
    fault_log: RwLock<Vec<RestorationEvent>>,
    config: KernelConfig,
}

impl PolicyKernel {
    /// Construct primary and backup as two independent cores over equal
    /// copies of the policy.
    pub fn new(
        policy: Policy,
        engine: &CryptoEngine,
        config: KernelConfig,
    ) -> Result<Self, KernelError> {
        let primary = PolicyCore::construct(policy.clone(), engine)?;
        let backup = PolicyCore::construct(policy, engine)?;
        Self::from_parts(primary, backup, config)
    }

    /// Assemble a kernel from already-constructed cores, typically ones
    /// loaded back from records.
    ///
    /// An invalid backup is rejected outright; a kernel whose only
    /// restoration source is known-bad should not start. An invalid
    /// primary is accepted and the kernel starts faulted, which is
    /// exactly the state restoration exists to heal.
    pub fn from_parts(
        primary: PolicyCore,
        backup: PolicyCore,
        config: KernelConfig,
    ) -> Result<Self, KernelError> {
        if !backup.validate() {
            return Err(KernelError::Restore(RestoreError::BackupCompromised));
        }
        let state = if primary.validate() {
            IntegrityState::Trusted
        } else {
            warn!("primary core failed self-validation at startup");
            IntegrityState::Faulted(SystemVerdict::CoreCompromised)
        };
        info!(
            content_hash = %primary.content_hash(),
            trusted = state.is_trusted(),
            "policy kernel assembled"
        );
        Ok(Self {
            core: RwLock::new(Arc::new(primary)),
            backup: Arc::new(backup),
            verifier: Mutex::new(IntegrityVerifier::new()),
            registry: RwLock::new(BTreeMap::new()),
            state: RwLock::new(state),
            fault_log: RwLock::new(Vec::new()),
            config,
        })
    }

    /// Clone out the current core handle.
    pub fn core_handle(&self) -> Arc<PolicyCore> {
        self.core.read().expect("lock not poisoned").clone()
    }

    /// The backup core. Never swapped for the lifetime of the kernel.
    pub fn backup_handle(&self) -> Arc<PolicyCore> {
        self.backup.clone()
    }

    /// Bind a new unit to the current core.
    ///
    /// Anchoring is a binding declaration, not a trust grant. It stays
    /// legal while the kernel is faulted so units coming up mid-incident
    /// can register; trust still flows only from a verified pass.
    pub fn anchor(
        &self,
        unit_id: UnitId,
        state_digest: Digest,
    ) -> Result<UnitAnchor, KernelError> {
        let core = self.core_handle();
        let mut registry = self.registry.write().expect("lock not poisoned");
        if registry.contains_key(&unit_id) {
            return Err(KernelError::DuplicateUnit(unit_id));
        }
        let anchor = UnitAnchor::anchor(unit_id.clone(), &core, &state_digest);
        registry.insert(
            unit_id,
            AnchorEntry {
                anchor: anchor.clone(),
                state_digest,
                stale: false,
            },
        );
        drop(registry);
        // The anchor set changed legitimately; the next pass captures a
        // fresh baseline instead of reporting a mismatch.
        self.verifier
            .lock()
            .expect("lock not poisoned")
            .reset_baseline();
        Ok(anchor)
    }

    /// Replace a registered unit's anchor. The mandatory step after a
    /// restoration, and the only sanctioned way to declare a new local
    /// state.
    pub fn reanchor(
        &self,
        unit_id: UnitId,
        state_digest: Digest,
    ) -> Result<UnitAnchor, KernelError> {
        let core = self.core_handle();
        let mut registry = self.registry.write().expect("lock not poisoned");
        if !registry.contains_key(&unit_id) {
            return Err(KernelError::UnknownUnit(unit_id));
        }
        let anchor = UnitAnchor::anchor(unit_id.clone(), &core, &state_digest);
        registry.insert(
            unit_id,
            AnchorEntry {
                anchor: anchor.clone(),
                state_digest,
                stale: false,
            },
        );
        drop(registry);
        self.verifier
            .lock()
            .expect("lock not poisoned")
            .reset_baseline();
        Ok(anchor)
    }

    /// A unit's self-check: does its current local state still match
    /// its anchored lineage under the current core?
    pub fn attest(
        &self,
        unit_id: &UnitId,
        state_digest: &Digest,
    ) -> Result<bool, KernelError> {
        let core = self.core_handle();
        let registry = self.registry.read().expect("lock not poisoned");
        let entry = registry
            .get(unit_id)
            .ok_or_else(|| KernelError::UnknownUnit(unit_id.clone()))?;
        Ok(entry.anchor.revalidate(&core, state_digest))
    }

    /// Evaluate an action against the current core.
    ///
    /// Fails closed: while the kernel is faulted every call returns
    /// `IntegrityFault`, including for actions that would be denied
    /// anyway. A denied verdict is a normal `Ok` outcome.
    pub fn gate(&self, action: &ActionDescriptor) -> Result<Verdict, KernelError> {
        let state = self.state.read().expect("lock not poisoned").clone();
        if let IntegrityState::Faulted(verdict) = state {
            return Err(KernelError::IntegrityFault(verdict));
        }
        let core = self.core_handle();
        Ok(evaluate(&core, action))
    }

    /// Run one full verification pass and update the trust state.
    ///
    /// Units left stale by a restoration are reported compromised ahead
    /// of the cryptographic pass; everything else goes through the
    /// verifier tiers. A clean pass moves the kernel back to trusted.
    pub fn verify(&self) -> SystemVerdict {
        // Holding the verifier for the whole pass serializes it against
        // concurrent restorations.
        let mut verifier = self.verifier.lock().expect("lock not poisoned");
        let core = self.core_handle();

        let (stale_unit, attestations) = {
            let registry = self.registry.read().expect("lock not poisoned");
            let stale = registry
                .values()
                .find(|entry| entry.stale)
                .map(|entry| entry.anchor.unit_id().clone());
            let attestations: Vec<Attestation> = registry
                .values()
                .map(|entry| {
                    Attestation::new(entry.anchor.clone(), entry.state_digest.clone())
                })
                .collect();
            (stale, attestations)
        };

        let verdict = if let Some(unit_id) = stale_unit {
            warn!(unit_id = %unit_id, "unit not re-anchored since restoration");
            SystemVerdict::AnchorCompromised(unit_id)
        } else {
            verifier.verify_system(&core, &attestations)
        };

        *self.state.write().expect("lock not poisoned") = if verdict.is_verified() {
            IntegrityState::Trusted
        } else {
            IntegrityState::Faulted(verdict.clone())
        };
        debug!(verdict = %verdict, "verification pass complete");
        verdict
    }

    /// Swap in a fresh core from the backup.
    ///
    /// Legal only while faulted. On success every registered unit is
    /// marked stale and the baseline is reset; the kernel stays faulted
    /// until a subsequent [`verify`](Self::verify) comes back clean.
    /// Replacement is one pointer swap; readers observe either the old
    /// core or the new one, never a mix.
    pub fn request_restore(&self) -> Result<Arc<PolicyCore>, KernelError> {
        let mut verifier = self.verifier.lock().expect("lock not poisoned");

        let fault = match &*self.state.read().expect("lock not poisoned") {
            IntegrityState::Trusted => {
                return Err(KernelError::Restore(RestoreError::NotFaulted))
            }
            IntegrityState::Faulted(verdict) => verdict.clone(),
        };

        let (restored, event) = restore::restore(&fault, &self.backup)?;
        let restored = Arc::new(restored);

        *self.core.write().expect("lock not poisoned") = restored.clone();
        {
            let mut registry = self.registry.write().expect("lock not poisoned");
            for entry in registry.values_mut() {
                entry.stale = true;
            }
        }
        verifier.reset_baseline();

        {
            let mut log = self.fault_log.write().expect("lock not poisoned");
            log.push(event);
            if log.len() > self.config.fault_log_limit {
                log.remove(0);
            }
        }
        info!(
            restored_hash = %restored.content_hash(),
            "restoration complete; anchored units must re-anchor"
        );
        Ok(restored)
    }

    /// Current trust state.
    pub fn integrity_state(&self) -> IntegrityState {
        self.state.read().expect("lock not poisoned").clone()
    }

    /// All retained restoration events, oldest first.
    pub fn fault_log(&self) -> Vec<RestorationEvent> {
        self.fault_log.read().expect("lock not poisoned").clone()
    }

    /// The most recent restoration, if any survives the log bound.
    pub fn last_fault(&self) -> Option<RestorationEvent> {
        self.fault_log
            .read()
            .expect("lock not poisoned")
            .last()
            .cloned()
    }

    /// Number of anchored units.
    pub fn unit_count(&self) -> usize {
        self.registry.read().expect("lock not poisoned").len()
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }
}
