//! Restoration from the backup core.
//!
//! Restoration is all-or-nothing. Nothing is salvaged from the
//! compromised core and no partial repair is attempted: the backup
//! either validates and replaces the primary wholesale, or the kernel
//! stays faulted.

use crate::error::RestoreError;
use keel_crypto::Digest;
use keel_policy::PolicyCore;
use keel_verify::SystemVerdict;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;
use uuid::Uuid;

/// Audit record of one restoration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RestorationEvent {
    /// Random v4 id, unique per restoration.
    pub event_id: String,
    /// The verdict that triggered the swap.
    pub fault: SystemVerdict,
    /// Content hash of the core swapped in.
    pub restored_hash: Digest,
    pub occurred_at_ms: u64,
}

/// Produce a replacement core from the backup.
///
/// Preconditions enforced here: the triggering verdict must be a fault,
/// and the backup must still pass its own validation. The returned core
/// is an independent instance carrying the backup's policy and
/// signature; callers publish it however they hold the primary.
pub fn restore(
    fault: &SystemVerdict,
    backup: &PolicyCore,
) -> Result<(PolicyCore, RestorationEvent), RestoreError> {
    if fault.is_verified() {
        return Err(RestoreError::NotFaulted);
    }
    if !backup.validate() {
        warn!("backup core failed self-validation; restoration refused");
        return Err(RestoreError::BackupCompromised);
    }

    let restored = backup.clone();
    let event = RestorationEvent {
        event_id: Uuid::new_v4().to_string(),
        fault: fault.clone(),
        restored_hash: restored.content_hash().clone(),
        occurred_at_ms: now_ms(),
    };
    warn!(
        event_id = %event.event_id,
        fault = %event.fault,
        restored_hash = %event.restored_hash,
        "core restored from backup"
    );
    Ok((restored, event))
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock")
        .as_millis() as u64
}
