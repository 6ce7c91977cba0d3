//! Error types for restoration and the kernel facade.

use keel_policy::PolicyError;
use keel_verify::{SystemVerdict, UnitId};
use thiserror::Error;

/// Failures from the restoration controller.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// Restoration is only legal after a non-verified verdict.
    #[error("restoration requested without an integrity fault")]
    NotFaulted,

    /// The backup itself fails self-validation. Swapping in a core that
    /// cannot be trusted would defeat the point; the kernel stays
    /// faulted instead.
    #[error("backup core failed self-validation")]
    BackupCompromised,
}

/// Failures from the kernel facade.
///
/// A denied gate verdict is not represented here; denial is a normal
/// outcome carried inside `Ok`.
#[derive(Debug, Error)]
pub enum KernelError {
    /// The kernel is faulted. Gate evaluations are refused until a
    /// verification pass returns `Verified` again.
    #[error("integrity fault: {0}")]
    IntegrityFault(SystemVerdict),

    #[error("unit already anchored: {0}")]
    DuplicateUnit(UnitId),

    #[error("unit never anchored: {0}")]
    UnknownUnit(UnitId),

    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("restore error: {0}")]
    Restore(#[from] RestoreError),
}
