#![deny(unsafe_code)]

//! # keel-runtime
//!
//! The operational layer over the verification primitives: restoration
//! from backup and the [`PolicyKernel`] facade that owns the whole
//! lifecycle.
//!
//! - [`PolicyKernel`] holds the primary core, the backup, the verifier
//!   and the anchor registry behind one shared handle.
//! - [`kernel::PolicyKernel::gate`] fails closed while the kernel is
//!   faulted; denial itself is a normal verdict, not an error.
//! - [`restore()`] swaps in the backup wholesale and never attempts a
//!   partial repair; re-anchoring afterwards is mandatory.

pub mod error;
pub mod kernel;
pub mod restore;

pub use error::{KernelError, RestoreError};
pub use kernel::{IntegrityState, KernelConfig, PolicyKernel};
pub use restore::{restore, RestorationEvent};
