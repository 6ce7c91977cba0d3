#![deny(unsafe_code)]
//! # keel-gate
//!
//! The pure action gate.
//!
//! - [`ActionDescriptor`]: immutable, order-independent description of a
//!   proposed action
//! - [`evaluate`]: fixed-order policy checks (harm patterns, replication,
//!   respect for life); deterministic, with no I/O and no clock access
//! - [`Verdict`]: allow/deny, the reason, and an audit hash binding the
//!   decision to the exact policy and action
//!
//! A denial is a normal outcome, not an error; the gate has no error type.

pub mod action;
pub mod evaluator;
pub mod verdict;

pub use action::{ActionBuilder, ActionDescriptor, ActionValue};
pub use evaluator::evaluate;
pub use verdict::{GateReason, Verdict};
