#![deny(unsafe_code)]
//! # keel-policy
//!
//! The policy value and its cryptographic binding.
//!
//! - [`Policy`]: frozen value holding named rules, protective flags,
//!   bounded curiosity, and trait tags; built once, never mutated
//! - [`canonical`]: the deterministic byte form that hashing and signing
//!   operate on; a compatibility contract
//! - [`PolicyCore`]: policy + BLAKE3 content hash + Ed25519 signature,
//!   bound at construction; `validate()` recomputes and compares
//! - [`PolicyRecord`]: the durable signed form; reloading yields a core
//!   that validates identically

pub mod canonical;
pub mod core;
pub mod error;
pub mod policy;
pub mod record;

pub use crate::core::PolicyCore;
pub use error::PolicyError;
pub use policy::{Policy, PolicyBuilder};
pub use record::PolicyRecord;
