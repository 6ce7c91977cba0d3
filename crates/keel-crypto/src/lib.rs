#![deny(unsafe_code)]
//! # keel-crypto
//!
//! Cryptographic engine for the Keel policy kernel: Ed25519 keypairs and
//! signatures, BLAKE3 content digests.
//!
//! Guarantees:
//! - Signing key material never leaves [`CryptoEngine`]; seed copies are
//!   zeroized on drop
//! - Verification is total: malformed keys, malformed signatures, and
//!   mismatches all verify as `false`, never as an error
//! - One digest algorithm for every hash the kernel compares

pub mod digest;
pub mod engine;
pub mod error;
pub mod keys;

pub use digest::{Digest, DigestParseError};
pub use engine::{verify_signature, CryptoEngine};
pub use error::CryptoError;
pub use keys::{KeyParseError, PublicKey, SignatureBytes};
