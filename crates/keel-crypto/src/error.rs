use thiserror::Error;

/// Errors from the cryptographic engine.
///
/// These are construction-class failures. Verification never produces an
/// error: it reports `false` (see [`crate::verify_signature`]).
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The engine holds no signing key (built with `verify_only`).
    #[error("signing key unavailable")]
    KeyUnavailable,

    /// Key bytes do not decode to a valid Ed25519 point.
    #[error("invalid public key bytes")]
    InvalidPublicKey,
}
