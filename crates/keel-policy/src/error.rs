use keel_crypto::CryptoError;
use thiserror::Error;

/// Construction-class policy failures.
///
/// Everything here surfaces at build or load time. Tamper evidence on an
/// already-constructed core is reported by `PolicyCore::validate` as a
/// plain `false`, never through this enum.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// Curiosity must lie in `[0.0, 1.0]`; NaN is rejected.
    #[error("curiosity out of range: {0} (expected 0.0..=1.0)")]
    CuriosityOutOfRange(f64),

    /// Canonical serialization failed.
    #[error("canonical serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored record's policy text does not parse.
    #[error("malformed policy record: {0}")]
    MalformedRecord(String),

    /// A stored record carries a verifying key other than the trust
    /// anchor supplied by the loader.
    #[error("record verifying key does not match the trusted key")]
    UntrustedKey,

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
