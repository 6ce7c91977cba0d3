use crate::canonical::to_canonical_string;
use crate::core::PolicyCore;
use crate::error::PolicyError;
use crate::policy::Policy;
use keel_crypto::{Digest, PublicKey, SignatureBytes};
use serde::{Deserialize, Serialize};

/// Durable form of a constructed core: the canonical policy text plus the
/// hash, signature, and verifying key bound at construction.
///
/// The JSON layout of this struct, and of the canonical text inside it,
/// is a compatibility contract: changing either invalidates every stored
/// signature.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub canonical: String,
    pub content_hash: Digest,
    pub signature: SignatureBytes,
    pub public_key: PublicKey,
}

impl PolicyRecord {
    pub fn to_json(&self) -> Result<String, PolicyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PolicyError> {
        serde_json::from_str(json).map_err(|e| PolicyError::MalformedRecord(e.to_string()))
    }
}

impl PolicyCore {
    /// Snapshot the core into its durable record.
    pub fn to_record(&self) -> Result<PolicyRecord, PolicyError> {
        Ok(PolicyRecord {
            canonical: to_canonical_string(self.policy())?,
            content_hash: self.content_hash().clone(),
            signature: self.signature().clone(),
            public_key: self.public_key().clone(),
        })
    }

    /// Rebuild a core from its durable record.
    ///
    /// Hard failures are construction-class only: canonical text that
    /// does not parse as a policy (`MalformedRecord`), or a verifying key
    /// that differs from the caller's trust anchor (`UntrustedKey`;
    /// signatures cannot detect key substitution, so pinning is the
    /// loader's job). A record that parses but was tampered with loads
    /// successfully and then fails `validate()`; the stored hash and
    /// signature are kept as claimed, never recomputed over mutated text.
    pub fn from_record(record: &PolicyRecord, trusted_key: &PublicKey) -> Result<Self, PolicyError> {
        if &record.public_key != trusted_key {
            return Err(PolicyError::UntrustedKey);
        }
        let policy: Policy = serde_json::from_str(&record.canonical)
            .map_err(|e| PolicyError::MalformedRecord(e.to_string()))?;
        Ok(Self::from_bound_parts(
            policy,
            record.content_hash.clone(),
            record.signature.clone(),
            record.public_key.clone(),
        ))
    }
}
