use crate::canonical::to_canonical_bytes;
use crate::error::PolicyError;
use crate::policy::Policy;
use keel_crypto::{verify_signature, CryptoEngine, Digest, PublicKey, SignatureBytes};
use tracing::{debug, warn};

/// A policy bound to its content hash and signature.
///
/// `construct` computes the canonical bytes, hashes them, and signs them
/// exactly once; no field can be rebound afterward. A second core
/// independently constructed over an equal policy serves as the
/// restoration backup: same canonical bytes, same hash, and (Ed25519
/// signing being deterministic) the same signature under the same key.
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyCore {
    policy: Policy,
    content_hash: Digest,
    signature: SignatureBytes,
    public_key: PublicKey,
}

impl PolicyCore {
    /// Canonicalize, hash, sign, freeze.
    ///
    /// Fails with [`PolicyError::Crypto`] (`KeyUnavailable`) when the
    /// engine is verification-only.
    pub fn construct(policy: Policy, engine: &CryptoEngine) -> Result<Self, PolicyError> {
        let canonical = to_canonical_bytes(&policy)?;
        let content_hash = Digest::hash(&canonical);
        let signature = engine.sign(&canonical)?;
        debug!(content_hash = %content_hash, "policy core constructed");
        Ok(Self {
            policy,
            content_hash,
            signature,
            public_key: engine.public_key(),
        })
    }

    /// Assemble a core from already-bound parts (record loading).
    pub(crate) fn from_bound_parts(
        policy: Policy,
        content_hash: Digest,
        signature: SignatureBytes,
        public_key: PublicKey,
    ) -> Self {
        Self {
            policy,
            content_hash,
            signature,
            public_key,
        }
    }

    /// Recompute the canonical bytes from the held policy, recompute the
    /// hash, and verify the signature.
    ///
    /// Returns `false` on any mismatch, including a canonicalization
    /// failure; tamper evidence never rides an error path.
    pub fn validate(&self) -> bool {
        let Ok(canonical) = to_canonical_bytes(&self.policy) else {
            warn!("canonicalization failed during validation");
            return false;
        };
        let recomputed = Digest::hash(&canonical);
        if recomputed != self.content_hash {
            warn!(stored = %self.content_hash, recomputed = %recomputed, "content hash mismatch");
            return false;
        }
        if !verify_signature(&self.signature, &canonical, &self.public_key) {
            warn!(content_hash = %self.content_hash, "signature check failed");
            return false;
        }
        true
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn content_hash(&self) -> &Digest {
        &self.content_hash
    }

    pub fn signature(&self) -> &SignatureBytes {
        &self.signature
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}
