use crate::digest::Digest;
use crate::error::CryptoError;
use crate::keys::{PublicKey, SignatureBytes};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

/// Ed25519 signing and verification plus BLAKE3 hashing behind one handle.
///
/// The signing key never leaves the engine. Signing borrows `&self`, so a
/// shared engine serves concurrent callers without locking; the key is the
/// only sensitive state and it is write-once.
pub struct CryptoEngine {
    signing: Option<SigningKey>,
    verifying: VerifyingKey,
}

impl CryptoEngine {
    /// Fresh keypair from the operating system RNG.
    pub fn generate() -> Self {
        let mut rng = OsRng;
        let signing = SigningKey::generate(&mut rng);
        let verifying = signing.verifying_key();
        Self {
            signing: Some(signing),
            verifying,
        }
    }

    /// Deterministic keypair from a 32-byte seed. The local seed copy is
    /// scrubbed on drop.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let seed = Zeroizing::new(seed);
        let signing = SigningKey::from_bytes(&seed);
        let verifying = signing.verifying_key();
        Self {
            signing: Some(signing),
            verifying,
        }
    }

    /// Verification-only engine holding no signing key; [`Self::sign`]
    /// fails with [`CryptoError::KeyUnavailable`].
    pub fn verify_only(public: &PublicKey) -> Result<Self, CryptoError> {
        let verifying = VerifyingKey::from_bytes(public.as_bytes())
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self {
            signing: None,
            verifying,
        })
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_bytes(self.verifying.to_bytes())
    }

    pub fn can_sign(&self) -> bool {
        self.signing.is_some()
    }

    /// Sign a message with the held private key.
    pub fn sign(&self, message: &[u8]) -> Result<SignatureBytes, CryptoError> {
        let key = self.signing.as_ref().ok_or(CryptoError::KeyUnavailable)?;
        Ok(SignatureBytes::from_bytes(key.sign(message).to_bytes()))
    }

    /// Check a signature against a message and key.
    pub fn verify(&self, signature: &SignatureBytes, message: &[u8], public: &PublicKey) -> bool {
        verify_signature(signature, message, public)
    }

    /// BLAKE3 content digest; same algorithm as [`Digest::hash`].
    pub fn hash(&self, data: &[u8]) -> Digest {
        Digest::hash(data)
    }
}

impl fmt::Debug for CryptoEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoEngine")
            .field("public_key", &self.public_key())
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

/// Stateless signature check.
///
/// Total by contract: a malformed key, a malformed signature, and a
/// mismatched signature all verify as `false`. Tamper evidence stays on
/// the boolean path, never on an error path.
pub fn verify_signature(signature: &SignatureBytes, message: &[u8], public: &PublicKey) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(public.as_bytes()) else {
        return false;
    };
    let signature = Signature::from_bytes(signature.as_bytes());
    key.verify(message, &signature).is_ok()
}
