//! Key test helpers
//!
//! Deterministic Ed25519 keys for signers that own accounts, act as friends
//! or sign operations in tests.

use ed25519_dalek::{SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};
use vesta_core::crypto::{ed25519_address, ed25519_sign};
use vesta_core::{Address, Hash32, ValidityWindow};

/// Key test fixture for consistent test key generation
#[derive(Debug, Clone)]
pub struct KeyTestFixture {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    address: Address,
}

impl KeyTestFixture {
    /// Create a key fixture from raw seed bytes
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key = signing_key.verifying_key();
        let address = ed25519_address(&verifying_key);
        Self {
            signing_key,
            verifying_key,
            address,
        }
    }

    /// Create a key fixture from a seed string
    pub fn from_seed_string(seed: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed.as_bytes());
        let seed_bytes: [u8; 32] = hasher.finalize().into();
        Self::from_seed(&seed_bytes)
    }

    /// Get the signing key
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Get the verifying key
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Ledger address controlled by this key
    pub fn address(&self) -> Address {
        self.address
    }

    /// Signature blob over `digest`
    pub fn sign(&self, digest: &Hash32) -> Vec<u8> {
        ed25519_sign(&self.signing_key, digest, None)
    }

    /// Signature blob over `digest` bounded by `window`
    pub fn sign_within(&self, digest: &Hash32, window: ValidityWindow) -> Vec<u8> {
        ed25519_sign(&self.signing_key, digest, Some(window))
    }
}
