//! Signature verification black box
//!
//! Authorization modules do not care which signature scheme is in use. They
//! hand a digest and a signature blob to a [`SignatureVerifier`] and get back
//! the signer's address (if the signature is good) plus an optional validity
//! window to pass through to the primary authority.
//!
//! The shipped scheme is Ed25519. Blob layout:
//! `public_key (32) ‖ signature (64) ‖ [valid_after (8) ‖ valid_until (8)]`.
//! When the window is present it is part of the signed message.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;

use crate::{Address, Hash32, ValidityWindow};

const PUBLIC_KEY_LEN: usize = 32;
const SIGNATURE_LEN: usize = 64;
const WINDOW_LEN: usize = 16;

/// Outcome of verifying a signature blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Signature is valid and was produced by `signer`
    Valid {
        /// Address derived from the signing key
        signer: Address,
        /// Window the signer attached, if any
        window: Option<ValidityWindow>,
    },
    /// Signature is malformed or does not verify
    Invalid,
}

impl Verification {
    /// Signer address if valid.
    pub fn signer(&self) -> Option<Address> {
        match self {
            Self::Valid { signer, .. } => Some(*signer),
            Self::Invalid => None,
        }
    }
}

/// Pluggable signature scheme.
pub trait SignatureVerifier: Send + Sync + fmt::Debug {
    /// Verify `signature` over `digest`.
    fn verify(&self, digest: &Hash32, signature: &[u8]) -> Verification;
}

/// Ed25519 verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

fn signed_message(digest: &Hash32, window: Option<&[u8]>) -> Vec<u8> {
    let mut message = digest.as_bytes().to_vec();
    if let Some(window) = window {
        message.extend_from_slice(window);
    }
    message
}

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, digest: &Hash32, signature: &[u8]) -> Verification {
        // The signed window bytes are verified as carried; only the reported
        // window is clamped.
        let raw_window = match signature.len() {
            len if len == PUBLIC_KEY_LEN + SIGNATURE_LEN => None,
            len if len == PUBLIC_KEY_LEN + SIGNATURE_LEN + WINDOW_LEN => {
                let mut raw = [0u8; WINDOW_LEN];
                raw.copy_from_slice(&signature[PUBLIC_KEY_LEN + SIGNATURE_LEN..]);
                Some(raw)
            }
            _ => return Verification::Invalid,
        };

        let mut key_bytes = [0u8; PUBLIC_KEY_LEN];
        key_bytes.copy_from_slice(&signature[..PUBLIC_KEY_LEN]);
        let Ok(key) = VerifyingKey::from_bytes(&key_bytes) else {
            return Verification::Invalid;
        };
        let Ok(sig) = Signature::from_slice(&signature[PUBLIC_KEY_LEN..PUBLIC_KEY_LEN + SIGNATURE_LEN])
        else {
            return Verification::Invalid;
        };

        let message = signed_message(digest, raw_window.as_ref().map(|raw| raw.as_slice()));
        match key.verify(&message, &sig) {
            Ok(()) => Verification::Valid {
                signer: Address::from_public_key(key.as_bytes()),
                window: raw_window.as_ref().map(ValidityWindow::from_bytes),
            },
            Err(_) => Verification::Invalid,
        }
    }
}

/// Address controlled by an Ed25519 key.
pub fn ed25519_address(key: &VerifyingKey) -> Address {
    Address::from_public_key(key.as_bytes())
}

/// Produce a blob that [`Ed25519Verifier`] accepts.
pub fn ed25519_sign(key: &SigningKey, digest: &Hash32, window: Option<ValidityWindow>) -> Vec<u8> {
    let window = window.map(|window| window.to_bytes());
    let sig = key.sign(&signed_message(digest, window.as_ref().map(|raw| raw.as_slice())));
    let mut blob = Vec::with_capacity(PUBLIC_KEY_LEN + SIGNATURE_LEN + WINDOW_LEN);
    blob.extend_from_slice(key.verifying_key().as_bytes());
    blob.extend_from_slice(&sig.to_bytes());
    if let Some(window) = window {
        blob.extend_from_slice(&window);
    }
    blob
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    #[test]
    fn test_valid_signature_recovers_signer() {
        let key = key(1);
        let digest = Hash32::digest(b"op");
        let blob = ed25519_sign(&key, &digest, None);
        assert_eq!(
            Ed25519Verifier.verify(&digest, &blob),
            Verification::Valid {
                signer: ed25519_address(&key.verifying_key()),
                window: None
            }
        );
    }

    #[test]
    fn test_window_is_signed() {
        let key = key(2);
        let digest = Hash32::digest(b"op");
        let window = ValidityWindow::new(100, 200);
        let mut blob = ed25519_sign(&key, &digest, Some(window));
        assert_eq!(
            Ed25519Verifier.verify(&digest, &blob).signer(),
            Some(ed25519_address(&key.verifying_key()))
        );

        // Tamper with valid_until.
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert_eq!(Ed25519Verifier.verify(&digest, &blob), Verification::Invalid);
    }

    #[test]
    fn test_unclamped_window_verifies_and_reports_clamped() {
        let key = key(4);
        let digest = Hash32::digest(b"op");
        let window = ValidityWindow {
            valid_after: 0,
            valid_until: u64::MAX,
        };
        let blob = ed25519_sign(&key, &digest, Some(window));
        assert_eq!(
            Ed25519Verifier.verify(&digest, &blob),
            Verification::Valid {
                signer: ed25519_address(&key.verifying_key()),
                window: Some(ValidityWindow::new(0, ValidityWindow::MAX_TIMESTAMP)),
            }
        );
    }

    #[test]
    fn test_wrong_digest_is_invalid() {
        let key = key(3);
        let blob = ed25519_sign(&key, &Hash32::digest(b"a"), None);
        assert_eq!(
            Ed25519Verifier.verify(&Hash32::digest(b"b"), &blob),
            Verification::Invalid
        );
    }

    #[test]
    fn test_malformed_blob_is_invalid() {
        assert_eq!(
            Ed25519Verifier.verify(&Hash32::ZERO, &[0u8; 10]),
            Verification::Invalid
        );
    }
}
