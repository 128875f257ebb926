//! Operation record submitted to an account
//!
//! An operation names its sender account, carries an anti-replay nonce, the
//! call payload the account should run and a signature blob. The blob wraps
//! a [`SignatureEnvelope`]: the module-specific signature plus the address of
//! the module that must validate it.

use serde::{Deserialize, Serialize};

use crate::{hash, Address, Hash32, Result, VestaError};

/// Signed operation presented to an account by its primary authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Account the operation is for
    pub sender: Address,
    /// Anti-replay nonce, checked by the primary authority
    pub nonce: u64,
    /// Encoded call the account should perform once validated
    pub call_data: Vec<u8>,
    /// Encoded [`SignatureEnvelope`]
    pub signature: Vec<u8>,
}

impl Operation {
    /// Create an unsigned operation.
    pub fn new(sender: Address, nonce: u64, call_data: Vec<u8>) -> Self {
        Self {
            sender,
            nonce,
            call_data,
            signature: Vec::new(),
        }
    }

    /// Attach a signature envelope.
    pub fn with_envelope(mut self, envelope: &SignatureEnvelope) -> Self {
        self.signature = envelope.encode();
        self
    }

    /// Decode the signature envelope.
    pub fn envelope(&self) -> Result<SignatureEnvelope> {
        SignatureEnvelope::decode(&self.signature)
    }

    /// Hash of the operation fields excluding the signature, bound to the
    /// primary authority and chain so the same record cannot be replayed on a
    /// different relay or ledger.
    pub fn hash(&self, primary_authority: &Address, chain_id: u64) -> Hash32 {
        let mut h = hash::hasher();
        h.update(b"vesta.operation.v1");
        h.update(self.sender.as_bytes());
        h.update(&self.nonce.to_be_bytes());
        h.update(&hash::hash(&self.call_data));
        h.update(primary_authority.as_bytes());
        h.update(&chain_id.to_be_bytes());
        Hash32(h.finalize())
    }
}

/// `(moduleSignature, moduleReference)` pair carried in signature blobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEnvelope {
    /// Signature understood only by `module`
    pub module_signature: Vec<u8>,
    /// Module that must validate the signature
    pub module: Address,
}

impl SignatureEnvelope {
    /// Wrap a module signature.
    pub fn new(module_signature: Vec<u8>, module: Address) -> Self {
        Self {
            module_signature,
            module,
        }
    }

    /// Serialize into a signature blob.
    pub fn encode(&self) -> Vec<u8> {
        bincode::serialize(self).unwrap_or_default()
    }

    /// Parse a signature blob.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map_err(|e| VestaError::decode(format!("signature envelope: {e}")))
    }
}
