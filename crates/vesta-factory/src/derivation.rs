//! Account address derivation
//!
//! Deterministic addresses depend only on the deployer, the account logic,
//! the hash of the initializer payload and the index. Nothing chain- or
//! time-dependent goes in, so the same inputs give the same address on any
//! ledger and before the account exists.

use vesta_core::{hash, Address, Hash32};

/// Salt binding the initializer payload and the index.
pub fn deployment_salt(init_data: &[u8], index: u64) -> Hash32 {
    let mut h = hash::hasher();
    h.update(&hash::hash(init_data));
    h.update(&index.to_be_bytes());
    Hash32(h.finalize())
}

/// Hash standing in for the account creation code, which is fixed by the
/// logic it points at.
pub fn creation_code_hash(logic: &Address) -> Hash32 {
    let mut h = hash::hasher();
    h.update(b"vesta.account.code");
    h.update(logic.as_bytes());
    Hash32(h.finalize())
}

/// Deterministic account address.
pub fn compute_address(deployer: &Address, logic: &Address, init_data: &[u8], index: u64) -> Address {
    let mut h = hash::hasher();
    h.update(&[0xff]);
    h.update(deployer.as_bytes());
    h.update(deployment_salt(init_data, index).as_bytes());
    h.update(creation_code_hash(logic).as_bytes());
    Address::from_digest(&h.finalize())
}

/// Address for the deployer's `nonce`-th sequence-based deployment.
pub fn sequence_address(deployer: &Address, nonce: u64) -> Address {
    let mut h = hash::hasher();
    h.update(b"vesta.account.sequence");
    h.update(deployer.as_bytes());
    h.update(&nonce.to_be_bytes());
    Address::from_digest(&h.finalize())
}
