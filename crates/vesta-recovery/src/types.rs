//! Shared types for social recovery.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use vesta_core::{hash, Address, Hash32, RecoveryConfig, Result, VestaError};

/// Friends of one account plus the confirmations a recovery needs.
///
/// Friends are distinct and non-zero; `min_threshold <= threshold <= len`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendSet {
    friends: Vec<Address>,
    threshold: usize,
}

impl FriendSet {
    /// Validate and build a friend set.
    pub fn new(friends: Vec<Address>, threshold: usize, config: &RecoveryConfig) -> Result<Self> {
        if threshold < config.min_threshold {
            return Err(VestaError::configuration(format!(
                "threshold {threshold} below minimum {}",
                config.min_threshold
            )));
        }
        if threshold > friends.len() {
            return Err(VestaError::configuration(format!(
                "threshold {threshold} exceeds {} friends",
                friends.len()
            )));
        }
        let mut seen = HashSet::with_capacity(friends.len());
        for friend in &friends {
            if friend.is_zero() {
                return Err(VestaError::configuration("friend address cannot be zero"));
            }
            if !seen.insert(*friend) {
                return Err(VestaError::configuration(format!("duplicate friend {friend}")));
            }
        }
        Ok(Self { friends, threshold })
    }

    /// Friends in setup order.
    pub fn friends(&self) -> &[Address] {
        &self.friends
    }

    /// Required confirmations.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Number of friends.
    pub fn len(&self) -> usize {
        self.friends.len()
    }

    /// Always false for a validated set.
    pub fn is_empty(&self) -> bool {
        self.friends.is_empty()
    }

    /// Whether `address` is a friend.
    pub fn contains(&self, address: &Address) -> bool {
        self.friends.contains(address)
    }
}

/// Identifier of one recovery attempt.
pub fn recovery_hash(account: &Address, proposed: &Address, nonce: u64) -> Hash32 {
    let mut h = hash::hasher();
    h.update(b"vesta.recovery.v1");
    h.update(account.as_bytes());
    h.update(proposed.as_bytes());
    h.update(&nonce.to_be_bytes());
    Hash32(h.finalize())
}

/// Progress of one recovery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecoveryStatus {
    /// No confirmations yet
    Unstarted,
    /// Some confirmations, below threshold
    PartiallyConfirmed,
    /// Threshold reached, `recover` may run
    Executable,
    /// Consumed; the nonce moved past it
    Executed,
}
