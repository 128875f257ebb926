//! # Vesta Recovery
//!
//! Threshold social recovery, packaged as a validation module any Vesta
//! account can enable.
//!
//! ## Protocol
//!
//! 1. The account calls [`RecoveryCall::Setup`] with its friends and a
//!    threshold (at least two, at most the number of friends).
//! 2. Friends call [`RecoveryCall::Confirm`] for a proposed new primary
//!    authority. Confirmations are keyed by a recovery hash over the account,
//!    the proposal and the account's current recovery nonce.
//! 3. Once enough confirmations from current friends exist, a friend calls
//!    [`RecoveryCall::Recover`]. The module overwrites the account's primary
//!    authority through the account's module execution path and bumps the
//!    nonce, retiring every confirmation made under the old one.
//!
//! ## Membership at recovery time
//!
//! By default only confirmations from addresses still in the friend set
//! count. Setting [`vesta_core::RecoveryConfig::revalidate_membership`] to
//! `false` counts every stored confirmation instead, which lets a friend
//! removed by a later `Setup` keep contributing to requests they confirmed
//! earlier.

#![forbid(unsafe_code)]

/// Recovery module contract
pub mod module;

/// Friend sets, recovery hashes and request status
pub mod types;

pub use module::{RecoveryCall, SocialRecoveryModule};
pub use types::{recovery_hash, FriendSet, RecoveryStatus};
