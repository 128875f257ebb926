//! Events emitted by accounts, modules and the deployer
//!
//! Events are the only externally observable side effect besides state
//! changes. They are recorded in the ledger log by the frame that emits them
//! and disappear with the frame if it rolls back.

use serde::{Deserialize, Serialize};

use crate::{Address, Hash32};

/// Every event the system can emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Module linked into an account's registry
    ModuleEnabled {
        /// Enabled module
        module: Address,
    },
    /// Module unlinked from an account's registry
    ModuleDisabled {
        /// Disabled module
        module: Address,
    },
    /// Module-initiated call succeeded
    ModuleExecutionSuccess {
        /// Calling module
        module: Address,
    },
    /// Module-initiated call failed
    ModuleExecutionFailure {
        /// Calling module
        module: Address,
    },
    /// Primary authority replaced
    PrimaryAuthorityChanged {
        /// Previous effective authority
        previous: Address,
        /// New authority
        current: Address,
    },
    /// Logic reference replaced
    ImplementationUpdated {
        /// Previous logic address
        previous: Address,
        /// New logic address
        current: Address,
    },
    /// Account instantiated by a deployer
    AccountCreated {
        /// New account address
        account: Address,
        /// Module enabled during `init`
        initial_module: Address,
        /// Deterministic index, absent for sequence-based deployment
        index: Option<u64>,
    },
    /// Friend set stored for an account
    RecoverySetup {
        /// Account that configured recovery
        account: Address,
        /// Number of friends
        friends: usize,
        /// Required confirmations
        threshold: usize,
    },
    /// Friend confirmed a recovery request
    RecoveryConfirmed {
        /// Account under recovery
        account: Address,
        /// Confirming friend
        friend: Address,
        /// Request identifier
        recovery_hash: Hash32,
    },
    /// Recovery executed and nonce advanced
    RecoveryExecuted {
        /// Recovered account
        account: Address,
        /// Authority installed
        new_authority: Address,
        /// Nonce after the increment
        nonce: u64,
    },
    /// Ownership module assigned an owner
    OwnershipTransferred {
        /// Account whose owner changed
        account: Address,
        /// Previous owner, zero on first assignment
        previous: Address,
        /// New owner
        current: Address,
    },
}

impl Event {
    /// Short stable name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ModuleEnabled { .. } => "ModuleEnabled",
            Self::ModuleDisabled { .. } => "ModuleDisabled",
            Self::ModuleExecutionSuccess { .. } => "ModuleExecutionSuccess",
            Self::ModuleExecutionFailure { .. } => "ModuleExecutionFailure",
            Self::PrimaryAuthorityChanged { .. } => "PrimaryAuthorityChanged",
            Self::ImplementationUpdated { .. } => "ImplementationUpdated",
            Self::AccountCreated { .. } => "AccountCreated",
            Self::RecoverySetup { .. } => "RecoverySetup",
            Self::RecoveryConfirmed { .. } => "RecoveryConfirmed",
            Self::RecoveryExecuted { .. } => "RecoveryExecuted",
            Self::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }
}

/// Event together with the address that emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Emitting address (storage owner of the frame)
    pub emitter: Address,
    /// The event
    pub event: Event,
}
