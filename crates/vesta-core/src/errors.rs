//! Unified error system for Vesta
//!
//! A single error type shared by the ledger runtime, the account, its modules
//! and the deployer. Errors cross call frames as revert data, so the type is
//! serializable and compares by value.

use serde::{Deserialize, Serialize};

use crate::{Address, Hash32};

/// Unified error type for all Vesta operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum VestaError {
    /// Bad threshold, friend set, handler or other setup parameter
    #[error("Configuration error: {message}")]
    Configuration {
        /// What was wrong with the configuration
        message: String,
    },

    /// Caller does not belong to the caller class required by the entrypoint
    #[error("Authorization error: {message}")]
    Authorization {
        /// Which check rejected the caller
        message: String,
    },

    /// Signature envelope names a module that is not enabled on the account
    #[error("Unknown validation module {module}")]
    UnknownValidationModule {
        /// Module named in the signature envelope
        module: Address,
    },

    /// Module address is zero or the sentinel
    #[error("Invalid module {module}")]
    InvalidModule {
        /// Rejected module address
        module: Address,
    },

    /// Module is already linked into the registry
    #[error("Module {module} already enabled")]
    AlreadyEnabled {
        /// Module that was already present
        module: Address,
    },

    /// Predecessor supplied for removal does not point at the module
    #[error("Linkage mismatch: {prev} links to {expected}, not {actual}")]
    LinkageMismatch {
        /// Successor actually recorded for `prev`
        expected: Address,
        /// Module the caller asked to remove
        actual: Address,
        /// Predecessor supplied by the caller
        prev: Address,
    },

    /// Operation hash was already consumed
    #[error("Replay of operation {operation_hash}")]
    Replay {
        /// Hash seen before
        operation_hash: Hash32,
    },

    /// Fewer current friends confirmed than the threshold requires
    #[error("Insufficient approvals: {confirmed} of {threshold}")]
    InsufficientApprovals {
        /// Confirmations counted
        confirmed: usize,
        /// Confirmations required
        threshold: usize,
    },

    /// Caller is not a friend of the account
    #[error("{caller} is not a friend of {account}")]
    NotAFriend {
        /// Caller that attempted a friend-only action
        caller: Address,
        /// Account whose friend set was consulted
        account: Address,
    },

    /// Deterministic address already holds an account
    #[error("Deployment collision at {address}")]
    DeploymentCollision {
        /// Occupied address
        address: Address,
    },

    /// Account `init` was called a second time
    #[error("Account already initialized")]
    AlreadyInitialized,

    /// Batch sequences are empty or differ in length
    #[error("Malformed batch: targets={targets} values={values} payloads={payloads} kinds={kinds}")]
    MalformedBatch {
        /// Number of targets
        targets: usize,
        /// Number of values
        values: usize,
        /// Number of payloads
        payloads: usize,
        /// Number of operation kinds
        kinds: usize,
    },

    /// A required inner call did not succeed
    #[error("Execution failed: {message}")]
    ExecutionFailed {
        /// Which call failed
        message: String,
    },

    /// Frame ran out of its computation budget
    #[error("Out of budget: need {required}, remaining {remaining}")]
    OutOfBudget {
        /// Units the frame needed
        required: u64,
        /// Units that were left
        remaining: u64,
    },

    /// Value transfer exceeds the sender's balance
    #[error("Insufficient balance at {address}: have {balance}, need {required}")]
    InsufficientBalance {
        /// Paying address
        address: Address,
        /// Balance held
        balance: u128,
        /// Value requested
        required: u128,
    },

    /// Nested calls exceeded the configured depth
    #[error("Call depth {depth} exceeded")]
    CallDepthExceeded {
        /// Depth that was refused
        depth: usize,
    },

    /// Input bytes could not be decoded
    #[error("Decode error: {message}")]
    Decode {
        /// Decoder message
        message: String,
    },

    /// Invalid input that fits no other category
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl VestaError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an authorization error
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            message: message.into(),
        }
    }

    /// Create an execution failure
    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Wrong caller class or unknown validation module.
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::Authorization { .. } | Self::UnknownValidationModule { .. }
        )
    }

    /// Encode as revert data for crossing a call frame.
    pub fn to_revert_data(&self) -> Vec<u8> {
        // Encoding a plain enum into a Vec cannot fail.
        bincode::serialize(self).unwrap_or_default()
    }

    /// Decode revert data produced by [`VestaError::to_revert_data`].
    ///
    /// Returns `None` for foreign revert payloads.
    pub fn from_revert_data(data: &[u8]) -> Option<Self> {
        bincode::deserialize(data).ok()
    }
}

impl From<bincode::Error> for VestaError {
    fn from(err: bincode::Error) -> Self {
        Self::decode(err.to_string())
    }
}

impl From<std::io::Error> for VestaError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err.to_string())
    }
}

/// Standard Result type for Vesta operations
pub type Result<T> = std::result::Result<T, VestaError>;
