//! Call surfaces served by accounts and validation modules.
//!
//! Payloads are tagged with an interface id (see
//! [`vesta_ledger::codec::Interface`]), so a contract can serve several of
//! them and forward anything else to its fallback handler.
//!
//! Return data per call:
//!
//! | Call | Returns |
//! |------|---------|
//! | `Init`, `SetupAndEnableModule` | enabled module `Address` |
//! | `ExecuteAsPrimary` | callee return data, verbatim |
//! | `ExecuteBatchAsPrimary` | `Vec<Vec<u8>>` of callee return data |
//! | `ExecuteAsModule`, `ExecuteBatchAsModule` | `bool` success flag |
//! | `ExecuteAsModuleReturnData` | `(bool, Vec<u8>)` |
//! | `ValidateOperation`, `IsValidSignature` | module return data, verbatim |
//! | queries | the queried value |

use serde::{Deserialize, Serialize};
use vesta_core::{Address, Hash32, Operation};
use vesta_ledger::codec::Interface;

/// How a module-initiated call binds storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Ordinary call; the callee keeps its own storage
    DirectCall,
    /// Callee code runs against the account's own storage
    ContextSharingCall,
}

/// One module-initiated call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleExecution {
    /// Callee
    pub target: Address,
    /// Value to attach, ignored for context-sharing calls
    pub value: u128,
    /// Callee input
    pub payload: Vec<u8>,
    /// Storage binding
    pub kind: OperationKind,
    /// Budget cap, `None` forwards everything left
    pub budget: Option<u64>,
}

impl ModuleExecution {
    /// Direct call with the full remaining budget.
    pub fn direct(target: Address, value: u128, payload: Vec<u8>) -> Self {
        Self {
            target,
            value,
            payload,
            kind: OperationKind::DirectCall,
            budget: None,
        }
    }

    /// Context-sharing call with the full remaining budget.
    pub fn context_sharing(target: Address, payload: Vec<u8>) -> Self {
        Self {
            target,
            value: 0,
            payload,
            kind: OperationKind::ContextSharingCall,
            budget: None,
        }
    }

    /// Cap the callee's budget.
    pub fn with_budget(mut self, budget: u64) -> Self {
        self.budget = Some(budget);
        self
    }
}

/// Calls a `SmartAccount` serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountCall {
    /// One-time initialization
    Init {
        /// Fallback handler, must be non-zero
        handler: Address,
        /// Contract that sets up and returns the first module
        module_setup: Address,
        /// Input for `module_setup`
        module_setup_data: Vec<u8>,
    },
    /// Single call as the primary authority or self
    ExecuteAsPrimary {
        /// Callee
        target: Address,
        /// Value to attach
        value: u128,
        /// Callee input
        payload: Vec<u8>,
    },
    /// Sequential calls as the primary authority or self
    ExecuteBatchAsPrimary {
        /// Callees
        targets: Vec<Address>,
        /// Values, empty for all zero
        values: Vec<u128>,
        /// Callee inputs
        payloads: Vec<Vec<u8>>,
    },
    /// Module-initiated call returning a success flag
    ExecuteAsModule(ModuleExecution),
    /// Module-initiated call returning the flag and return data
    ExecuteAsModuleReturnData(ModuleExecution),
    /// Module-initiated batch; returns the outcome of the last call only
    ExecuteBatchAsModule {
        /// Callees
        targets: Vec<Address>,
        /// Values
        values: Vec<u128>,
        /// Callee inputs
        payloads: Vec<Vec<u8>>,
        /// Storage bindings
        kinds: Vec<OperationKind>,
    },
    /// Route an operation to the module named in its signature envelope
    ValidateOperation {
        /// Operation under validation
        operation: Operation,
        /// Hash computed by the primary authority
        operation_hash: Hash32,
        /// Amount owed to the primary authority
        missing_funds: u128,
    },
    /// Route a signature query to the module named in the envelope
    IsValidSignature {
        /// Signed hash
        data_hash: Hash32,
        /// Encoded signature envelope
        signature: Vec<u8>,
    },
    /// Link a module
    EnableModule {
        /// Module to enable
        module: Address,
    },
    /// Unlink a module
    DisableModule {
        /// Predecessor of `module` in the registry
        prev: Address,
        /// Module to disable
        module: Address,
    },
    /// Call a setup contract and enable the module it returns
    SetupAndEnableModule {
        /// Setup contract
        setup: Address,
        /// Input for the setup contract
        setup_data: Vec<u8>,
    },
    /// Membership query
    IsModuleEnabled {
        /// Module to look up
        module: Address,
    },
    /// Registry page
    ModulesPaginated {
        /// Cursor, `SENTINEL` for the first page
        start: Address,
        /// Maximum entries
        page_size: u64,
    },
    /// Replace the primary authority
    SetPrimaryAuthority {
        /// New authority, non-zero
        authority: Address,
    },
    /// Effective primary authority
    PrimaryAuthority,
    /// Point the account at new logic
    UpdateImplementation {
        /// Address holding the new code
        logic: Address,
    },
    /// Current logic address
    Implementation,
    /// Current fallback handler
    FallbackHandler,
}

impl Interface for AccountCall {
    const NAME: &'static str = "vesta.account.v1";
}

/// Entry points every validation module serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleCall {
    /// Returns an encoded `ValidationData`
    ValidateOperation {
        /// Operation under validation
        operation: Operation,
        /// Hash computed by the primary authority
        operation_hash: Hash32,
        /// Module-specific signature from the envelope
        module_signature: Vec<u8>,
    },
    /// Returns an encoded `SignatureMagic`
    IsValidSignature {
        /// Signed hash
        data_hash: Hash32,
        /// Module-specific signature from the envelope
        signature: Vec<u8>,
    },
}

impl Interface for ModuleCall {
    const NAME: &'static str = "vesta.module.v1";
}
