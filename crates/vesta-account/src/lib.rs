//! # Vesta Account
//!
//! Programmable account whose authority is delegated to pluggable modules.
//!
//! ## Parts
//!
//! - [`ModuleRegistry`]: linked list of enabled modules
//! - [`ExecutionAuthority`]: caller classes and call execution
//! - [`ValidationDispatcher`]: routes operations to the module named in their
//!   signature envelope
//! - [`SmartAccount`]: the contract tying the above to account storage
//! - [`KeyOwnershipModule`]: single-key validation module
//!
//! ## Flow
//!
//! The primary authority presents an operation with
//! [`AccountCall::ValidateOperation`]. The dispatcher checks the named module
//! against the registry and forwards the operation. Once accepted, the primary
//! authority has the account act with [`AccountCall::ExecuteAsPrimary`].
//! Modules act through [`AccountCall::ExecuteAsModule`], which reports
//! failures instead of reverting.

#![forbid(unsafe_code)]

/// Account contract
pub mod account;

/// Call surfaces
pub mod calls;

/// Operation routing to validation modules
pub mod dispatcher;

/// Caller classes and call execution
pub mod execution;

/// Key-ownership validation module
pub mod ownership;

/// Module registry
pub mod registry;

/// Account storage
pub mod state;

pub use account::SmartAccount;
pub use calls::{AccountCall, ModuleCall, ModuleExecution, OperationKind};
pub use dispatcher::ValidationDispatcher;
pub use execution::{CallerClass, ExecutionAuthority};
pub use ownership::{KeyOwnershipModule, OwnershipCall};
pub use registry::{ModuleRegistry, Page};
pub use state::AccountState;
