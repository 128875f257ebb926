//! # Vesta Ledger
//!
//! Deterministic in-memory ledger that hosts accounts, modules and deployers.
//!
//! ## Model
//!
//! - Code is stateless and shared; state lives in per-address typed storage.
//! - Every call runs in a frame with its own caller, value and budget.
//! - A frame that returns `Err` is rolled back completely: storage, balances
//!   and log entries revert to the snapshot taken when the frame began.
//! - Context-sharing calls run the callee's code under the caller's address,
//!   so the callee reads and writes the caller's storage.
//! - Reentrancy is allowed. Contracts must not rely on storage borrowed before
//!   a nested call still being current afterwards.

#![forbid(unsafe_code)]

/// Payload encoding helpers
pub mod codec;

/// Contract trait, revert payloads and call outcomes
pub mod contract;

/// Per-frame execution environment
pub mod env;

/// Top-level ledger driver
pub mod ledger;

/// World state and typed storage
pub mod world;

pub use contract::{CallOutcome, Contract, Revert};
pub use env::{Env, Frame};
pub use ledger::{Ledger, Receipt};
pub use world::{AccountRecord, StateCell, World};
