//! # Vesta Core
//!
//! Foundation types shared by every Vesta crate: addresses, digests, the
//! unified error type, the operation record and its signature envelope,
//! validation words, events, the signature-verifier black box, the replay
//! guard used by validation modules, configuration and logging bootstrap.
//!
//! This crate holds no ledger state and performs no calls. Contracts live in
//! `vesta-account`, `vesta-recovery` and `vesta-factory`; the runtime that
//! hosts them lives in `vesta-ledger`.

#![forbid(unsafe_code)]

/// 20-byte ledger addresses and the reserved sentinel
pub mod address;

/// Configuration loading and validation
pub mod config;

/// Signature verification black box and the Ed25519 scheme
pub mod crypto;

/// Unified error handling
pub mod errors;

/// Event vocabulary
pub mod events;

/// Pure synchronous hashing
pub mod hash;

/// Tracing subscriber bootstrap
pub mod logging;

/// Operation record and signature envelope
pub mod operation;

/// One-time operation hash tracking
pub mod replay;

/// Validation words and signature magic values
pub mod validation;

pub use address::Address;
pub use config::{ConfigValidation, LedgerConfig, LogConfig, RecoveryConfig, VestaConfig};
pub use crypto::{Ed25519Verifier, SignatureVerifier, Verification};
pub use errors::{Result, VestaError};
pub use events::{Event, LogEntry};
pub use hash::Hash32;
pub use operation::{Operation, SignatureEnvelope};
pub use replay::SeenOperations;
pub use validation::{SignatureMagic, ValidationData, ValidityWindow};

/// Result alias used at crate boundaries
pub type VestaResult<T> = Result<T>;
