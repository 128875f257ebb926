//! # Vesta Factory
//!
//! Deploys Vesta accounts at addresses known before deployment. An account
//! created with [`FactoryCall::DeployDeterministic`] lands at
//! [`compute_address`] of the same inputs, so funds can be sent to it ahead
//! of time. [`FactoryCall::DeployWithoutIndex`] draws the address from the
//! deployer's own sequence instead.

#![forbid(unsafe_code)]

/// Address derivation
pub mod derivation;

/// Deployer contract
pub mod factory;

pub use derivation::{compute_address, sequence_address};
pub use factory::{AccountFactory, FactoryCall};
