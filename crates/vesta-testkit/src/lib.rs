//! Vesta Testing Infrastructure
//!
//! Common fixtures for the account, module and deployer test suites:
//! deterministic keys, mock contracts, well-known addresses and a tracing
//! bootstrap that plays well with the test harness.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! vesta-testkit = { path = "../vesta-testkit" }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

/// Mock contracts
pub mod contracts;
/// Deterministic signing keys
pub mod keys;

pub use contracts::{recorded_calls, RecordedCall, RecordedCalls, Recorder, Relay, RelayCall, Reverter};
pub use keys::KeyTestFixture;

use std::sync::Arc;
use vesta_core::{logging, Address, VestaConfig};
use vesta_ledger::{Contract, Ledger};

/// Primary authority used across tests
pub const PRIMARY: Address = Address::from_low_u64(0xe0);

/// Fallback handler used across tests
pub const HANDLER: Address = Address::from_low_u64(0xf0);

/// Unprivileged outsider
pub const OUTSIDER: Address = Address::from_low_u64(0x0bad);

/// Configuration for test runs: defaults plus `VESTA_*` overrides.
pub fn config() -> VestaConfig {
    VestaConfig::load(None).unwrap()
}

/// Install the test subscriber once. `RUST_LOG` or `VESTA_LOGGING_LEVEL`
/// select the filter.
pub fn init_test_tracing() {
    let _ = logging::init_for_tests(&config().logging);
}

/// Empty ledger configured by [`config`].
pub fn ledger() -> Ledger {
    let config = config();
    let _ = logging::init_for_tests(&config.logging);
    Ledger::new(config.ledger).unwrap()
}

/// Install `contract` at `address`, panicking on collision.
pub fn install(ledger: &mut Ledger, address: Address, contract: impl Contract + 'static) {
    ledger.install(address, Arc::new(contract)).unwrap();
}
