//! Top-level ledger: genesis setup, transactions and read-only queries.

use std::sync::Arc;
use tracing::{debug, info};
use vesta_core::{Address, ConfigValidation, LedgerConfig, LogEntry, Result, VestaError};

use crate::world::{AccountRecord, Code, StateCell, World};
use crate::{CallOutcome, Contract, Env};

/// Result of a committed or rolled-back transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Outcome of the outermost call
    pub outcome: CallOutcome,
    /// Log entries committed by the transaction, empty if it failed
    pub logs: Vec<LogEntry>,
    /// Budget units spent
    pub budget_used: u64,
}

impl Receipt {
    /// Whether the transaction committed.
    pub fn is_success(&self) -> bool {
        self.outcome.success
    }

    /// Decoded error of a failed transaction.
    pub fn error(&self) -> Option<VestaError> {
        self.outcome.error()
    }

    /// Return data of a committed transaction, or the decoded error.
    pub fn into_result(self) -> Result<Vec<u8>> {
        if self.outcome.success {
            Ok(self.outcome.return_data)
        } else {
            Err(self
                .outcome
                .error()
                .unwrap_or_else(|| VestaError::execution_failed("transaction reverted")))
        }
    }
}

/// Deterministic in-memory ledger.
#[derive(Debug, Clone)]
pub struct Ledger {
    world: World,
    config: LedgerConfig,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            world: World::default(),
            config: LedgerConfig::default(),
        }
    }
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        let mut world = World::default();
        world.set_timestamp(config.genesis_timestamp);
        info!(chain_id = config.chain_id, "ledger created");
        Ok(Self { world, config })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Install code at `address` outside any transaction.
    pub fn install(&mut self, address: Address, contract: Arc<dyn Contract>) -> Result<()> {
        debug!(%address, contract = contract.name(), "install code");
        self.world.install(
            address,
            Code {
                logic: address,
                contract,
            },
        )
    }

    /// Mint `amount` to `address`.
    pub fn fund(&mut self, address: Address, amount: u128) {
        self.world.credit(address, amount);
    }

    /// Balance of `address`.
    pub fn balance(&self, address: &Address) -> u128 {
        self.world.balance(address)
    }

    /// Whether `address` holds code.
    pub fn has_code(&self, address: &Address) -> bool {
        self.world.has_code(address)
    }

    /// Logic address backing the code at `address`.
    pub fn logic_of(&self, address: &Address) -> Option<Address> {
        self.world.code(address).map(|code| code.logic)
    }

    /// Raw record for `address`.
    pub fn account(&self, address: &Address) -> Option<&AccountRecord> {
        self.world.account(address)
    }

    /// Typed state stored under `address`.
    pub fn state<T: StateCell>(&self, address: &Address) -> Option<&T> {
        self.world.state::<T>(address)
    }

    /// All committed log entries.
    pub fn logs(&self) -> &[LogEntry] {
        self.world.logs()
    }

    /// Current timestamp.
    pub fn timestamp(&self) -> u64 {
        self.world.timestamp()
    }

    /// Move the clock forward.
    pub fn advance_time(&mut self, seconds: u64) {
        let now = self.world.timestamp().saturating_add(seconds);
        self.world.set_timestamp(now);
    }

    /// Run a transaction from `from` with the default budget.
    pub fn transact(&mut self, from: Address, to: Address, value: u128, input: &[u8]) -> Receipt {
        self.transact_with_budget(from, to, value, input, self.config.default_budget)
    }

    /// Run a transaction from `from` with an explicit budget.
    pub fn transact_with_budget(
        &mut self,
        from: Address,
        to: Address,
        value: u128,
        input: &[u8],
        budget: u64,
    ) -> Receipt {
        let logs_before = self.world.logs().len();
        let mut root = Env::root(&mut self.world, &self.config, from, budget);
        let outcome = root.call(to, value, input, None);
        let budget_used = budget - root.remaining_budget();

        let logs = if outcome.success {
            self.world.logs()[logs_before..].to_vec()
        } else {
            Vec::new()
        };
        debug!(%from, %to, success = outcome.success, budget_used, "transaction");
        Receipt {
            outcome,
            logs,
            budget_used,
        }
    }

    /// Run a call against a throwaway copy of the world.
    pub fn query(&self, from: Address, to: Address, input: &[u8]) -> CallOutcome {
        let mut scratch = self.world.clone();
        let mut root = Env::root(&mut scratch, &self.config, from, self.config.default_budget);
        root.call(to, 0, input, None)
    }
}
