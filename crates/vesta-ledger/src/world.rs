//! World state: balances, code, typed storage and the event log.
//!
//! The whole world is `Clone`. Frames snapshot it on entry and restore the
//! snapshot when they fail, which is what makes every entrypoint
//! all-or-nothing.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use vesta_core::{Address, LogEntry, VestaError};

use crate::Contract;

/// Value that can be stored under an address.
///
/// Implemented for every `Clone + Debug + Send + Sync + 'static` type.
pub trait StateCell: Any + Send + Sync + fmt::Debug {
    /// Clone behind the trait object.
    fn clone_cell(&self) -> Box<dyn StateCell>;
    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;
    /// Mutable upcast for downcasting to the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any + Clone + Send + Sync + fmt::Debug> StateCell for T {
    fn clone_cell(&self) -> Box<dyn StateCell> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Owned storage slot.
#[derive(Debug)]
struct Slot(Box<dyn StateCell>);

impl Clone for Slot {
    fn clone(&self) -> Self {
        Self(self.0.as_ref().clone_cell())
    }
}

/// Code installed at an address together with the logic address it came from.
#[derive(Clone)]
pub struct Code {
    /// Address whose code this is a copy of
    pub logic: Address,
    /// The code itself
    pub contract: Arc<dyn Contract>,
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Code")
            .field("logic", &self.logic)
            .field("contract", &self.contract.name())
            .finish()
    }
}

/// Per-address record.
#[derive(Debug, Clone, Default)]
pub struct AccountRecord {
    /// Native balance
    pub balance: u128,
    /// Sequence counter, advanced by sequence-based deployments
    pub nonce: u64,
    /// Installed code, `None` for plain signers
    pub code: Option<Code>,
}

/// Complete ledger state.
#[derive(Debug, Clone, Default)]
pub struct World {
    accounts: HashMap<Address, AccountRecord>,
    storage: HashMap<(Address, TypeId), Slot>,
    logs: Vec<LogEntry>,
    timestamp: u64,
}

impl World {
    /// Record for `address`, if it was ever touched.
    pub fn account(&self, address: &Address) -> Option<&AccountRecord> {
        self.accounts.get(address)
    }

    pub(crate) fn account_mut(&mut self, address: Address) -> &mut AccountRecord {
        self.accounts.entry(address).or_default()
    }

    /// Balance of `address`.
    pub fn balance(&self, address: &Address) -> u128 {
        self.accounts.get(address).map_or(0, |a| a.balance)
    }

    /// Code at `address`.
    pub fn code(&self, address: &Address) -> Option<Code> {
        self.accounts.get(address).and_then(|a| a.code.clone())
    }

    /// Whether `address` holds code.
    pub fn has_code(&self, address: &Address) -> bool {
        self.accounts
            .get(address)
            .is_some_and(|a| a.code.is_some())
    }

    pub(crate) fn credit(&mut self, address: Address, amount: u128) {
        let record = self.account_mut(address);
        record.balance = record.balance.saturating_add(amount);
    }

    pub(crate) fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: u128,
    ) -> Result<(), VestaError> {
        if value == 0 {
            return Ok(());
        }
        let balance = self.balance(&from);
        if balance < value {
            return Err(VestaError::InsufficientBalance {
                address: from,
                balance,
                required: value,
            });
        }
        self.account_mut(from).balance = balance - value;
        self.credit(to, value);
        Ok(())
    }

    pub(crate) fn install(&mut self, address: Address, code: Code) -> Result<(), VestaError> {
        if self.has_code(&address) {
            return Err(VestaError::DeploymentCollision { address });
        }
        self.account_mut(address).code = Some(code);
        Ok(())
    }

    pub(crate) fn replace_code(&mut self, address: Address, code: Code) {
        self.account_mut(address).code = Some(code);
    }

    /// Typed state stored under `address`.
    pub fn state<T: StateCell>(&self, address: &Address) -> Option<&T> {
        self.storage
            .get(&(*address, TypeId::of::<T>()))
            .and_then(|slot| slot.0.as_ref().as_any().downcast_ref::<T>())
    }

    pub(crate) fn state_mut<T: StateCell + Default>(&mut self, address: Address) -> &mut T {
        let slot = self
            .storage
            .entry((address, TypeId::of::<T>()))
            .or_insert_with(|| Slot(Box::new(T::default())));
        match slot.0.as_mut().as_any_mut().downcast_mut::<T>() {
            Some(state) => state,
            // Slots are keyed by TypeId, so the downcast always matches.
            None => unreachable!("storage slot type mismatch"),
        }
    }

    pub(crate) fn push_log(&mut self, entry: LogEntry) {
        self.logs.push(entry);
    }

    /// All committed log entries, oldest first.
    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Current ledger timestamp.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub(crate) fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }
}
