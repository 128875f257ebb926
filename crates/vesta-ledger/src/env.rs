//! Execution environment handed to a contract for the duration of one frame.

use tracing::{debug, trace};
use vesta_core::{Address, Event, LedgerConfig, LogEntry, VestaError};

use crate::world::{Code, StateCell, World};
use crate::{CallOutcome, Revert};

/// Call frame metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Address whose storage and identity the frame runs under
    pub address: Address,
    /// Address whose code is running
    pub code_address: Address,
    /// Immediate caller
    pub caller: Address,
    /// Value attached to the call
    pub value: u128,
    /// Nesting depth, 1 for the outermost contract frame
    pub depth: usize,
    budget: u64,
}

/// How a nested frame binds storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    /// Callee runs under its own address
    Direct,
    /// Callee code runs under the caller's address, caller and value
    ContextSharing,
}

/// Handle a running contract uses to read and mutate the world.
pub struct Env<'w> {
    world: &'w mut World,
    config: &'w LedgerConfig,
    frame: Frame,
}

impl<'w> Env<'w> {
    pub(crate) fn root(world: &'w mut World, config: &'w LedgerConfig, from: Address, budget: u64) -> Self {
        Self {
            world,
            config,
            frame: Frame {
                address: from,
                code_address: from,
                caller: Address::ZERO,
                value: 0,
                depth: 0,
                budget,
            },
        }
    }

    /// Address the frame runs under.
    pub fn address(&self) -> Address {
        self.frame.address
    }

    /// Address whose code is running. Differs from [`Env::address`] inside a
    /// context-sharing call.
    pub fn code_address(&self) -> Address {
        self.frame.code_address
    }

    /// Immediate caller.
    pub fn caller(&self) -> Address {
        self.frame.caller
    }

    /// Value attached to this call.
    pub fn value(&self) -> u128 {
        self.frame.value
    }

    /// Current frame metadata.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Budget units left in this frame.
    pub fn remaining_budget(&self) -> u64 {
        self.frame.budget
    }

    /// Ledger timestamp.
    pub fn timestamp(&self) -> u64 {
        self.world.timestamp()
    }

    /// Charge `units` against the frame budget.
    pub fn consume(&mut self, units: u64) -> Result<(), Revert> {
        if self.frame.budget < units {
            return Err(VestaError::OutOfBudget {
                required: units,
                remaining: self.frame.budget,
            }
            .into());
        }
        self.frame.budget -= units;
        Ok(())
    }

    /// Balance of `address`.
    pub fn balance_of(&self, address: &Address) -> u128 {
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

    /// Typed state under the frame's address.
    pub fn state<T: StateCell>(&self) -> Option<&T> {
        self.world.state::<T>(&self.frame.address)
    }

    /// Typed state under the frame's address, created with `Default` on first
    /// access.
    pub fn state_mut<T: StateCell + Default>(&mut self) -> &mut T {
        self.world.state_mut::<T>(self.frame.address)
    }

    /// Record an event emitted by the frame's address.
    pub fn emit(&mut self, event: Event) {
        trace!(emitter = %self.frame.address, event = event.name(), "emit");
        self.world.push_log(LogEntry {
            emitter: self.frame.address,
            event,
        });
    }

    /// Advance the frame address's sequence counter, returning the value
    /// before the increment.
    pub fn bump_nonce(&mut self) -> u64 {
        let record = self.world.account_mut(self.frame.address);
        let current = record.nonce;
        record.nonce = current.saturating_add(1);
        current
    }

    /// Install a copy of the code at `logic` under `address`.
    ///
    /// Fails with `DeploymentCollision` when `address` already holds code.
    pub fn create_account(&mut self, address: Address, logic: Address) -> Result<(), VestaError> {
        let code = self
            .world
            .code(&logic)
            .ok_or_else(|| VestaError::invalid(format!("no code at logic address {logic}")))?;
        self.world.install(
            address,
            Code {
                logic,
                contract: code.contract,
            },
        )?;
        debug!(%address, %logic, "account created");
        Ok(())
    }

    /// Replace the code of the frame's address with the code at `logic`.
    pub fn replace_code(&mut self, logic: Address) -> Result<(), VestaError> {
        let code = self
            .world
            .code(&logic)
            .ok_or_else(|| VestaError::invalid(format!("no code at logic address {logic}")))?;
        self.world.replace_code(
            self.frame.address,
            Code {
                logic,
                contract: code.contract,
            },
        );
        Ok(())
    }

    /// Call `target` with `value` attached.
    ///
    /// `budget` caps what the callee may spend; `None` forwards everything
    /// left. A failed callee leaves no trace in the world.
    pub fn call(
        &mut self,
        target: Address,
        value: u128,
        input: &[u8],
        budget: Option<u64>,
    ) -> CallOutcome {
        self.dispatch(FrameKind::Direct, target, value, input, budget)
    }

    /// Run the code at `target` against this frame's storage, caller and
    /// value.
    pub fn delegate_call(&mut self, target: Address, input: &[u8], budget: Option<u64>) -> CallOutcome {
        self.dispatch(FrameKind::ContextSharing, target, 0, input, budget)
    }

    fn dispatch(
        &mut self,
        kind: FrameKind,
        target: Address,
        value: u128,
        input: &[u8],
        budget: Option<u64>,
    ) -> CallOutcome {
        if let Err(revert) = self.consume(self.config.call_cost) {
            return CallOutcome::failure(revert);
        }
        let depth = self.frame.depth + 1;
        if depth > self.config.max_call_depth {
            return CallOutcome::failure(VestaError::CallDepthExceeded { depth }.into());
        }

        let limit = budget.unwrap_or(self.frame.budget).min(self.frame.budget);
        let child = match kind {
            FrameKind::Direct => Frame {
                address: target,
                code_address: target,
                caller: self.frame.address,
                value,
                depth,
                budget: limit,
            },
            FrameKind::ContextSharing => Frame {
                address: self.frame.address,
                code_address: target,
                caller: self.frame.caller,
                value: self.frame.value,
                depth,
                budget: limit,
            },
        };

        let snapshot = self.world.clone();
        let (result, remaining) = self.run_child(kind, child, value, input);
        self.frame.budget -= limit - remaining;

        match result {
            Ok(data) => CallOutcome::success(data),
            Err(revert) => {
                debug!(target = %target, depth, revert = ?revert, "frame reverted");
                *self.world = snapshot;
                CallOutcome::failure(revert)
            }
        }
    }

    fn run_child(
        &mut self,
        kind: FrameKind,
        child: Frame,
        value: u128,
        input: &[u8],
    ) -> (Result<Vec<u8>, Revert>, u64) {
        if kind == FrameKind::Direct {
            if let Err(err) = self.world.transfer(self.frame.address, child.address, value) {
                return (Err(err.into()), child.budget);
            }
        }

        let Some(code) = self.world.code(&child.code_address) else {
            // Plain signer or empty address: nothing to run.
            return (Ok(Vec::new()), child.budget);
        };

        trace!(
            contract = code.contract.name(),
            address = %child.address,
            caller = %child.caller,
            depth = child.depth,
            "enter frame"
        );
        let mut env = Env {
            world: &mut *self.world,
            config: self.config,
            frame: child,
        };
        let result = code.contract.call(&mut env, input);
        (result, env.frame.budget)
    }
}
