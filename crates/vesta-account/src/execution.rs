//! Execution authority
//!
//! Decides who may make the account issue calls and performs them. Three
//! caller classes are recognized:
//!
//! - **primary authority**: drives top-level operations; its calls fail hard,
//!   so a failing callee reverts the whole operation with the callee's revert
//!   data.
//! - **self**: the account calling itself, used for administrative changes.
//! - **enabled module**: its calls fail soft. The outcome is reported as a
//!   flag and a `ModuleExecutionSuccess` / `ModuleExecutionFailure` event, and
//!   the enclosing operation carries on.
//!
//! Context-sharing calls are reachable only through the module path.

use tracing::{debug, warn};
use vesta_core::{Address, Event, VestaError};
use vesta_ledger::{CallOutcome, Env, Revert};

use crate::{AccountState, ModuleExecution, OperationKind};

/// Caller class of the current frame, relative to the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerClass {
    /// The primary authority
    PrimaryAuthority,
    /// The account itself
    SelfCall,
    /// A module enabled in the registry
    Module,
    /// Anyone else
    Unprivileged,
}

/// Caller checks and call execution for one account frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionAuthority {
    primary: Address,
}

fn module_enabled(env: &Env<'_>, module: &Address) -> bool {
    env.state::<AccountState>()
        .is_some_and(|state| state.registry.is_enabled(module))
}

impl ExecutionAuthority {
    /// Authority checks against the given effective primary authority.
    pub fn new(primary: Address) -> Self {
        Self { primary }
    }

    /// Effective primary authority.
    pub fn primary(&self) -> Address {
        self.primary
    }

    /// Classify the caller of the current frame.
    pub fn classify(&self, env: &Env<'_>) -> CallerClass {
        let caller = env.caller();
        if caller == env.address() {
            CallerClass::SelfCall
        } else if caller == self.primary {
            CallerClass::PrimaryAuthority
        } else if module_enabled(env, &caller) {
            CallerClass::Module
        } else {
            CallerClass::Unprivileged
        }
    }

    /// Require the primary authority.
    pub fn require_primary(&self, env: &Env<'_>, action: &str) -> Result<(), VestaError> {
        if env.caller() == self.primary {
            return Ok(());
        }
        warn!(caller = %env.caller(), action, "rejected: primary authority required");
        Err(VestaError::authorization(format!(
            "{action}: caller {} is not the primary authority",
            env.caller()
        )))
    }

    /// Require the primary authority or the account itself.
    pub fn require_primary_or_self(&self, env: &Env<'_>, action: &str) -> Result<(), VestaError> {
        match self.classify(env) {
            CallerClass::PrimaryAuthority | CallerClass::SelfCall => Ok(()),
            class => {
                warn!(caller = %env.caller(), ?class, action, "rejected: primary or self required");
                Err(VestaError::authorization(format!(
                    "{action}: caller {} is neither the primary authority nor the account",
                    env.caller()
                )))
            }
        }
    }

    /// Require the account itself.
    pub fn require_self(&self, env: &Env<'_>, action: &str) -> Result<(), VestaError> {
        if env.caller() == env.address() {
            return Ok(());
        }
        warn!(caller = %env.caller(), action, "rejected: self call required");
        Err(VestaError::authorization(format!(
            "{action}: only the account may call"
        )))
    }

    /// Require an enabled module, returning it.
    pub fn require_enabled_module(&self, env: &Env<'_>, action: &str) -> Result<Address, VestaError> {
        let caller = env.caller();
        if module_enabled(env, &caller) {
            return Ok(caller);
        }
        warn!(%caller, action, "rejected: caller is not an enabled module");
        Err(VestaError::authorization(format!(
            "{action}: caller {caller} is not an enabled module"
        )))
    }

    /// Single hard-failing call.
    pub fn execute_as_primary(
        &self,
        env: &mut Env<'_>,
        target: Address,
        value: u128,
        payload: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        self.require_primary_or_self(env, "executeAsPrimary")?;
        let outcome = env.call(target, value, payload, None);
        debug!(%target, value, success = outcome.success, "execute as primary");
        outcome.into_result()
    }

    /// Sequential hard-failing calls. `values` may be empty for all zero.
    pub fn execute_batch_as_primary(
        &self,
        env: &mut Env<'_>,
        targets: &[Address],
        values: &[u128],
        payloads: &[Vec<u8>],
    ) -> Result<Vec<Vec<u8>>, Revert> {
        self.require_primary_or_self(env, "executeBatchAsPrimary")?;
        if targets.is_empty()
            || payloads.len() != targets.len()
            || !(values.is_empty() || values.len() == targets.len())
        {
            return Err(VestaError::MalformedBatch {
                targets: targets.len(),
                values: values.len(),
                payloads: payloads.len(),
                kinds: 0,
            }
            .into());
        }

        let mut results = Vec::with_capacity(targets.len());
        for (i, (target, payload)) in targets.iter().zip(payloads).enumerate() {
            let value = values.get(i).copied().unwrap_or(0);
            results.push(env.call(*target, value, payload, None).into_result()?);
        }
        debug!(calls = targets.len(), "execute batch as primary");
        Ok(results)
    }

    /// Single soft-failing call on behalf of the calling module.
    pub fn execute_as_module(
        &self,
        env: &mut Env<'_>,
        execution: &ModuleExecution,
    ) -> Result<CallOutcome, Revert> {
        let module = self.require_enabled_module(env, "executeAsModule")?;
        Ok(run_module_call(env, module, execution))
    }

    /// Sequential soft-failing calls. Only the last outcome is returned; the
    /// per-call outcomes are in the emitted events.
    pub fn execute_batch_as_module(
        &self,
        env: &mut Env<'_>,
        executions: &[ModuleExecution],
    ) -> Result<CallOutcome, Revert> {
        let module = self.require_enabled_module(env, "executeBatchAsModule")?;
        let mut last = None;
        for execution in executions {
            last = Some(run_module_call(env, module, execution));
        }
        last.ok_or_else(|| {
            VestaError::MalformedBatch {
                targets: 0,
                values: 0,
                payloads: 0,
                kinds: 0,
            }
            .into()
        })
    }
}

fn run_module_call(env: &mut Env<'_>, module: Address, execution: &ModuleExecution) -> CallOutcome {
    let outcome = match execution.kind {
        OperationKind::DirectCall => env.call(
            execution.target,
            execution.value,
            &execution.payload,
            execution.budget,
        ),
        OperationKind::ContextSharingCall => {
            env.delegate_call(execution.target, &execution.payload, execution.budget)
        }
    };

    if outcome.success {
        env.emit(Event::ModuleExecutionSuccess { module });
    } else {
        env.emit(Event::ModuleExecutionFailure { module });
    }
    debug!(
        %module,
        target = %execution.target,
        kind = ?execution.kind,
        success = outcome.success,
        "execute as module"
    );
    outcome
}

/// Zip the parallel batch sequences, rejecting empty or ragged input.
pub fn zip_module_batch(
    targets: Vec<Address>,
    values: Vec<u128>,
    payloads: Vec<Vec<u8>>,
    kinds: Vec<OperationKind>,
) -> Result<Vec<ModuleExecution>, VestaError> {
    let n = targets.len();
    if n == 0 || values.len() != n || payloads.len() != n || kinds.len() != n {
        return Err(VestaError::MalformedBatch {
            targets: n,
            values: values.len(),
            payloads: payloads.len(),
            kinds: kinds.len(),
        });
    }
    Ok(targets
        .into_iter()
        .zip(values)
        .zip(payloads)
        .zip(kinds)
        .map(|(((target, value), payload), kind)| ModuleExecution {
            target,
            value,
            payload,
            kind,
            budget: None,
        })
        .collect())
}
