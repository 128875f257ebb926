//! The programmable account contract.

use tracing::{debug, info, warn};
use vesta_core::{Address, Event, VestaError};
use vesta_ledger::codec::{self, Interface};
use vesta_ledger::{Contract, Env, Revert};

use crate::execution::zip_module_batch;
use crate::{AccountCall, AccountState, ExecutionAuthority, ModuleRegistry, ValidationDispatcher};

/// Account logic. One value backs every account deployed from it.
///
/// The logic carries a default primary authority; an account may override it
/// through `SetPrimaryAuthority`, after which the override wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartAccount {
    default_authority: Address,
}

impl SmartAccount {
    /// Account logic trusting `default_authority` as primary authority.
    pub fn new(default_authority: Address) -> Self {
        Self { default_authority }
    }

    /// Primary authority accounts start with.
    pub fn default_authority(&self) -> Address {
        self.default_authority
    }

    fn authority(&self, env: &Env<'_>) -> ExecutionAuthority {
        let primary = env
            .state::<AccountState>()
            .map_or(self.default_authority, |state| {
                state.primary_authority_or(self.default_authority)
            });
        ExecutionAuthority::new(primary)
    }

    fn handle(&self, env: &mut Env<'_>, call: AccountCall) -> Result<Vec<u8>, Revert> {
        let authority = self.authority(env);
        match call {
            AccountCall::Init {
                handler,
                module_setup,
                module_setup_data,
            } => init(env, handler, module_setup, &module_setup_data),
            AccountCall::ExecuteAsPrimary {
                target,
                value,
                payload,
            } => authority.execute_as_primary(env, target, value, &payload),
            AccountCall::ExecuteBatchAsPrimary {
                targets,
                values,
                payloads,
            } => {
                let results = authority.execute_batch_as_primary(env, &targets, &values, &payloads)?;
                Ok(codec::encode(&results))
            }
            AccountCall::ExecuteAsModule(execution) => {
                let outcome = authority.execute_as_module(env, &execution)?;
                Ok(codec::encode(&outcome.success))
            }
            AccountCall::ExecuteAsModuleReturnData(execution) => {
                let outcome = authority.execute_as_module(env, &execution)?;
                Ok(codec::encode(&(outcome.success, outcome.return_data)))
            }
            AccountCall::ExecuteBatchAsModule {
                targets,
                values,
                payloads,
                kinds,
            } => {
                authority.require_enabled_module(env, "executeBatchAsModule")?;
                let batch = zip_module_batch(targets, values, payloads, kinds)?;
                let last = authority.execute_batch_as_module(env, &batch)?;
                Ok(codec::encode(&last.success))
            }
            AccountCall::ValidateOperation {
                operation,
                operation_hash,
                missing_funds,
            } => ValidationDispatcher.validate(
                env,
                &authority,
                &operation,
                operation_hash,
                missing_funds,
            ),
            AccountCall::IsValidSignature {
                data_hash,
                signature,
            } => ValidationDispatcher.is_valid_signature(env, data_hash, &signature),
            AccountCall::EnableModule { module } => {
                authority.require_primary_or_self(env, "enableModule")?;
                enable(env, module)?;
                Ok(Vec::new())
            }
            AccountCall::DisableModule { prev, module } => {
                authority.require_primary_or_self(env, "disableModule")?;
                env.state_mut::<AccountState>().registry.disable(prev, module)?;
                env.emit(Event::ModuleDisabled { module });
                debug!(%module, %prev, "module disabled");
                Ok(Vec::new())
            }
            AccountCall::SetupAndEnableModule { setup, setup_data } => {
                authority.require_primary_or_self(env, "setupAndEnableModule")?;
                let module = run_setup(env, setup, &setup_data)?;
                enable(env, module)?;
                Ok(codec::encode(&module))
            }
            AccountCall::IsModuleEnabled { module } => {
                let enabled = env
                    .state::<AccountState>()
                    .is_some_and(|state| state.registry.is_enabled(&module));
                Ok(codec::encode(&enabled))
            }
            AccountCall::ModulesPaginated { start, page_size } => {
                let page_size = usize::try_from(page_size).unwrap_or(usize::MAX);
                let page = match env.state::<AccountState>() {
                    Some(state) => state.registry.paginate(start, page_size)?,
                    None => ModuleRegistry::new().paginate(start, page_size)?,
                };
                Ok(codec::encode(&page))
            }
            AccountCall::SetPrimaryAuthority { authority: next } => {
                authority.require_self(env, "setPrimaryAuthority")?;
                if next.is_zero() {
                    return Err(VestaError::configuration("primary authority cannot be zero").into());
                }
                let previous = authority.primary();
                env.state_mut::<AccountState>().primary_authority = Some(next);
                env.emit(Event::PrimaryAuthorityChanged {
                    previous,
                    current: next,
                });
                info!(account = %env.address(), %previous, current = %next, "primary authority changed");
                Ok(Vec::new())
            }
            AccountCall::PrimaryAuthority => Ok(codec::encode(&authority.primary())),
            AccountCall::UpdateImplementation { logic } => {
                authority.require_self(env, "updateImplementation")?;
                let previous = env.logic_of(&env.address()).unwrap_or(Address::ZERO);
                env.replace_code(logic)?;
                env.emit(Event::ImplementationUpdated {
                    previous,
                    current: logic,
                });
                info!(account = %env.address(), %previous, current = %logic, "implementation updated");
                Ok(Vec::new())
            }
            AccountCall::Implementation => {
                let logic = env.logic_of(&env.address()).unwrap_or(Address::ZERO);
                Ok(codec::encode(&logic))
            }
            AccountCall::FallbackHandler => {
                let handler = env
                    .state::<AccountState>()
                    .map_or(Address::ZERO, |state| state.fallback_handler);
                Ok(codec::encode(&handler))
            }
        }
    }
}

impl Contract for SmartAccount {
    fn name(&self) -> &'static str {
        "smart-account"
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        if input.is_empty() {
            // Plain value receipt.
            return Ok(Vec::new());
        }
        match AccountCall::decode_call(input)? {
            Some(call) => self.handle(env, call),
            None => fallback(env, input),
        }
    }
}

fn init(
    env: &mut Env<'_>,
    handler: Address,
    module_setup: Address,
    module_setup_data: &[u8],
) -> Result<Vec<u8>, Revert> {
    if env.state::<AccountState>().is_some_and(AccountState::is_initialized) {
        warn!(account = %env.address(), "rejected: account already initialized");
        return Err(VestaError::AlreadyInitialized.into());
    }
    if handler.is_zero() {
        return Err(VestaError::configuration("fallback handler cannot be zero").into());
    }
    env.state_mut::<AccountState>().fallback_handler = handler;

    let module = run_setup(env, module_setup, module_setup_data)?;
    env.state_mut::<AccountState>().registry.initialize_with(module)?;
    env.emit(Event::ModuleEnabled { module });
    info!(account = %env.address(), %module, %handler, "account initialized");
    Ok(codec::encode(&module))
}

fn enable(env: &mut Env<'_>, module: Address) -> Result<(), VestaError> {
    env.state_mut::<AccountState>().registry.enable(module)?;
    env.emit(Event::ModuleEnabled { module });
    debug!(%module, "module enabled");
    Ok(())
}

/// Call a setup contract that answers with the module address to enable.
fn run_setup(env: &mut Env<'_>, setup: Address, setup_data: &[u8]) -> Result<Address, Revert> {
    let data = env.call(setup, 0, setup_data, None).into_result()?;
    Ok(codec::decode::<Address>(&data)?)
}

fn fallback(env: &mut Env<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
    let handler = env
        .state::<AccountState>()
        .map_or(Address::ZERO, |state| state.fallback_handler);
    if handler.is_zero() {
        return Err(VestaError::decode("unrecognized call and no fallback handler").into());
    }
    debug!(%handler, "forward to fallback handler");
    env.call(handler, 0, input, None).into_result()
}
