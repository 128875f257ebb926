//! Account deployer contract.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vesta_account::AccountCall;
use vesta_core::{Address, Event, VestaError};
use vesta_ledger::codec::{self, Interface};
use vesta_ledger::{Contract, Env, Revert};

use crate::derivation::{compute_address, sequence_address};

/// Calls the deployer serves. `init_data` is an encoded
/// [`AccountCall::Init`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactoryCall {
    /// Address `DeployDeterministic` would use
    ComputeAddress {
        /// Encoded `AccountCall::Init`
        init_data: Vec<u8>,
        /// Caller-chosen index
        index: u64,
    },
    /// Deploy at the deterministic address and initialize
    DeployDeterministic {
        /// Encoded `AccountCall::Init`
        init_data: Vec<u8>,
        /// Caller-chosen index
        index: u64,
    },
    /// Deploy at an address drawn from the deployer's sequence and initialize
    DeployWithoutIndex {
        /// Encoded `AccountCall::Init`
        init_data: Vec<u8>,
    },
    /// Logic every deployed account points at
    Logic,
}

impl Interface for FactoryCall {
    const NAME: &'static str = "vesta.factory.v1";
}

/// Deployer of accounts backed by one fixed logic address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountFactory {
    logic: Address,
}

impl AccountFactory {
    /// Deployer for accounts running the code at `logic`.
    pub fn new(logic: Address) -> Self {
        Self { logic }
    }

    /// Account logic address.
    pub fn logic(&self) -> Address {
        self.logic
    }

    fn deploy(
        &self,
        env: &mut Env<'_>,
        account: Address,
        init_data: &[u8],
        index: Option<u64>,
    ) -> Result<Vec<u8>, Revert> {
        if !matches!(AccountCall::decode_call(init_data)?, Some(AccountCall::Init { .. })) {
            return Err(VestaError::configuration("initializer must be an account init call").into());
        }
        if let Err(err) = env.create_account(account, self.logic) {
            warn!(%account, %err, "deployment refused");
            return Err(err.into());
        }

        let returned = env.call(account, 0, init_data, None).into_result()?;
        let initial_module: Address = codec::decode(&returned)?;
        env.emit(Event::AccountCreated {
            account,
            initial_module,
            index,
        });
        info!(%account, %initial_module, ?index, logic = %self.logic, "account deployed");
        Ok(codec::encode(&account))
    }
}

impl Contract for AccountFactory {
    fn name(&self) -> &'static str {
        "account-factory"
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let call = FactoryCall::decode_call(input)?
            .ok_or_else(|| VestaError::decode("unrecognized factory call"))?;
        let deployer = env.address();
        match call {
            FactoryCall::ComputeAddress { init_data, index } => Ok(codec::encode(
                &compute_address(&deployer, &self.logic, &init_data, index),
            )),
            FactoryCall::DeployDeterministic { init_data, index } => {
                let account = compute_address(&deployer, &self.logic, &init_data, index);
                self.deploy(env, account, &init_data, Some(index))
            }
            FactoryCall::DeployWithoutIndex { init_data } => {
                let account = sequence_address(&deployer, env.bump_nonce());
                self.deploy(env, account, &init_data, None)
            }
            FactoryCall::Logic => Ok(codec::encode(&self.logic)),
        }
    }
}
