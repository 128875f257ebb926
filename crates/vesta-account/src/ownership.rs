//! Single-key validation module.
//!
//! Each account registers one owner. Operations and signature queries are
//! accepted when signed by the calling account's owner.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use vesta_core::{
    Address, Ed25519Verifier, Event, Hash32, SeenOperations, SignatureMagic, SignatureVerifier,
    ValidationData, Verification, VestaError,
};
use vesta_ledger::codec::{self, Interface};
use vesta_ledger::{Contract, Env, Revert};

use crate::ModuleCall;

/// Ownership management calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnershipCall {
    /// Register the caller's owner. Returns the module address, so the call
    /// doubles as account setup data.
    InitForAccount {
        /// First owner
        owner: Address,
    },
    /// Replace the caller's owner
    TransferOwnership {
        /// New owner
        new_owner: Address,
    },
    /// Owner registered for `account`
    OwnerOf {
        /// Account to look up
        account: Address,
    },
}

impl Interface for OwnershipCall {
    const NAME: &'static str = "vesta.ownership.v1";
}

#[derive(Debug, Clone, Default)]
struct OwnershipState {
    owners: HashMap<Address, Address>,
    seen: SeenOperations,
}

/// Key-ownership validation module.
#[derive(Debug, Clone)]
pub struct KeyOwnershipModule {
    verifier: Arc<dyn SignatureVerifier>,
}

impl Default for KeyOwnershipModule {
    fn default() -> Self {
        Self::new(Arc::new(Ed25519Verifier))
    }
}

impl KeyOwnershipModule {
    /// Module verifying signatures with `verifier`.
    pub fn new(verifier: Arc<dyn SignatureVerifier>) -> Self {
        Self { verifier }
    }

    fn owner_of(env: &Env<'_>, account: &Address) -> Option<Address> {
        env.state::<OwnershipState>()
            .and_then(|state| state.owners.get(account).copied())
    }

    fn signed_by_owner(&self, env: &Env<'_>, digest: &Hash32, signature: &[u8]) -> Verification {
        let verification = self.verifier.verify(digest, signature);
        match (verification.signer(), Self::owner_of(env, &env.caller())) {
            (Some(signer), Some(owner)) if signer == owner => verification,
            _ => Verification::Invalid,
        }
    }

    fn handle_ownership(&self, env: &mut Env<'_>, call: OwnershipCall) -> Result<Vec<u8>, Revert> {
        let account = env.caller();
        match call {
            OwnershipCall::InitForAccount { owner } => {
                if Self::owner_of(env, &account).is_some() {
                    return Err(VestaError::AlreadyInitialized.into());
                }
                set_owner(env, account, owner)?;
                Ok(codec::encode(&env.address()))
            }
            OwnershipCall::TransferOwnership { new_owner } => {
                if Self::owner_of(env, &account).is_none() {
                    return Err(VestaError::authorization(format!(
                        "{account} has no registered owner"
                    ))
                    .into());
                }
                set_owner(env, account, new_owner)?;
                Ok(Vec::new())
            }
            OwnershipCall::OwnerOf { account } => {
                let owner = Self::owner_of(env, &account).unwrap_or(Address::ZERO);
                Ok(codec::encode(&owner))
            }
        }
    }

    fn handle_module(&self, env: &mut Env<'_>, call: ModuleCall) -> Vec<u8> {
        match call {
            ModuleCall::ValidateOperation {
                operation_hash,
                module_signature,
                ..
            } => {
                if env
                    .state_mut::<OwnershipState>()
                    .seen
                    .mark(operation_hash)
                    .is_err()
                {
                    warn!(%operation_hash, "rejected: operation hash already seen");
                    return codec::encode(&ValidationData::SIG_VALIDATION_FAILED);
                }
                let verdict = match self.signed_by_owner(env, &operation_hash, &module_signature) {
                    Verification::Valid { window, .. } => ValidationData::accepted(window),
                    Verification::Invalid => ValidationData::SIG_VALIDATION_FAILED,
                };
                debug!(account = %env.caller(), accepted = verdict.is_accepted(), "validate operation");
                codec::encode(&verdict)
            }
            ModuleCall::IsValidSignature {
                data_hash,
                signature,
            } => {
                let valid = matches!(
                    self.signed_by_owner(env, &data_hash, &signature),
                    Verification::Valid { .. }
                );
                codec::encode(&SignatureMagic::from_verdict(valid))
            }
        }
    }
}

fn set_owner(env: &mut Env<'_>, account: Address, owner: Address) -> Result<(), VestaError> {
    if !owner.is_assignable() {
        return Err(VestaError::configuration(format!("invalid owner {owner}")));
    }
    let previous = env
        .state_mut::<OwnershipState>()
        .owners
        .insert(account, owner)
        .unwrap_or(Address::ZERO);
    env.emit(Event::OwnershipTransferred {
        account,
        previous,
        current: owner,
    });
    debug!(%account, %previous, current = %owner, "owner set");
    Ok(())
}

impl Contract for KeyOwnershipModule {
    fn name(&self) -> &'static str {
        "key-ownership-module"
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        if let Some(call) = ModuleCall::decode_call(input)? {
            return Ok(self.handle_module(env, call));
        }
        match OwnershipCall::decode_call(input)? {
            Some(call) => self.handle_ownership(env, call),
            None => Err(VestaError::decode("unrecognized ownership module call").into()),
        }
    }
}
