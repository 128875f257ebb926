//! Social recovery module
//!
//! Each account that runs `Setup` gets a friend set. Friends confirm a
//! proposed new primary authority; once enough current friends confirmed,
//! any friend may trigger `Recover`, which has the account overwrite its
//! primary authority through the module execution path and advances the
//! account's recovery nonce. The nonce is part of the recovery hash, so every
//! consumed request is retired for good.
//!
//! Per `(account, proposed)` pair under the current nonce:
//!
//! ```text
//! Unstarted -> PartiallyConfirmed -> Executable -> Executed
//! ```
//!
//! The module also validates operations signed by a current friend of the
//! sending account, guarded by a one-time operation hash set.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};
use vesta_account::{AccountCall, ModuleCall, ModuleExecution};
use vesta_core::{
    Address, ConfigValidation, Ed25519Verifier, Event, Hash32, RecoveryConfig, Result,
    SeenOperations, SignatureMagic, SignatureVerifier, ValidationData, Verification, VestaError,
};
use vesta_ledger::codec::{self, Interface};
use vesta_ledger::{Contract, Env, Revert};

use crate::types::{recovery_hash, FriendSet, RecoveryStatus};

type CallResult = std::result::Result<Vec<u8>, Revert>;

/// Calls the recovery module serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryCall {
    /// Store the caller's friend set. Returns the module address, so the call
    /// doubles as account setup data.
    Setup {
        /// Distinct, non-zero friends
        friends: Vec<Address>,
        /// Required confirmations
        threshold: usize,
    },
    /// Confirm `proposed` as the new primary authority of `account`
    Confirm {
        /// Account under recovery
        account: Address,
        /// Proposed primary authority
        proposed: Address,
    },
    /// Execute a confirmed recovery
    Recover {
        /// Account under recovery
        account: Address,
        /// Proposed primary authority
        proposed: Address,
    },
    /// Whether the current request reached the threshold
    IsConfirmedByRequiredFriends {
        /// Account under recovery
        account: Address,
        /// Proposed primary authority
        proposed: Address,
    },
    /// Confirmations counted for the current request
    ConfirmationCount {
        /// Account under recovery
        account: Address,
        /// Proposed primary authority
        proposed: Address,
    },
    /// Recovery hash for arbitrary inputs
    RecoveryHash {
        /// Account under recovery
        account: Address,
        /// Proposed primary authority
        proposed: Address,
        /// Recovery nonce
        nonce: u64,
    },
    /// Current recovery nonce of `account`
    RecoveryNonce {
        /// Account to look up
        account: Address,
    },
    /// State of a request under a given nonce
    Status {
        /// Account under recovery
        account: Address,
        /// Proposed primary authority
        proposed: Address,
        /// Recovery nonce
        nonce: u64,
    },
    /// Friends of `account`
    FriendsOf {
        /// Account to look up
        account: Address,
    },
    /// Threshold of `account`, zero when not set up
    ThresholdOf {
        /// Account to look up
        account: Address,
    },
}

impl Interface for RecoveryCall {
    const NAME: &'static str = "vesta.recovery.v1";
}

#[derive(Debug, Clone, Default)]
struct RecoveryState {
    friend_sets: HashMap<Address, FriendSet>,
    confirmations: HashMap<Hash32, BTreeSet<Address>>,
    executed: HashSet<Hash32>,
    nonces: HashMap<Address, u64>,
    seen: SeenOperations,
}

impl RecoveryState {
    fn nonce(&self, account: &Address) -> u64 {
        self.nonces.get(account).copied().unwrap_or(0)
    }

    fn is_friend(&self, account: &Address, caller: &Address) -> bool {
        self.friend_sets
            .get(account)
            .is_some_and(|set| set.contains(caller))
    }
}

/// Threshold social recovery module.
#[derive(Debug, Clone)]
pub struct SocialRecoveryModule {
    verifier: Arc<dyn SignatureVerifier>,
    config: RecoveryConfig,
}

impl Default for SocialRecoveryModule {
    fn default() -> Self {
        Self {
            verifier: Arc::new(Ed25519Verifier),
            config: RecoveryConfig::default(),
        }
    }
}

impl SocialRecoveryModule {
    /// Module with an explicit verifier and configuration.
    pub fn new(verifier: Arc<dyn SignatureVerifier>, config: RecoveryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { verifier, config })
    }

    /// Active configuration.
    pub fn config(&self) -> &RecoveryConfig {
        &self.config
    }

    fn state<'a>(env: &'a Env<'_>) -> Option<&'a RecoveryState> {
        env.state::<RecoveryState>()
    }

    /// Confirmations that count toward the threshold for `hash`.
    fn count(&self, state: &RecoveryState, account: &Address, hash: &Hash32) -> usize {
        let Some(confirmers) = state.confirmations.get(hash) else {
            return 0;
        };
        if !self.config.revalidate_membership {
            return confirmers.len();
        }
        confirmers
            .iter()
            .filter(|friend| state.is_friend(account, friend))
            .count()
    }

    fn current_count(&self, env: &Env<'_>, account: &Address, proposed: &Address) -> usize {
        Self::state(env).map_or(0, |state| {
            let hash = recovery_hash(account, proposed, state.nonce(account));
            self.count(state, account, &hash)
        })
    }

    fn threshold_of(env: &Env<'_>, account: &Address) -> usize {
        Self::state(env)
            .and_then(|state| state.friend_sets.get(account))
            .map_or(0, FriendSet::threshold)
    }

    fn require_friend(env: &Env<'_>, account: &Address) -> std::result::Result<(), VestaError> {
        let caller = env.caller();
        if Self::state(env).is_some_and(|state| state.is_friend(account, &caller)) {
            return Ok(());
        }
        warn!(%caller, %account, "rejected: not a friend");
        Err(VestaError::NotAFriend {
            caller,
            account: *account,
        })
    }

    fn setup(&self, env: &mut Env<'_>, friends: Vec<Address>, threshold: usize) -> CallResult {
        let account = env.caller();
        let set = FriendSet::new(friends, threshold, &self.config)?;
        let friends = set.len();
        env.state_mut::<RecoveryState>()
            .friend_sets
            .insert(account, set);
        env.emit(Event::RecoverySetup {
            account,
            friends,
            threshold,
        });
        info!(%account, friends, threshold, "recovery set up");
        Ok(codec::encode(&env.address()))
    }

    fn confirm(&self, env: &mut Env<'_>, account: Address, proposed: Address) -> CallResult {
        Self::require_friend(env, &account)?;
        let friend = env.caller();
        let state = env.state_mut::<RecoveryState>();
        let hash = recovery_hash(&account, &proposed, state.nonce(&account));
        let fresh = state.confirmations.entry(hash).or_default().insert(friend);
        if fresh {
            env.emit(Event::RecoveryConfirmed {
                account,
                friend,
                recovery_hash: hash,
            });
        }
        debug!(%account, %friend, %hash, fresh, "recovery confirmed");
        Ok(Vec::new())
    }

    fn recover(&self, env: &mut Env<'_>, account: Address, proposed: Address) -> CallResult {
        Self::require_friend(env, &account)?;
        if proposed.is_zero() {
            return Err(VestaError::configuration("proposed authority cannot be zero").into());
        }

        let threshold = Self::threshold_of(env, &account);
        let confirmed = self.current_count(env, &account, &proposed);
        if confirmed < threshold {
            warn!(%account, confirmed, threshold, "rejected: insufficient approvals");
            return Err(VestaError::InsufficientApprovals {
                confirmed,
                threshold,
            }
            .into());
        }

        // Retire the request before handing control to the account.
        let state = env.state_mut::<RecoveryState>();
        let nonce = state.nonce(&account);
        let hash = recovery_hash(&account, &proposed, nonce);
        state.confirmations.remove(&hash);
        state.executed.insert(hash);
        let next_nonce = nonce + 1;
        state.nonces.insert(account, next_nonce);

        let overwrite = AccountCall::SetPrimaryAuthority {
            authority: proposed,
        }
        .encode_call();
        let input = AccountCall::ExecuteAsModule(ModuleExecution::direct(account, 0, overwrite))
            .encode_call();
        let succeeded: bool = env.call(account, 0, &input, None).decode()?;
        if !succeeded {
            return Err(VestaError::execution_failed(format!(
                "account {account} refused the primary authority change"
            ))
            .into());
        }

        env.emit(Event::RecoveryExecuted {
            account,
            new_authority: proposed,
            nonce: next_nonce,
        });
        info!(%account, new_authority = %proposed, nonce = next_nonce, "recovery executed");
        Ok(Vec::new())
    }

    fn status(&self, env: &Env<'_>, account: &Address, proposed: &Address, nonce: u64) -> RecoveryStatus {
        let Some(state) = Self::state(env) else {
            return RecoveryStatus::Unstarted;
        };
        let hash = recovery_hash(account, proposed, nonce);
        if state.executed.contains(&hash) {
            return RecoveryStatus::Executed;
        }
        let threshold = state.friend_sets.get(account).map_or(0, FriendSet::threshold);
        match self.count(state, account, &hash) {
            0 => RecoveryStatus::Unstarted,
            n if threshold > 0 && n >= threshold && nonce == state.nonce(account) => {
                RecoveryStatus::Executable
            }
            _ => RecoveryStatus::PartiallyConfirmed,
        }
    }

    fn signed_by_friend(&self, env: &Env<'_>, digest: &Hash32, signature: &[u8]) -> Verification {
        let verification = self.verifier.verify(digest, signature);
        let account = env.caller();
        match verification.signer() {
            Some(signer) if Self::state(env).is_some_and(|s| s.is_friend(&account, &signer)) => {
                verification
            }
            _ => Verification::Invalid,
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
                    .state_mut::<RecoveryState>()
                    .seen
                    .mark(operation_hash)
                    .is_err()
                {
                    warn!(%operation_hash, "rejected: operation hash already seen");
                    return codec::encode(&ValidationData::SIG_VALIDATION_FAILED);
                }
                let verdict = match self.signed_by_friend(env, &operation_hash, &module_signature) {
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
                    self.signed_by_friend(env, &data_hash, &signature),
                    Verification::Valid { .. }
                );
                codec::encode(&SignatureMagic::from_verdict(valid))
            }
        }
    }

    fn handle(&self, env: &mut Env<'_>, call: RecoveryCall) -> CallResult {
        match call {
            RecoveryCall::Setup { friends, threshold } => self.setup(env, friends, threshold),
            RecoveryCall::Confirm { account, proposed } => self.confirm(env, account, proposed),
            RecoveryCall::Recover { account, proposed } => self.recover(env, account, proposed),
            RecoveryCall::IsConfirmedByRequiredFriends { account, proposed } => {
                let threshold = Self::threshold_of(env, &account);
                let confirmed = threshold > 0 && self.current_count(env, &account, &proposed) >= threshold;
                Ok(codec::encode(&confirmed))
            }
            RecoveryCall::ConfirmationCount { account, proposed } => {
                let count = self.current_count(env, &account, &proposed) as u64;
                Ok(codec::encode(&count))
            }
            RecoveryCall::RecoveryHash {
                account,
                proposed,
                nonce,
            } => Ok(codec::encode(&recovery_hash(&account, &proposed, nonce))),
            RecoveryCall::RecoveryNonce { account } => {
                let nonce = Self::state(env).map_or(0, |state| state.nonce(&account));
                Ok(codec::encode(&nonce))
            }
            RecoveryCall::Status {
                account,
                proposed,
                nonce,
            } => Ok(codec::encode(&self.status(env, &account, &proposed, nonce))),
            RecoveryCall::FriendsOf { account } => {
                let friends = Self::state(env)
                    .and_then(|state| state.friend_sets.get(&account))
                    .map(|set| set.friends().to_vec())
                    .unwrap_or_default();
                Ok(codec::encode(&friends))
            }
            RecoveryCall::ThresholdOf { account } => {
                Ok(codec::encode(&(Self::threshold_of(env, &account) as u64)))
            }
        }
    }
}

impl Contract for SocialRecoveryModule {
    fn name(&self) -> &'static str {
        "social-recovery-module"
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> CallResult {
        if let Some(call) = ModuleCall::decode_call(input)? {
            return Ok(self.handle_module(env, call));
        }
        match RecoveryCall::decode_call(input)? {
            Some(call) => self.handle(env, call),
            None => Err(VestaError::decode("unrecognized recovery module call").into()),
        }
    }
}
