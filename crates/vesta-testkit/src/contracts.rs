//! Mock contracts
//!
//! - [`Recorder`] records every call it receives and echoes the input.
//! - [`Reverter`] always fails with a fixed error.
//! - [`Relay`] forwards calls, so tests can make any contract the caller of
//!   another (a module calling its account, for instance).

use serde::{Deserialize, Serialize};
use vesta_core::{Address, VestaError};
use vesta_ledger::codec::{self, Interface};
use vesta_ledger::{Contract, Env, Ledger, Revert};

/// One call seen by a [`Recorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Immediate caller
    pub caller: Address,
    /// Value attached
    pub value: u128,
    /// Raw input
    pub input: Vec<u8>,
    /// Ledger timestamp at the call
    pub timestamp: u64,
}

/// Storage written by a [`Recorder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedCalls(pub Vec<RecordedCall>);

/// Records calls under the frame address and echoes the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recorder;

impl Contract for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let call = RecordedCall {
            caller: env.caller(),
            value: env.value(),
            input: input.to_vec(),
            timestamp: env.timestamp(),
        };
        env.state_mut::<RecordedCalls>().0.push(call);
        Ok(input.to_vec())
    }
}

/// Calls recorded under `address`.
pub fn recorded_calls(ledger: &Ledger, address: &Address) -> Vec<RecordedCall> {
    ledger
        .state::<RecordedCalls>(address)
        .map(|calls| calls.0.clone())
        .unwrap_or_default()
}

/// Fails every call with `error`.
#[derive(Debug, Clone)]
pub struct Reverter {
    error: VestaError,
}

impl Reverter {
    /// Reverter failing with `error`.
    pub fn new(error: VestaError) -> Self {
        Self { error }
    }
}

impl Default for Reverter {
    fn default() -> Self {
        Self::new(VestaError::execution_failed("reverter"))
    }
}

impl Contract for Reverter {
    fn name(&self) -> &'static str {
        "reverter"
    }

    fn call(&self, _env: &mut Env<'_>, _input: &[u8]) -> Result<Vec<u8>, Revert> {
        Err(self.error.clone().into())
    }
}

/// Calls a [`Relay`] serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelayCall {
    /// Call `to` and pass its result back, reverting if it reverts
    Forward {
        /// Callee
        to: Address,
        /// Value to attach
        value: u128,
        /// Callee input
        payload: Vec<u8>,
    },
    /// Return the relay's own address; usable as module setup data
    Announce,
}

impl Interface for RelayCall {
    const NAME: &'static str = "vesta.testkit.relay.v1";
}

impl RelayCall {
    /// Forward `payload` to `to` without value.
    pub fn forward(to: Address, payload: Vec<u8>) -> Vec<u8> {
        Self::Forward {
            to,
            value: 0,
            payload,
        }
        .encode_call()
    }
}

/// Forwards calls on request.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relay;

impl Contract for Relay {
    fn name(&self) -> &'static str {
        "relay"
    }

    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        match RelayCall::decode_call(input)? {
            Some(RelayCall::Forward { to, value, payload }) => {
                env.call(to, value, &payload, None).into_result()
            }
            Some(RelayCall::Announce) => Ok(codec::encode(&env.address())),
            None => Err(VestaError::decode("unrecognized relay call").into()),
        }
    }
}
