//! Validation dispatcher
//!
//! Routes an operation (or a signature query) to the module named in its
//! signature envelope. The module must be enabled; its answer is passed back
//! untouched. The dispatcher never interprets validation words or magic
//! values, so modules are free to encode validity windows or anything else.

use tracing::{debug, warn};
use vesta_core::{Address, Hash32, Operation, SignatureEnvelope, VestaError};
use vesta_ledger::{codec::Interface, Env, Revert};

use crate::{AccountState, ExecutionAuthority, ModuleCall};

/// Stateless router between the account and its validation modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationDispatcher;

impl ValidationDispatcher {
    /// Validate `operation` through the module named in its envelope, then
    /// settle `missing_funds` with the primary authority.
    pub fn validate(
        &self,
        env: &mut Env<'_>,
        authority: &ExecutionAuthority,
        operation: &Operation,
        operation_hash: Hash32,
        missing_funds: u128,
    ) -> Result<Vec<u8>, Revert> {
        authority.require_primary(env, "validateOperation")?;
        let envelope = operation.envelope()?;
        let module = self.resolve(env, &envelope)?;

        let input = ModuleCall::ValidateOperation {
            operation: operation.clone(),
            operation_hash,
            module_signature: envelope.module_signature,
        }
        .encode_call();
        let verdict = env.call(module, 0, &input, None).into_result()?;
        debug!(%module, %operation_hash, "operation routed");

        if missing_funds > 0 {
            // Best effort: the primary authority settles any shortfall itself.
            let payee = env.caller();
            let paid = env.call(payee, missing_funds, &[], None).success;
            debug!(missing_funds, paid, "prefund");
        }
        Ok(verdict)
    }

    /// Route a signature query to the module named in `signature`.
    pub fn is_valid_signature(
        &self,
        env: &mut Env<'_>,
        data_hash: Hash32,
        signature: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        let envelope = SignatureEnvelope::decode(signature)?;
        let module = self.resolve(env, &envelope)?;

        let input = ModuleCall::IsValidSignature {
            data_hash,
            signature: envelope.module_signature,
        }
        .encode_call();
        let magic = env.call(module, 0, &input, None).into_result()?;
        debug!(%module, %data_hash, "signature query routed");
        Ok(magic)
    }

    fn resolve(&self, env: &Env<'_>, envelope: &SignatureEnvelope) -> Result<Address, VestaError> {
        let module = envelope.module;
        let enabled = env
            .state::<AccountState>()
            .is_some_and(|state| state.registry.is_enabled(&module));
        if !enabled {
            warn!(%module, "rejected: validation module not enabled");
            return Err(VestaError::UnknownValidationModule { module });
        }
        Ok(module)
    }
}
