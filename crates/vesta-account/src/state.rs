//! Per-account storage.

use vesta_core::Address;

use crate::ModuleRegistry;

/// Everything a `SmartAccount` persists under its own address.
#[derive(Debug, Clone, Default)]
pub struct AccountState {
    /// Enabled modules
    pub registry: ModuleRegistry,
    /// Receiver of calls the account does not understand, zero until `init`
    pub fallback_handler: Address,
    /// Override of the logic's default primary authority
    pub primary_authority: Option<Address>,
}

impl AccountState {
    /// Whether `init` already ran (or an equivalent state was reached).
    pub fn is_initialized(&self) -> bool {
        self.registry.is_initialized() || !self.fallback_handler.is_zero()
    }

    /// Effective primary authority given the logic's default.
    pub fn primary_authority_or(&self, default: Address) -> Address {
        self.primary_authority.unwrap_or(default)
    }
}
