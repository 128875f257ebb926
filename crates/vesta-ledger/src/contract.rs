//! Contract trait and call results.

use serde::de::DeserializeOwned;
use std::fmt;
use vesta_core::{Result, VestaError};

use crate::{codec, Env};

/// Code that can live at a ledger address.
///
/// Implementations are stateless: anything that must persist between calls
/// is kept in ledger storage through [`Env::state_mut`]. The same code value
/// can therefore back any number of addresses.
pub trait Contract: Send + Sync + fmt::Debug {
    /// Human readable name, used in logs.
    fn name(&self) -> &'static str;

    /// Handle one call. Returning `Err` rolls back everything the frame did.
    fn call(&self, env: &mut Env<'_>, input: &[u8]) -> std::result::Result<Vec<u8>, Revert>;
}

/// Revert payload returned by a failing frame.
#[derive(Clone, PartialEq, Eq)]
pub struct Revert {
    /// Raw revert data, passed through callers verbatim
    pub data: Vec<u8>,
}

impl Revert {
    /// Revert with raw bytes.
    pub fn raw(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Decode the payload as a `VestaError`, if it is one.
    pub fn error(&self) -> Option<VestaError> {
        VestaError::from_revert_data(&self.data)
    }
}

impl From<VestaError> for Revert {
    fn from(err: VestaError) -> Self {
        Self {
            data: err.to_revert_data(),
        }
    }
}

impl fmt::Debug for Revert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error() {
            Some(err) => write!(f, "Revert({err})"),
            None => write!(f, "Revert({} raw bytes)", self.data.len()),
        }
    }
}

/// Outcome of a nested call as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOutcome {
    /// Whether the callee frame committed
    pub success: bool,
    /// Return data on success, revert data on failure
    pub return_data: Vec<u8>,
}

impl CallOutcome {
    /// Successful outcome.
    pub fn success(return_data: Vec<u8>) -> Self {
        Self {
            success: true,
            return_data,
        }
    }

    /// Failed outcome carrying revert data.
    pub fn failure(revert: Revert) -> Self {
        Self {
            success: false,
            return_data: revert.data,
        }
    }

    /// Convert into a `Result`, keeping revert data verbatim.
    pub fn into_result(self) -> std::result::Result<Vec<u8>, Revert> {
        if self.success {
            Ok(self.return_data)
        } else {
            Err(Revert::raw(self.return_data))
        }
    }

    /// Decoded error of a failed outcome.
    pub fn error(&self) -> Option<VestaError> {
        if self.success {
            None
        } else {
            VestaError::from_revert_data(&self.return_data)
        }
    }

    /// Decode the return data of a successful outcome.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        if !self.success {
            return Err(self.error().unwrap_or_else(|| {
                VestaError::execution_failed("call reverted with foreign data")
            }));
        }
        codec::decode(&self.return_data)
    }
}
