//! Ledger addresses
//!
//! A 20-byte identifier for accounts, modules, deployers and externally owned
//! signers. Two values are reserved: [`Address::ZERO`] (absent) and
//! [`Address::SENTINEL`], which marks both the head predecessor and the
//! terminator of a module list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{hash, VestaError};

/// 20-byte ledger address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Absent / unset address.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Reserved list marker, `0x00..01`. Never a real module.
    pub const SENTINEL: Self = {
        let mut bytes = [0u8; 20];
        bytes[19] = 1;
        Self(bytes)
    };

    /// Wrap raw address bytes.
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build an address whose last eight bytes hold `n`. Handy for fixtures
    /// and well-known system addresses.
    pub const fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        let be = n.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[12 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Take the trailing 20 bytes of a 32-byte digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }

    /// Address of a signer identified by a raw public key.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        Self::from_digest(&hash::hash(public_key))
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the absent address.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Whether this is the reserved list marker.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }

    /// Neither zero nor sentinel.
    pub fn is_assignable(&self) -> bool {
        !self.is_zero() && !self.is_sentinel()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            return write!(f, "Address(SENTINEL)");
        }
        write!(f, "Address(0x{})", hex::encode(self.0))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = VestaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| VestaError::decode(format!("address: {e}")))?;
        let bytes: [u8; 20] = bytes
            .try_into()
            .map_err(|_| VestaError::decode("address must be 20 bytes"))?;
        Ok(Self(bytes))
    }
}
