//! Validation results returned by authorization modules
//!
//! Modules answer a validation request with a 32-byte word. The account never
//! interprets it; the primary authority does. Layout (big-endian):
//!
//! | bytes   | field          |
//! |---------|----------------|
//! | 0..6    | `valid_after`  |
//! | 6..12   | `valid_until`  |
//! | 12..32  | authorizer     |
//!
//! An authorizer of `1` means the signature was rejected; an all-zero word
//! means accepted with no time bounds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Time bounds attached to an accepted validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    /// First timestamp at which the operation is valid
    pub valid_after: u64,
    /// Last timestamp at which the operation is valid, `0` for unbounded
    pub valid_until: u64,
}

impl ValidityWindow {
    /// Largest timestamp the 48-bit fields can carry.
    pub const MAX_TIMESTAMP: u64 = (1 << 48) - 1;

    /// Create a window, clamping both bounds to 48 bits.
    pub fn new(valid_after: u64, valid_until: u64) -> Self {
        Self {
            valid_after: valid_after.min(Self::MAX_TIMESTAMP),
            valid_until: valid_until.min(Self::MAX_TIMESTAMP),
        }
    }

    /// Whether `now` falls inside the window.
    pub fn contains(&self, now: u64) -> bool {
        now >= self.valid_after && (self.valid_until == 0 || now <= self.valid_until)
    }

    /// Encode as 16 bytes: `valid_after ‖ valid_until`.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.valid_after.to_be_bytes());
        out[8..].copy_from_slice(&self.valid_until.to_be_bytes());
        out
    }

    /// Decode the 16-byte encoding.
    pub fn from_bytes(bytes: &[u8; 16]) -> Self {
        let mut after = [0u8; 8];
        let mut until = [0u8; 8];
        after.copy_from_slice(&bytes[..8]);
        until.copy_from_slice(&bytes[8..]);
        Self::new(u64::from_be_bytes(after), u64::from_be_bytes(until))
    }
}

/// Opaque validation word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ValidationData(pub [u8; 32]);

impl ValidationData {
    /// Accepted, no time bounds.
    pub const ACCEPTED: Self = Self([0u8; 32]);

    /// Reserved rejection word (`SIG_VALIDATION_FAILED`).
    pub const SIG_VALIDATION_FAILED: Self = {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        Self(bytes)
    };

    /// Accepted within a validity window.
    pub fn accepted_within(window: ValidityWindow) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..6].copy_from_slice(&window.valid_after.to_be_bytes()[2..]);
        bytes[6..12].copy_from_slice(&window.valid_until.to_be_bytes()[2..]);
        Self(bytes)
    }

    /// Accepted, optionally bounded.
    pub fn accepted(window: Option<ValidityWindow>) -> Self {
        window.map_or(Self::ACCEPTED, Self::accepted_within)
    }

    /// Whether the authorizer field marks a rejection.
    pub fn is_rejected(&self) -> bool {
        self.authorizer() == Self::SIG_VALIDATION_FAILED.authorizer()
    }

    /// Whether the authorizer field is zero.
    pub fn is_accepted(&self) -> bool {
        self.authorizer() == [0u8; 20]
    }

    /// Trailing 20-byte authorizer field.
    pub fn authorizer(&self) -> [u8; 20] {
        let mut out = [0u8; 20];
        out.copy_from_slice(&self.0[12..]);
        out
    }

    /// Decoded validity window, `None` when both bounds are zero.
    pub fn window(&self) -> Option<ValidityWindow> {
        let mut after = [0u8; 8];
        let mut until = [0u8; 8];
        after[2..].copy_from_slice(&self.0[..6]);
        until[2..].copy_from_slice(&self.0[6..12]);
        let window = ValidityWindow::new(u64::from_be_bytes(after), u64::from_be_bytes(until));
        (window.valid_after != 0 || window.valid_until != 0).then_some(window)
    }
}

impl fmt::Debug for ValidationData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::ACCEPTED {
            write!(f, "ValidationData(ACCEPTED)")
        } else if *self == Self::SIG_VALIDATION_FAILED {
            write!(f, "ValidationData(SIG_VALIDATION_FAILED)")
        } else {
            write!(f, "ValidationData(0x{})", hex::encode(self.0))
        }
    }
}

/// Four-byte answer to a signature-verification query.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureMagic(pub [u8; 4]);

impl SignatureMagic {
    /// Signature is valid for the queried hash.
    pub const VALID: Self = Self([0x16, 0x26, 0xba, 0x7e]);
    /// Signature is not valid.
    pub const INVALID: Self = Self([0xff, 0xff, 0xff, 0xff]);

    /// Map a boolean verdict to a magic value.
    pub fn from_verdict(valid: bool) -> Self {
        if valid {
            Self::VALID
        } else {
            Self::INVALID
        }
    }

    /// Whether this is the valid magic.
    pub fn is_valid(&self) -> bool {
        *self == Self::VALID
    }
}

impl fmt::Debug for SignatureMagic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureMagic(0x{})", hex::encode(self.0))
    }
}
