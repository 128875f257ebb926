//! Call payload and return data encoding.
//!
//! Contracts exchange bincode-encoded values. A contract that serves more
//! than one call surface tags payloads with a 4-byte interface id (see
//! [`Interface`]) so it can tell them apart before decoding.

use serde::{de::DeserializeOwned, Serialize};
use vesta_core::{hash, Result, VestaError};

/// Encode a call payload or return value.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
    // Serializing owned in-memory values into a Vec does not fail for the
    // types used across the workspace.
    bincode::serialize(value).unwrap_or_default()
}

/// Decode a call payload or return value.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| VestaError::decode(e.to_string()))
}

/// First four bytes of the hash of an interface name.
pub fn interface_id(name: &str) -> [u8; 4] {
    let digest = hash::hash(name.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// A call surface: an enum of calls prefixed by its interface id on the wire.
pub trait Interface: Serialize + DeserializeOwned {
    /// Stable interface name, e.g. `vesta.account.v1`.
    const NAME: &'static str;

    /// Interface id derived from [`Interface::NAME`].
    fn id() -> [u8; 4] {
        interface_id(Self::NAME)
    }

    /// Tagged payload.
    fn encode_call(&self) -> Vec<u8> {
        let mut out = Self::id().to_vec();
        out.extend(encode(self));
        out
    }

    /// Whether `input` is tagged with this interface.
    fn matches(input: &[u8]) -> bool {
        input.len() >= 4 && input[..4] == Self::id()
    }

    /// Decode a tagged payload. `Ok(None)` when the tag belongs to another
    /// interface.
    fn decode_call(input: &[u8]) -> Result<Option<Self>> {
        if !Self::matches(input) {
            return Ok(None);
        }
        decode(&input[4..]).map(Some)
    }
}
