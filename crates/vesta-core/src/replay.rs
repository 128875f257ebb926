//! One-time operation hash tracking for validation modules.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::{Hash32, Result, VestaError};

/// Set of operation hashes a module has already validated.
///
/// Hashes are marked on first sight, before any signature check runs, so a
/// hash can be presented for validation at most once no matter what the
/// signature says.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeenOperations {
    seen: HashSet<Hash32>,
}

impl SeenOperations {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `operation_hash` seen. Fails with `Replay` if it already was.
    pub fn mark(&mut self, operation_hash: Hash32) -> Result<()> {
        if self.seen.insert(operation_hash) {
            Ok(())
        } else {
            debug!(%operation_hash, "operation hash replayed");
            Err(VestaError::Replay { operation_hash })
        }
    }

    /// Whether `operation_hash` was marked.
    pub fn contains(&self, operation_hash: &Hash32) -> bool {
        self.seen.contains(operation_hash)
    }

    /// Number of hashes marked.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing was marked yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
