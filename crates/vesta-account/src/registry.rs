//! Module registry
//!
//! Singly linked list of enabled modules stored as a `module -> next` map.
//! [`Address::SENTINEL`] is both the key holding the head pointer and the
//! terminator, so an initialized list with one module `M` looks like:
//!
//! ```text
//! SENTINEL -> M -> SENTINEL
//! ```
//!
//! Insertion is O(1) at the head. Removal is O(1) but needs the caller to
//! name the predecessor; [`ModuleRegistry::paginate`] and
//! [`ModuleRegistry::predecessor_of`] are how callers find it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vesta_core::{Address, Result, VestaError};

/// One page of enabled modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Modules in list order
    pub modules: Vec<Address>,
    /// Cursor for the next page, `SENTINEL` when the list is exhausted
    pub next: Address,
}

/// Linked capability list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRegistry {
    links: HashMap<Address, Address>,
}

impl ModuleRegistry {
    /// Empty, uninitialized registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the head pointer was ever written.
    pub fn is_initialized(&self) -> bool {
        self.links.contains_key(&Address::SENTINEL)
    }

    /// First module, `None` when the list is empty.
    pub fn head(&self) -> Option<Address> {
        self.links
            .get(&Address::SENTINEL)
            .copied()
            .filter(Address::is_assignable)
    }

    /// Successor recorded for `module`.
    pub fn next_of(&self, module: &Address) -> Option<Address> {
        self.links.get(module).copied()
    }

    /// Seed an empty registry with its first module.
    ///
    /// Skips the duplicate check `enable` performs since the list is empty.
    pub fn initialize_with(&mut self, first: Address) -> Result<()> {
        if !first.is_assignable() {
            return Err(VestaError::InvalidModule { module: first });
        }
        if self.is_initialized() {
            return Err(VestaError::AlreadyInitialized);
        }
        self.links.insert(first, Address::SENTINEL);
        self.links.insert(Address::SENTINEL, first);
        Ok(())
    }

    /// Link `module` at the head.
    pub fn enable(&mut self, module: Address) -> Result<()> {
        if !module.is_assignable() {
            return Err(VestaError::InvalidModule { module });
        }
        if self.links.contains_key(&module) {
            return Err(VestaError::AlreadyEnabled { module });
        }
        let old_head = self
            .links
            .get(&Address::SENTINEL)
            .copied()
            .unwrap_or(Address::SENTINEL);
        self.links.insert(module, old_head);
        self.links.insert(Address::SENTINEL, module);
        Ok(())
    }

    /// Unlink `module`, whose predecessor must be `prev`.
    pub fn disable(&mut self, prev: Address, module: Address) -> Result<()> {
        if !module.is_assignable() {
            return Err(VestaError::InvalidModule { module });
        }
        let expected = self.links.get(&prev).copied().unwrap_or(Address::ZERO);
        if expected != module {
            return Err(VestaError::LinkageMismatch {
                expected,
                actual: module,
                prev,
            });
        }
        let next = self.links.remove(&module).unwrap_or(Address::SENTINEL);
        self.links.insert(prev, next);
        Ok(())
    }

    /// Whether `module` is linked.
    pub fn is_enabled(&self, module: &Address) -> bool {
        !module.is_sentinel() && self.links.contains_key(module)
    }

    /// Up to `page_size` modules strictly after `start`.
    ///
    /// `start` must be `SENTINEL` or an enabled module.
    pub fn paginate(&self, start: Address, page_size: usize) -> Result<Page> {
        if !start.is_sentinel() && !self.is_enabled(&start) {
            return Err(VestaError::InvalidModule { module: start });
        }
        if page_size == 0 {
            return Err(VestaError::configuration("page size must be positive"));
        }

        let mut modules = Vec::with_capacity(page_size.min(self.links.len()));
        let mut current = self.links.get(&start).copied().unwrap_or(Address::ZERO);
        while current.is_assignable() && modules.len() < page_size {
            modules.push(current);
            current = self.links.get(&current).copied().unwrap_or(Address::ZERO);
        }

        let next = match modules.last() {
            Some(last) if current.is_assignable() => *last,
            _ => Address::SENTINEL,
        };
        Ok(Page { modules, next })
    }

    /// Modules in list order.
    pub fn iter(&self) -> impl Iterator<Item = Address> + '_ {
        let mut current = self.links.get(&Address::SENTINEL).copied();
        std::iter::from_fn(move || {
            let module = current.filter(Address::is_assignable)?;
            current = self.links.get(&module).copied();
            Some(module)
        })
    }

    /// Number of enabled modules.
    pub fn len(&self) -> usize {
        self.links.len() - usize::from(self.is_initialized())
    }

    /// Whether no module is enabled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Predecessor of `module` by linear scan, for building `disable` calls.
    pub fn predecessor_of(&self, module: &Address) -> Option<Address> {
        if !self.is_enabled(module) {
            return None;
        }
        let mut prev = Address::SENTINEL;
        for current in self.iter() {
            if current == *module {
                return Some(prev);
            }
            prev = current;
        }
        None
    }
}
