//! The shared namespace: one `key -> value` mapping per host context.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{StateKey, Value};

/// Handle to the mapping hosted by a [`HostContext`](crate::HostContext).
///
/// Handles are cheap to clone and all clones see the same entries. Writes are
/// applied immediately: a `get` right after a `set` returns the value just set.
///
/// Values are stored behind `Rc` so every binding that adopts a value shares
/// the same allocation.
#[derive(Clone, Default)]
pub struct Namespace {
    entries: Rc<RefCell<HashMap<StateKey, Rc<Value>>>>,
}

impl Namespace {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current value for `key`, or `None` when the key was never set (or unset).
    pub fn get(&self, key: &StateKey) -> Option<Rc<Value>> {
        self.entries.borrow().get(key).cloned()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set(&self, key: StateKey, value: Rc<Value>) {
        self.entries.borrow_mut().insert(key, value);
    }

    /// Remove the entry for `key`, returning the value it held.
    pub fn remove(&self, key: &StateKey) -> Option<Rc<Value>> {
        self.entries.borrow_mut().remove(key)
    }

    pub fn contains(&self, key: &StateKey) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// All keys currently set, sorted.
    pub fn keys(&self) -> Vec<StateKey> {
        let mut keys: Vec<StateKey> = self.entries.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Whether both handles point at the same mapping.
    pub fn ptr_eq(&self, other: &Namespace) -> bool {
        Rc::ptr_eq(&self.entries, &other.entries)
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.borrow().iter()).finish()
    }
}
