//! Memoized per-package info views.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

/// In-memory map of package name to rendered JSON view.
///
/// There is no TTL; staleness is bounded only by explicit invalidation,
/// which every write path performs before touching the store.
#[derive(Default)]
pub(crate) struct InfoCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl InfoCache {
    pub(crate) fn get(&self, name: &str) -> Option<Value> {
        self.entries.read().unwrap().get(name).cloned()
    }

    pub(crate) fn insert(&self, name: &str, view: Value) {
        self.entries.write().unwrap().insert(name.to_string(), view);
    }

    pub(crate) fn invalidate(&self, name: &str) {
        self.entries.write().unwrap().remove(name);
    }
}
