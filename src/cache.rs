//! Cache collaborator handed out by the configuration store.

use std::collections::HashMap;

use parking_lot::RwLock;
use toml::Value;

/// A key/value cache shared with code that receives a configuration handle.
///
/// The store never reads or writes through it; it only carries it.
pub trait Cache: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, value: Value);

    /// Removes `key`, returning whether it was present.
    fn remove(&self, key: &str) -> bool;

    fn clear(&self);
}

/// Process-local [`Cache`] backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.entries.write().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}
