//! Persistent key-value storage abstraction
//!
//! Shaped like browser localStorage so a web frontend can back it directly;
//! tests and native hosts use [`MemoryStorage`].

use std::collections::HashMap;

/// Synchronous string key-value storage for personal-list state.
pub trait StateStorage {
    /// Get the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str);

    /// Remove the value stored under `key`.
    fn remove_item(&mut self, key: &str);
}

/// In-memory storage backend.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}
