//! Boolean preferences on top of a key-value store.

use std::sync::Arc;

use crate::preferences::store::{KeyValueStore, MemoryStore};

/// Persisted boolean flags (dismissed banners, onboarding state, …).
///
/// Values are stored as the strings `"true"` / `"false"`; anything else
/// reads as the caller's default.
#[derive(Clone)]
pub struct PersistedFlags {
    store: Arc<dyn KeyValueStore>,
}

impl PersistedFlags {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn get(&self, key: &str, default: bool) -> bool {
        match self.store.get(key).as_deref() {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        }
    }

    pub fn set(&self, key: &str, value: bool) {
        self.store.set(key, value.to_string());
    }
}

impl Default for PersistedFlags {
    fn default() -> Self {
        Self::in_memory()
    }
}
