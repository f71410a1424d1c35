//! Key-value backends for persisted preferences.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dashmap::DashMap;

/// A client-local string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value. Persistence failures are logged, never returned.
    fn set(&self, key: &str, value: String);
}

/// Process-local store; the default when nothing persistent is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// Store backed by a JSON object on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: DashMap<String, String>,
}

impl FileStore {
    /// Open the store. A missing or unreadable file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();

        match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => {
                    for (key, value) in map {
                        entries.insert(key, value);
                    }
                }
                Err(e) => tracing::warn!(path = ?path, error = %e, "Ignoring corrupt preference file"),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = ?path, error = %e, "Preference file unreadable"),
        }

        Self { path, entries }
    }

    fn save(&self) -> Result<(), std::io::Error> {
        let snapshot: HashMap<String, String> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&self.path, json)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
        if let Err(e) = self.save() {
            tracing::warn!(path = ?self.path, key, error = %e, "Failed to persist preference");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", "v".into());
        assert_eq!(store.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_file_store_persistence() {
        let path = std::env::temp_dir()
            .join(format!("giftperch_prefs_test_{}.json", uuid::Uuid::new_v4()));
        std::fs::remove_file(&path).unwrap_or_default();

        let store = FileStore::open(&path);
        store.set("onboarding_done", "true".into());

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("onboarding_done").as_deref(), Some("true"));

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_file_store_corrupt_file_starts_empty() {
        let path = std::env::temp_dir()
            .join(format!("giftperch_prefs_corrupt_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path);
        assert!(store.get("anything").is_none());

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
