//! Persisted boolean preferences.
//!
//! One capability, `PersistedFlags::get(key, default)` / `set(key, bool)`,
//! over any `KeyValueStore`. `MemoryStore` stands in when no persistent
//! store exists; `FileStore` keeps values in a JSON file.

pub mod flags;
pub mod store;

pub use flags::PersistedFlags;
pub use store::{FileStore, KeyValueStore, MemoryStore};
