//! Durable key-value storage
//!
//! Everything the application remembers between runs goes through a
//! string-keyed [`Store`]. Values are serialized text; readers must tolerate
//! absent or malformed values and fall back to defaults.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Store keys
pub mod keys {
    pub const PREFERENCES: &str = "dorksmith.preferences";
    pub const HISTORY: &str = "dorksmith.history";
    pub const USER_PRESETS: &str = "dorksmith.presets.user";
    pub const BUILTIN_FAVORITES: &str = "dorksmith.presets.builtin_favorites";
    pub const RECENT_TERMS: &str = "dorksmith.recent_terms";
    pub const AI_CONFIG: &str = "dorksmith.ai";
    pub const LAST_SPECIFICATION: &str = "dorksmith.last_specification";
}

/// Errors raised by store backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String-keyed durable store
pub trait Store: Send {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Read and deserialize a JSON value, falling back to the default when the
/// key is absent or the value does not parse
pub fn load_or_default<T>(store: &dyn Store, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring malformed stored value for {}: {}", key, e);
            T::default()
        }
    }
}

/// Serialize and write a JSON value. Failures are logged, never fatal.
pub fn save<T: Serialize + ?Sized>(store: &mut dyn Store, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(StoreError::from)
        .and_then(|json| store.set(key, json));

    if let Err(e) = result {
        error!("Failed to persist {}: {}", key, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_or_default_tolerates_garbage() {
        let mut store = MemoryStore::new();
        store.set("k", "{not json".to_string()).unwrap();

        let value: Vec<String> = load_or_default(&store, "k");
        assert!(value.is_empty());

        let missing: Vec<String> = load_or_default(&store, "absent");
        assert!(missing.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        save(&mut store, "k", &vec!["a", "b"]);

        let value: Vec<String> = load_or_default(&store, "k");
        assert_eq!(value, vec!["a", "b"]);
    }
}
