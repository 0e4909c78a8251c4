//! Key/value storage for the player record
//!
//! Records are stored as JSON strings under a fixed key:
//! - `LocalStorageStore` on the web
//! - `MemoryStore` natively and in tests

#[cfg(target_arch = "wasm32")]
mod local;

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

/// Minimal string key/value backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Load a JSON value, `None` if the key is absent
pub fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Store a value as JSON
pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        save_json(&mut store, "scores", &vec![10u32, 20, 40]).unwrap();
        let loaded: Option<Vec<u32>> = load_json(&store, "scores").unwrap();
        assert_eq!(loaded, Some(vec![10, 20, 40]));
    }

    #[test]
    fn test_missing_key() {
        let store = MemoryStore::new();
        let loaded: Option<Vec<u32>> = load_json(&store, "nothing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_corrupt_value() {
        let mut store = MemoryStore::new();
        store.set("scores", "{{{").unwrap();
        let result: Result<Option<Vec<u32>>, _> = load_json(&store, "scores");
        assert!(matches!(result, Err(StorageError::Serde(_))));
    }

    #[test]
    fn test_remove() {
        let mut store = MemoryStore::new();
        store.set("k", "1").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
