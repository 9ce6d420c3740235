//! Key-value persistence used by interactive views (divider ratios).

use crate::error::LayoutError;
use std::collections::HashMap;
use std::sync::Mutex;

/// Byte-oriented key-value store.
pub trait KeyValueStore: Send + Sync {
    /// Save data under `key`.
    fn save(&self, key: &str, data: &[u8]);

    /// Load data stored under `key`.
    fn load(&self, key: &str) -> Option<Vec<u8>>;

    /// Remove `key`.
    fn remove(&self, key: &str);

    /// Check if a key exists.
    fn contains(&self, key: &str) -> bool;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.lock().expect("MemoryStore mutex poisoned").len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data
            .lock()
            .expect("MemoryStore mutex poisoned")
            .is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&self, key: &str, data: &[u8]) {
        self.data
            .lock()
            .expect("MemoryStore mutex poisoned")
            .insert(key.to_string(), data.to_vec());
    }

    fn load(&self, key: &str) -> Option<Vec<u8>> {
        self.data
            .lock()
            .expect("MemoryStore mutex poisoned")
            .get(key)
            .cloned()
    }

    fn remove(&self, key: &str) {
        self.data
            .lock()
            .expect("MemoryStore mutex poisoned")
            .remove(key);
    }

    fn contains(&self, key: &str) -> bool {
        self.data
            .lock()
            .expect("MemoryStore mutex poisoned")
            .contains_key(key)
    }
}

/// Store a number as JSON.
pub fn store_f64(store: &dyn KeyValueStore, key: &str, value: f64) -> Result<(), LayoutError> {
    let bytes = serde_json::to_vec(&value)?;
    store.save(key, &bytes);
    Ok(())
}

/// Load a number stored with [`store_f64`]. `Ok(None)` when the key is absent.
pub fn load_f64(store: &dyn KeyValueStore, key: &str) -> Result<Option<f64>, LayoutError> {
    store
        .load(key)
        .map(|bytes| serde_json::from_slice(&bytes))
        .transpose()
        .map_err(LayoutError::from)
}
