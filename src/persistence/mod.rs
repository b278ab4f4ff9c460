//! Persistent integer records (the high score)
//!
//! Stores:
//! - `MemoryStore`: shared in-process map, used by tests and headless runs
//! - `JsonFileStore`: JSON object of key → integer on disk (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm32)
//!
//! Writes are fire-and-forget: failures are logged, never returned.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Key/value store for integer records
pub trait PersistentStore {
    fn read_int(&self, key: &str, default: i64) -> i64;
    fn write_int(&mut self, key: &str, value: i64);
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<BTreeMap<String, i64>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: i64) -> Self {
        let store = Self::new();
        store.values.borrow_mut().insert(key.to_string(), value);
        store
    }

    pub fn get(&self, key: &str) -> Option<i64> {
        self.values.borrow().get(key).copied()
    }
}

impl PersistentStore for MemoryStore {
    fn read_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).unwrap_or(default)
    }

    fn write_int(&mut self, key: &str, value: i64) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }
}

/// JSON file holding a flat object of integer records
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load_all(&self) -> BTreeMap<String, i64> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }
}

impl PersistentStore for JsonFileStore {
    fn read_int(&self, key: &str, default: i64) -> i64 {
        self.load_all().get(key).copied().unwrap_or(default)
    }

    fn write_int(&mut self, key: &str, value: i64) {
        let mut all = self.load_all();
        all.insert(key.to_string(), value);
        let result = serde_json::to_string(&all)
            .map_err(|e| e.to_string())
            .and_then(|json| fs::write(&self.path, json).map_err(|e| e.to_string()));
        match result {
            Ok(()) => log::info!("Saved {} = {} to {}", key, value, self.path.display()),
            Err(e) => log::warn!("Could not save {} to {}: {}", key, self.path.display(), e),
        }
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl PersistentStore for LocalStorageStore {
    fn read_int(&self, key: &str, default: i64) -> i64 {
        Self::storage()
            .and_then(|s| s.get_item(key).ok().flatten())
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn write_int(&mut self, key: &str, value: i64) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, &value.to_string()).is_ok() {
                log::info!("Saved {} = {}", key, value);
                return;
            }
        }
        log::warn!("LocalStorage unavailable, {} not saved", key);
    }
}
