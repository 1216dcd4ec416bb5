//! `localStorage` key-value store

use super::js_message;
use lyra_core::{KeyValueStore, LyraError};

/// Key-value store over `window.localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open the page's local storage
    ///
    /// Fails when there is no window or storage is disabled.
    pub fn new() -> lyra_core::Result<Self> {
        let window = web_sys::window().ok_or_else(|| LyraError::storage("no window"))?;
        let storage = window
            .local_storage()
            .map_err(|e| LyraError::storage(js_message(&e)))?
            .ok_or_else(|| LyraError::storage("localStorage unavailable"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> lyra_core::Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| LyraError::storage(js_message(&e)))
    }

    fn set(&self, key: &str, value: &str) -> lyra_core::Result<()> {
        // Throws QuotaExceededError when full
        self.storage
            .set_item(key, value)
            .map_err(|e| LyraError::storage(js_message(&e)))
    }

    fn remove(&self, key: &str) -> lyra_core::Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| LyraError::storage(js_message(&e)))
    }
}
