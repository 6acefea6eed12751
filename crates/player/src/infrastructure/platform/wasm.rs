//! WASM platform implementations
//!
//! Provides the durable store for browser builds using `window.localStorage`.

use crate::ports::outbound::StorageProvider;

/// Browser storage provider backed by `localStorage`
#[derive(Clone, Default)]
pub struct LocalStorageProvider;

impl LocalStorageProvider {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl StorageProvider for LocalStorageProvider {
    fn save(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    tracing::error!(key, "Failed to write localStorage");
                }
            }
            None => tracing::error!("localStorage unavailable"),
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            if storage.remove_item(key).is_err() {
                tracing::error!(key, "Failed to remove localStorage item");
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            if storage.clear().is_err() {
                tracing::error!("Failed to clear localStorage");
            }
        }
    }
}
