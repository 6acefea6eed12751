//! In-memory platform implementations for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ports::outbound::StorageProvider;

/// Storage provider that keeps everything in memory.
///
/// Clones share the same map, so a test can keep a handle and inspect what
/// the session layer wrote.
#[derive(Clone, Default)]
pub struct MemoryStorageProvider {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        match self.data.read() {
            Ok(guard) => guard.is_empty(),
            Err(e) => {
                tracing::error!("Failed to acquire read lock for storage: {}", e);
                true
            }
        }
    }
}

impl StorageProvider for MemoryStorageProvider {
    fn save(&self, key: &str, value: &str) {
        match self.data.write() {
            Ok(mut guard) => {
                guard.insert(key.to_string(), value.to_string());
            }
            Err(e) => tracing::error!("Failed to acquire write lock for storage: {}", e),
        }
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.data.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(e) => {
                tracing::error!("Failed to acquire read lock for storage: {}", e);
                None
            }
        }
    }

    fn remove(&self, key: &str) {
        match self.data.write() {
            Ok(mut guard) => {
                guard.remove(key);
            }
            Err(e) => tracing::error!("Failed to acquire write lock for storage: {}", e),
        }
    }

    fn clear(&self) {
        match self.data.write() {
            Ok(mut guard) => guard.clear(),
            Err(e) => tracing::error!("Failed to acquire write lock for storage: {}", e),
        }
    }
}
