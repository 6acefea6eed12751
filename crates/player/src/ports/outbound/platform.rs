//! Platform abstraction ports for durable client state
//!
//! These traits abstract platform-specific operations so that:
//! 1. Application code remains platform-agnostic
//! 2. Platform-specific code is isolated in infrastructure
//! 3. Code becomes easily testable with in-memory implementations

/// Persistent storage abstraction (localStorage/file-based)
///
/// Failures are logged by the implementation rather than returned; a store
/// that cannot be written behaves like one that forgot the value.
pub trait StorageProvider: Clone + 'static {
    /// Save a string value with the given key
    fn save(&self, key: &str, value: &str);

    /// Load a string value by key, returns None if not found
    fn load(&self, key: &str) -> Option<String>;

    /// Remove a value by key
    fn remove(&self, key: &str);

    /// Remove every value in the store, not just the session keys
    fn clear(&self);
}

/// Storage key constants
///
/// The persisted session record is exactly these two keys, both present or
/// both absent.
pub mod storage_keys {
    pub const TOKEN: &str = "token";
    pub const USERNAME: &str = "username";
}
