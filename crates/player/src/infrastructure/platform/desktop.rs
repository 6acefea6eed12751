//! File-backed session storage for native builds.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use directories::ProjectDirs;

use crate::ports::outbound::StorageProvider;

type Entries = HashMap<String, String>;

/// Key-value store persisted as one JSON object.
///
/// Reads are served from memory; every write rewrites the whole file. The
/// default location is the platform config directory, e.g.
/// `~/.config/snooze/storage.json` on Linux.
#[derive(Clone)]
pub struct FileStorageProvider {
    path: PathBuf,
    entries: Arc<RwLock<Entries>>,
}

impl Default for FileStorageProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStorageProvider {
    pub fn new() -> Self {
        Self::at_path(Self::default_path())
    }

    /// `storage.json` in the platform config directory, or in the working
    /// directory when no home directory can be determined.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("io", "snooze", "snooze")
            .map(|dirs| dirs.config_dir().join("storage.json"))
            .unwrap_or_else(|| PathBuf::from("snooze_storage.json"))
    }

    /// Open the store at `path`. A missing, unreadable or corrupt file is
    /// treated as empty.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        tracing::debug!(path = %path.display(), entries = entries.len(), "Opened session storage");

        Self {
            path,
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Apply `change` to the in-memory map, then write the result to disk.
    fn update(&self, change: impl FnOnce(&mut Entries)) {
        let snapshot = match self.entries.write() {
            Ok(mut entries) => {
                change(&mut entries);
                entries.clone()
            }
            Err(e) => {
                tracing::error!(error = %e, "Session storage lock poisoned");
                return;
            }
        };

        if let Err(e) = write_entries(&self.path, &snapshot) {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to write session storage");
        }
    }
}

fn read_entries(path: &Path) -> Entries {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Entries::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read session storage");
            return Entries::new();
        }
    };

    serde_json::from_str(&data).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Ignoring corrupt session storage");
        Entries::new()
    })
}

fn write_entries(path: &Path, entries: &Entries) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(entries)?;
    fs::write(path, data)
}

impl StorageProvider for FileStorageProvider {
    fn save(&self, key: &str, value: &str) {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn load(&self, key: &str) -> Option<String> {
        match self.entries.read() {
            Ok(entries) => entries.get(key).cloned(),
            Err(e) => {
                tracing::error!(error = %e, "Session storage lock poisoned");
                None
            }
        }
    }

    fn remove(&self, key: &str) {
        self.update(|entries| {
            entries.remove(key);
        });
    }

    fn clear(&self) {
        self.update(Entries::clear);
    }
}
