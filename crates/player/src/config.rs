//! Client configuration

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use crate::infrastructure::platform::FileStorageProvider;

pub const DEFAULT_API_URL: &str = "https://hack-or-snooze-v3.herokuapp.com";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Client configuration loaded from environment
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the story API
    pub api_url: Url,
    /// Timeout applied to every API request
    pub request_timeout: Duration,
    /// File holding the persisted session
    pub storage_path: PathBuf,
}

impl ClientConfig {
    /// Load `.env.local` / `.env` from the working directory, then read the
    /// environment.
    pub fn from_env() -> Result<Self> {
        load_dotenv(Path::new("."));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("SNOOZE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url)
            .with_context(|| format!("SNOOZE_API_URL is not a valid URL: {api_url}"))?;
        if api_url.cannot_be_a_base() {
            anyhow::bail!("SNOOZE_API_URL cannot be used as a base URL: {api_url}");
        }

        let request_timeout_ms = match lookup("SNOOZE_REQUEST_TIMEOUT_MS") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("SNOOZE_REQUEST_TIMEOUT_MS must be a number of milliseconds")?,
            None => DEFAULT_REQUEST_TIMEOUT_MS,
        };

        let storage_path = lookup("SNOOZE_STORAGE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(FileStorageProvider::default_path);

        Ok(Self {
            api_url,
            request_timeout: Duration::from_millis(request_timeout_ms),
            storage_path,
        })
    }
}

fn load_dotenv(dir: &Path) {
    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = dir.join(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to load env file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ClientConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "https://hack-or-snooze-v3.herokuapp.com/");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.storage_path, FileStorageProvider::default_path());
    }

    #[test]
    fn overrides_are_read() {
        let config = config(&[
            ("SNOOZE_API_URL", "http://localhost:5000/api"),
            ("SNOOZE_REQUEST_TIMEOUT_MS", "1500"),
            ("SNOOZE_STORAGE_PATH", "/tmp/snooze.json"),
        ])
        .unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:5000/api");
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.storage_path, PathBuf::from("/tmp/snooze.json"));
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(config(&[("SNOOZE_API_URL", "not a url")]).is_err());
        assert!(config(&[("SNOOZE_API_URL", "mailto:a@b.c")]).is_err());
        assert!(config(&[("SNOOZE_REQUEST_TIMEOUT_MS", "soon")]).is_err());
    }
}
