//! Client configuration.
//!
//! Loads `config.toml` from the dormchat config directory. A missing file
//! yields the defaults; a malformed file is reported but also falls back to
//! the defaults so the client still starts.

use crate::paths::DormchatPaths;
use dormchat_core::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Which session store backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Database-backed HTTP API, shared across devices.
    Remote,
    /// Single-file store on this machine.
    #[default]
    Local,
}

/// Root configuration for the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Store backend selection.
    #[serde(default)]
    pub backend: BackendKind,
    /// Base URL of the chatbot API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-character reveal delay, in milliseconds.
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
    /// Bound on the answer request round trip, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_reveal_delay_ms() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            base_url: default_base_url(),
            reveal_delay_ms: default_reveal_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the default location, falling back to
    /// defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        let Ok(path) = DormchatPaths::config_file() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "using default configuration");
                Self::default()
            }
        }
    }

    /// Loads the configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Reads the bearer credential supplied by the authentication layer.
    pub fn bearer_token() -> Option<String> {
        std::env::var("DORMCHAT_TOKEN").ok().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_gives_defaults() {
        let config = ClientConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.backend, BackendKind::Local);
        assert_eq!(config.base_url, "http://127.0.0.1:8000/api");
        assert_eq!(config.reveal_delay_ms, 30);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "backend = \"remote\"").unwrap();
        file.flush().unwrap();

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(config.backend, BackendKind::Remote);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "backend = 12").unwrap();
        file.flush().unwrap();

        assert!(ClientConfig::load_from(file.path()).is_err());
    }
}
