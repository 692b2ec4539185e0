//! Unified path management for dormchat configuration and data files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/dormchat/          # Config directory
//! ├── config.toml              # Application configuration
//! └── sessions.json            # Local session store (single blob)
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for dormchat.
pub struct DormchatPaths;

impl DormchatPaths {
    /// Returns the dormchat configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/dormchat/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("dormchat"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the local session store blob.
    pub fn sessions_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("sessions.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = DormchatPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("dormchat"));
    }

    #[test]
    fn test_config_file() {
        let config_file = DormchatPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        let config_dir = DormchatPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_sessions_file() {
        let sessions_file = DormchatPaths::sessions_file().unwrap();
        assert!(sessions_file.ends_with("sessions.json"));
        let config_dir = DormchatPaths::config_dir().unwrap();
        assert!(sessions_file.starts_with(&config_dir));
    }
}
