//! Configuration management for feedmirror.
//!
//! Configuration is read from `~/.config/feedmirror/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::sync::parallel::DEFAULT_WORKERS;
use crate::sync::DEFAULT_MAX_RESULTS;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the SQLite mirror lives. Unset means the platform data
    /// directory.
    pub db_path: Option<PathBuf>,
    pub sync: SyncConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            sync: SyncConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Number of sources synced concurrently.
    pub workers: usize,
    /// Entries requested from the remote per fetch.
    pub max_results: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            // Create default config with comments
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/feedmirror/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("feedmirror").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let default_config = Self::default_config_content();

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(default_config.as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# feedmirror configuration
#
# Where the SQLite mirror lives. When unset, the platform data directory
# is used (e.g. ~/.local/share/feedmirror/feedmirror.db).
#
# db_path = "/home/me/feedmirror.db"

[sync]
# Number of sources synced concurrently.
workers = 10

# Entries requested from the remote per fetch. Blogger serves 25 by
# default, which silently truncates any blog with more posts.
max_results = 2000
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        // Check a few values
        assert_eq!(config.db_path, None);
        assert_eq!(config.sync.workers, 10);
        assert_eq!(config.sync.max_results, 2000);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[sync]
workers = 3
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        // Custom value
        assert_eq!(config.sync.workers, 3);
        // Default value
        assert_eq!(config.sync.max_results, 2000);
    }

    #[test]
    fn test_empty_config() {
        let content = "";
        let config: Config = toml::from_str(content).expect("Empty config should work");

        // All defaults
        assert_eq!(config.db_path, None);
        assert_eq!(config.sync.workers, 10);
    }

    #[test]
    fn test_db_path_override() {
        let content = r##"db_path = "/tmp/mirror.db""##;
        let config: Config = toml::from_str(content).expect("db_path config should work");

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/mirror.db")));
    }
}
