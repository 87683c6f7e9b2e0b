//! Core configuration types and loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::defaults::{default_dir_mode, default_file_mode, default_max_entries, default_path};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Pattern store configuration.
///
/// ```toml
/// path = "/var/lib/firewall/patterns.json"
/// max_entries = 5000
/// file_mode = 0o660
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Location of the pattern file.
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Upper bound on stored rows (default: 1000).
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Permission bits applied to the pattern file after each write (default: 0o664).
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,
    /// Permission bits applied to the containing directory (default: 0o775).
    #[serde(default = "default_dir_mode")]
    pub dir_mode: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            max_entries: default_max_entries(),
            file_mode: default_file_mode(),
            dir_mode: default_dir_mode(),
        }
    }
}

impl StoreConfig {
    /// Create a config for the given pattern file, other settings at their defaults.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Set the row capacity bound.
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set the permission bits for the pattern file.
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    /// Set the permission bits for the containing directory.
    pub fn dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert_eq!(
            config.path,
            PathBuf::from("config/system/firewall.patterns.json")
        );
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.file_mode, 0o664);
        assert_eq!(config.dir_mode, 0o775);
    }

    #[test]
    fn builder_overrides() {
        let config = StoreConfig::new("/tmp/fw/patterns.json")
            .max_entries(3)
            .file_mode(0o600)
            .dir_mode(0o700);

        assert_eq!(config.path, PathBuf::from("/tmp/fw/patterns.json"));
        assert_eq!(config.max_entries, 3);
        assert_eq!(config.file_mode, 0o600);
        assert_eq!(config.dir_mode, 0o700);
    }

    #[test]
    fn parses_toml_with_octal_modes() {
        let toml = r#"
path = "/srv/fw/patterns.json"
max_entries = 250
file_mode = 0o660
"#;
        let config = StoreConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.path, PathBuf::from("/srv/fw/patterns.json"));
        assert_eq!(config.max_entries, 250);
        assert_eq!(config.file_mode, 0o660);
        assert_eq!(config.dir_mode, 0o775);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = StoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = StoreConfig::from_toml_str("max_entires = 10").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = StoreConfig::load("/nonexistent/patternstore.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
