//! Configuration validation.
//!
//! Validates configuration before a store is built to catch common errors early.

use super::StoreConfig;
use thiserror::Error;

/// Highest permission value accepted for `file_mode` / `dir_mode`.
const MAX_MODE: u32 = 0o7777;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("path is required")]
    MissingPath,
    #[error("path must name a file, got directory: {0}")]
    PathIsDirectory(String),
    #[error("max_entries must be at least 1")]
    ZeroCapacity,
    #[error("file_mode must be within 0o7777, got {0:#o}")]
    InvalidFileMode(u32),
    #[error("dir_mode must be within 0o7777, got {0:#o}")]
    InvalidDirMode(u32),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &StoreConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.path.as_os_str().is_empty() {
        errors.push(ValidationError::MissingPath);
    } else if config.path.is_dir() {
        errors.push(ValidationError::PathIsDirectory(
            config.path.display().to_string(),
        ));
    }

    if config.max_entries == 0 {
        errors.push(ValidationError::ZeroCapacity);
    }

    if config.file_mode > MAX_MODE {
        errors.push(ValidationError::InvalidFileMode(config.file_mode));
    }
    if config.dir_mode > MAX_MODE {
        errors.push(ValidationError::InvalidDirMode(config.dir_mode));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
