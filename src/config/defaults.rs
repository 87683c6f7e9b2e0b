//! Serde defaults for `StoreConfig` fields.
//!
//! A config file only needs to name the keys it overrides.

use std::path::PathBuf;

pub fn default_path() -> PathBuf {
    PathBuf::from("config/system/firewall.patterns.json")
}

pub fn default_max_entries() -> usize {
    1000
}

// =============================================================================
// Permission Defaults
// =============================================================================

/// Group-readable/writable pattern file.
pub fn default_file_mode() -> u32 {
    0o664
}

/// Group-writable containing directory.
pub fn default_dir_mode() -> u32 {
    0o775
}
