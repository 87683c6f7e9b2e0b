//! Unified error handling for the pattern store.
//!
//! Filesystem and capacity faults surface to the caller as [`StoreError`].
//! Malformed file content is never an error: the read path coerces or
//! discards what it cannot understand.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Store Errors
// ============================================================================

/// Errors returned by pattern store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot create directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read pattern file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot encode pattern rows: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("cannot write temp pattern file {}: {source}", .path.display())]
    WriteTemp {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write pattern file {}: {source}", .path.display())]
    Commit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("pattern file exceeds maximum entries ({max})")]
    CapacityExceeded { max: usize },

    #[error("invalid pattern entry: {0}")]
    InvalidEntry(String),
}

impl StoreError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CreateDirectory { .. } => "create_directory",
            Self::Read { .. } => "read",
            Self::Encode(_) => "encode",
            Self::WriteTemp { .. } => "write_temp",
            Self::Commit { .. } => "commit",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::InvalidEntry(_) => "invalid_entry",
        }
    }

    /// Whether this error came from the filesystem rather than from store rules.
    pub fn is_filesystem(&self) -> bool {
        matches!(
            self,
            Self::CreateDirectory { .. }
                | Self::Read { .. }
                | Self::WriteTemp { .. }
                | Self::Commit { .. }
        )
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_names_bound() {
        let err = StoreError::CapacityExceeded { max: 25 };
        assert_eq!(err.to_string(), "pattern file exceeds maximum entries (25)");
        assert_eq!(err.error_code(), "capacity_exceeded");
        assert!(!err.is_filesystem());
    }

    #[test]
    fn commit_error_carries_path_and_cause() {
        let err = StoreError::Commit {
            path: PathBuf::from("/var/lib/fw/patterns.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/var/lib/fw/patterns.json"));
        assert!(msg.contains("denied"));
        assert!(err.is_filesystem());
        assert!(std::error::Error::source(&err).is_some());
    }
}
