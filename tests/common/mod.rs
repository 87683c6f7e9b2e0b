//! Integration test common infrastructure.
//!
//! Provides a store bound to a throwaway directory with a pinned clock.

use patternstore::{FixedClock, PatternStore, StoreConfig};
use std::path::PathBuf;
use tempfile::TempDir;

/// Pinned "now" shared by the integration tests.
pub const NOW: i64 = 1_750_000_000;

/// A pattern store living in its own temporary directory.
pub struct TestStore {
    pub store: PatternStore,
    pub dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        Self::with_capacity(1000)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = StoreConfig::new(dir.path().join("system/patterns.json")).max_entries(max_entries);
        let store = PatternStore::with_clock(config, &FixedClock(NOW));
        Self { store, dir }
    }

    pub fn path(&self) -> PathBuf {
        self.store.path().to_path_buf()
    }

    /// Overwrite the pattern file with arbitrary content.
    pub fn write_raw(&self, content: &str) {
        let path = self.path();
        std::fs::create_dir_all(path.parent().expect("has parent")).expect("create parent");
        std::fs::write(path, content).expect("write raw pattern file");
    }

    /// Number of rows currently on disk.
    pub fn row_count(&self) -> usize {
        self.store.list_raw().expect("list rows").len()
    }
}
