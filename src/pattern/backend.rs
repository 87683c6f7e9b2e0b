//! Backend trait consumed by pattern matching engines.
//!
//! A matching engine only needs to read snapshots and, for self-managed
//! blocklists, append and prune. Administrative operations (removal, raw
//! listing) stay on the concrete store.

use super::types::{PatternEntry, PatternSnapshot};
use crate::error::Result;
use serde::Serialize;
use std::path::PathBuf;

/// A source of pattern entries.
pub trait PatternBackend {
    /// Read all entries as an immutable snapshot.
    fn consume(&self) -> Result<PatternSnapshot>;

    /// Insert an entry, or merge it into an existing rule with the same natural key.
    fn append(&self, entry: &PatternEntry) -> Result<()>;

    /// Remove expired entries, returning how many were removed.
    fn prune_expired(&self) -> Result<usize>;

    /// Short storage kind identifier for display.
    fn backend_type(&self) -> &'static str;

    /// Which operations this backend supports, and where it stores data.
    fn capabilities(&self) -> Capabilities;
}

/// Static descriptor of what a backend supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub backend_type: &'static str,
    pub append: bool,
    pub prune_expired: bool,
    pub remove: bool,
    /// Serialization format of the backing file.
    pub format: &'static str,
    pub path: PathBuf,
}
