//! File-backed pattern store.
//!
//! Every mutating call is an unsynchronized read-modify-write of the whole
//! row list followed by an atomic replace. Two processes mutating the same
//! file concurrently are last-write-wins.

use super::array_file::ArrayFile;
use super::backend::{Capabilities, PatternBackend};
use super::codec::{self, ID};
use super::identity;
use super::types::{PatternEntry, PatternSnapshot, Row};
use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Storage kind reported to the administrative layer.
pub const BACKEND_TYPE: &str = "json_array";

const FORMAT: &str = "json";

/// Pattern store bound to one file.
#[derive(Debug, Clone)]
pub struct PatternStore {
    file: ArrayFile,
    max_entries: usize,
    /// Sampled once at construction.
    now: i64,
}

impl PatternStore {
    /// Store at `path` with default settings and the wall clock.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::from_config(StoreConfig::new(path.as_ref()))
    }

    pub fn from_config(config: StoreConfig) -> Self {
        Self::with_clock(config, &SystemClock)
    }

    /// Store whose notion of "now" comes from `clock`, read once here.
    pub fn with_clock(config: StoreConfig, clock: &dyn Clock) -> Self {
        Self {
            file: ArrayFile::new(config.path, config.file_mode, config.dir_mode),
            max_entries: config.max_entries,
            now: clock.now(),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// The instant this store treats as the current time.
    pub fn now(&self) -> i64 {
        self.now
    }

    /// Read and decode every row.
    ///
    /// Creates the file if it is missing. Malformed content never fails; it
    /// decodes to whatever could be salvaged.
    pub fn consume(&self) -> Result<PatternSnapshot> {
        self.file.ensure_directory()?;
        self.file.ensure_file_exists()?;

        let captured_at = self.file.modified_at().unwrap_or(self.now);
        let entries: Vec<PatternEntry> = self.file.read_array()?.iter().map(codec::decode).collect();

        debug!(
            path = %self.path().display(),
            entries = entries.len(),
            captured_at,
            "Pattern snapshot taken"
        );
        Ok(PatternSnapshot::new(entries, captured_at, self.path()))
    }

    /// Insert `entry`, or merge it into the first row with the same natural key.
    ///
    /// Inserting a new row when the store already holds `max_entries` rows
    /// fails with [`StoreError::CapacityExceeded`] and writes nothing. Merges
    /// do not grow the file and are always allowed.
    pub fn append(&self, entry: &PatternEntry) -> Result<()> {
        if entry.kind.is_empty() {
            return Err(StoreError::InvalidEntry("kind must not be empty".to_string()));
        }

        let mut rows = self.file.read_array()?;
        let id = identity::resolve_id(entry);
        let row = codec::encode(entry, &id, self.now);

        match identity::find_duplicate(&rows, &row) {
            Some(index) => {
                identity::merge_row(&mut rows[index], row);
                debug!(id = %id, kind = %entry.kind, value = %entry.value, "Merged duplicate pattern entry");
            }
            None => {
                if rows.len() >= self.max_entries {
                    return Err(StoreError::CapacityExceeded {
                        max: self.max_entries,
                    });
                }
                rows.push(row);
                debug!(id = %id, kind = %entry.kind, value = %entry.value, "Added pattern entry");
            }
        }

        self.file.write_array(&rows)
    }

    /// Remove the first row whose `id` equals `id`.
    ///
    /// Unknown ids are a no-op and leave the file untouched.
    pub fn remove_by_id(&self, id: &str) -> Result<bool> {
        let mut rows = self.file.read_array()?;
        let Some(index) = rows
            .iter()
            .position(|row| row.get(ID).and_then(Value::as_str) == Some(id))
        else {
            return Ok(false);
        };

        rows.remove(index);
        self.file.write_array(&rows)?;
        debug!(id = %id, "Removed pattern entry");
        Ok(true)
    }

    /// Remove the row at `index` in file order. Out-of-range is a no-op.
    pub fn remove_at(&self, index: usize) -> Result<bool> {
        let mut rows = self.file.read_array()?;
        if index >= rows.len() {
            return Ok(false);
        }

        rows.remove(index);
        self.file.write_array(&rows)?;
        debug!(index, "Removed pattern entry by position");
        Ok(true)
    }

    /// Remove rows that have expired as of this store's clock.
    pub fn prune_expired(&self) -> Result<usize> {
        self.prune_expired_at(self.now)
    }

    /// Remove every row whose `expiresAt` is at or before `now`.
    ///
    /// Rows without a usable expiry are kept. The file is rewritten even when
    /// nothing expired.
    pub fn prune_expired_at(&self, now: i64) -> Result<usize> {
        let mut rows = self.file.read_array()?;
        let before = rows.len();
        rows.retain(|row| codec::row_expires_at(row).is_none_or(|expiry| expiry > now));
        let removed = before - rows.len();

        self.file.write_array(&rows)?;
        if removed > 0 {
            debug!(count = removed, now, "Pruned expired pattern entries");
        }
        Ok(removed)
    }

    /// Raw rows exactly as stored, for display.
    pub fn list_raw(&self) -> Result<Vec<Row>> {
        self.file.read_array()
    }

    pub fn backend_type(&self) -> &'static str {
        BACKEND_TYPE
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            backend_type: BACKEND_TYPE,
            append: true,
            prune_expired: true,
            remove: true,
            format: FORMAT,
            path: self.path().to_path_buf(),
        }
    }
}

impl PatternBackend for PatternStore {
    fn consume(&self) -> Result<PatternSnapshot> {
        PatternStore::consume(self)
    }

    fn append(&self, entry: &PatternEntry) -> Result<()> {
        PatternStore::append(self, entry)
    }

    fn prune_expired(&self) -> Result<usize> {
        PatternStore::prune_expired(self)
    }

    fn backend_type(&self) -> &'static str {
        PatternStore::backend_type(self)
    }

    fn capabilities(&self) -> Capabilities {
        PatternStore::capabilities(self)
    }
}
