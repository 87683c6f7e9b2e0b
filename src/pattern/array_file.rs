//! Durable storage for the raw row list.
//!
//! The file holds a JSON array of objects. Writes go to a temporary sibling
//! file first and are swapped into place with a single rename, so a reader
//! sees either the previous complete content or the next complete content.
//! There is no cross-process lock: concurrent writers are last-write-wins.

use super::types::Row;
use crate::error::{Result, StoreError};
use serde_json::Value;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::UNIX_EPOCH;
use tracing::{debug, info, warn};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A row list persisted at a single path.
#[derive(Debug, Clone)]
pub struct ArrayFile {
    path: PathBuf,
    file_mode: u32,
    dir_mode: u32,
}

impl ArrayFile {
    pub fn new(path: impl Into<PathBuf>, file_mode: u32, dir_mode: u32) -> Self {
        Self {
            path: path.into(),
            file_mode,
            dir_mode,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the containing directory (recursively) if it is missing.
    pub fn ensure_directory(&self) -> Result<()> {
        let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) else {
            return Ok(());
        };
        if dir.is_dir() {
            return Ok(());
        }

        // Another process may win the race to create it; only fail if it is still missing.
        if let Err(source) = fs::create_dir_all(dir)
            && !dir.is_dir()
        {
            return Err(StoreError::CreateDirectory {
                path: dir.to_path_buf(),
                source,
            });
        }

        if let Err(e) = set_mode(dir, self.dir_mode) {
            warn!(path = %dir.display(), error = %e, "Failed to set pattern directory permissions");
        }
        Ok(())
    }

    /// Write an empty row list if the file does not exist yet.
    ///
    /// Returns `true` when the file was created by this call.
    pub fn ensure_file_exists(&self) -> Result<bool> {
        if self.path.is_file() {
            return Ok(false);
        }
        self.write_array(&[])?;
        info!(path = %self.path.display(), "Created empty pattern file");
        Ok(true)
    }

    /// Load the raw row list.
    ///
    /// A missing file, unparseable content or a non-array document all read as
    /// an empty list. Elements that are not objects are discarded; the
    /// survivors keep their original order.
    pub fn read_array(&self) -> Result<Vec<Row>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let document: Value = match serde_json::from_slice(&bytes) {
            Ok(document) => document,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Pattern file is not valid JSON, treating as empty");
                return Ok(Vec::new());
            }
        };

        let Value::Array(items) = document else {
            warn!(path = %self.path.display(), "Pattern file is not a list, treating as empty");
            return Ok(Vec::new());
        };

        let total = items.len();
        let rows: Vec<Row> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect();

        if rows.len() < total {
            warn!(
                path = %self.path.display(),
                discarded = total - rows.len(),
                "Discarded non-object rows from pattern file"
            );
        }

        Ok(rows)
    }

    /// Atomically replace the file with `rows`.
    ///
    /// Falls back to an in-place overwrite if the rename fails (e.g. across
    /// devices). Fails if the temp file cannot be written, or if both the
    /// rename and the fallback fail.
    pub fn write_array(&self, rows: &[Row]) -> Result<()> {
        self.ensure_directory()?;

        let mut content = serde_json::to_vec_pretty(rows)?;
        content.push(b'\n');

        let temp_path = self.temp_path();
        if let Err(source) = write_synced(&temp_path, &content) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::WriteTemp {
                path: temp_path,
                source,
            });
        }

        if let Err(rename_err) = fs::rename(&temp_path, &self.path) {
            warn!(
                path = %self.path.display(),
                error = %rename_err,
                "Atomic rename failed, overwriting pattern file in place"
            );
            let fallback = fs::write(&self.path, &content);
            let _ = fs::remove_file(&temp_path);
            if let Err(source) = fallback {
                return Err(StoreError::Commit {
                    path: self.path.clone(),
                    source,
                });
            }
        }

        if let Err(e) = set_mode(&self.path, self.file_mode) {
            warn!(path = %self.path.display(), error = %e, "Failed to set pattern file permissions");
        }

        debug!(path = %self.path.display(), rows = rows.len(), "Pattern file saved");
        Ok(())
    }

    /// Last modification time as a Unix timestamp, if it can be determined.
    pub fn modified_at(&self) -> Option<i64> {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok()?;
        let secs = modified.duration_since(UNIX_EPOCH).ok()?.as_secs();
        i64::try_from(secs).ok()
    }

    /// Sibling path unique to this process and write.
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("patterns"));
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        name.push(format!(".{}.{}.tmp", std::process::id(), seq));
        self.path.with_file_name(name)
    }
}

fn write_synced(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
