//! Type definitions for pattern entries and snapshots.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Untyped on-disk representation of an entry.
pub type Row = serde_json::Map<String, Value>;

/// Entry metadata. Values are always scalar.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// Metadata key mirroring the entry id.
pub const METADATA_ID: &str = "id";

/// A scalar metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl MetadataValue {
    /// Convert a JSON value, returning `None` for null, arrays and objects.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::String(s) => Some(Self::String(s.clone())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::String(s) => Value::String(s.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for MetadataValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// One blocklist/allowlist rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternEntry {
    /// Category, e.g. "ip" or "path".
    pub kind: String,
    /// Pattern payload.
    pub value: String,
    /// Optional scope qualifier. `None` applies globally for kind+value.
    pub target: Option<String>,
    /// Expiry as a Unix timestamp. `None` = permanent.
    pub expires_at: Option<i64>,
    /// When the rule was added (Unix timestamp).
    pub added_at: Option<i64>,
    pub metadata: Metadata,
}

impl PatternEntry {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_expires_at(mut self, expires_at: i64) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_added_at(mut self, added_at: i64) -> Self {
        self.added_at = Some(added_at);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The `(kind, value, target)` triple identifying "the same rule".
    pub fn natural_key(&self) -> (&str, &str, Option<&str>) {
        (&self.kind, &self.value, self.target.as_deref())
    }

    /// The id mirrored into `metadata.id`, if it is a non-empty string.
    pub fn id(&self) -> Option<&str> {
        self.metadata
            .get(METADATA_ID)
            .and_then(MetadataValue::as_str)
            .filter(|id| !id.is_empty())
    }

    /// Whether the entry has expired at `now`. Permanent entries never expire.
    #[inline]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|expiry| expiry <= now)
    }
}

/// Immutable point-in-time read of all entries.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternSnapshot {
    entries: Vec<PatternEntry>,
    captured_at: i64,
    source: PathBuf,
}

impl PatternSnapshot {
    pub fn new(entries: Vec<PatternEntry>, captured_at: i64, source: impl Into<PathBuf>) -> Self {
        Self {
            entries,
            captured_at,
            source: source.into(),
        }
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    /// Modification time of the source file, or the store clock if unavailable.
    /// Consumers compare this to decide whether cached matchers are stale.
    pub fn captured_at(&self) -> i64 {
        self.captured_at
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatternEntry> {
        self.entries.iter()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&PatternEntry> {
        self.entries.iter().find(|entry| entry.id() == Some(id))
    }

    /// Entries that have not expired at `now`.
    pub fn active_at(&self, now: i64) -> impl Iterator<Item = &PatternEntry> {
        self.entries.iter().filter(move |entry| !entry.is_expired_at(now))
    }

    pub fn into_entries(self) -> Vec<PatternEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a PatternSnapshot {
    type Item = &'a PatternEntry;
    type IntoIter = std::slice::Iter<'a, PatternEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
