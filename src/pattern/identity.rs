//! Entry identity and duplicate merging.
//!
//! The natural key of a rule is `(kind, value, target)`. Its SHA-256 digest
//! is the stable external id used for deletion.

use super::codec::{KIND, TARGET, VALUE};
use super::types::{PatternEntry, Row};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Separator between natural key components in the hashed input.
const KEY_DELIMITER: &str = "|";

/// Stable id for an entry, derived from its natural key alone.
pub fn generate_id(entry: &PatternEntry) -> String {
    let mut hasher = Sha256::new();
    hasher.update(entry.kind.as_bytes());
    hasher.update(KEY_DELIMITER);
    hasher.update(entry.value.as_bytes());
    hasher.update(KEY_DELIMITER);
    hasher.update(entry.target.as_deref().unwrap_or("").as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// The caller-supplied `metadata.id` if present and non-empty, else the generated id.
pub fn resolve_id(entry: &PatternEntry) -> String {
    entry
        .id()
        .map(str::to_string)
        .unwrap_or_else(|| generate_id(entry))
}

/// Position of the first row sharing `row`'s natural key, in file order.
pub fn find_duplicate(rows: &[Row], row: &Row) -> Option<usize> {
    rows.iter().position(|existing| same_natural_key(existing, row))
}

/// Overlay the non-null fields of `incoming` onto `existing`.
///
/// Fields `incoming` leaves null keep their existing value. The overlay is
/// shallow: a non-null `metadata` replaces the existing map wholesale.
pub fn merge_row(existing: &mut Row, incoming: Row) {
    for (key, value) in incoming {
        if !value.is_null() {
            existing.insert(key, value);
        }
    }
}

fn same_natural_key(a: &Row, b: &Row) -> bool {
    [KIND, VALUE, TARGET]
        .iter()
        .all(|key| field(a, key) == field(b, key))
}

/// Missing keys compare equal to null.
fn field<'a>(row: &'a Row, key: &str) -> &'a Value {
    row.get(key).unwrap_or(&Value::Null)
}
