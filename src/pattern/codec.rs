//! Conversion between raw rows and typed entries.
//!
//! Decoding is tolerant: a field of the wrong type reads as absent (or as an
//! empty string for `kind`/`value`), and non-scalar metadata values are
//! dropped. Encoding always produces the canonical seven-key row.

use super::types::{METADATA_ID, Metadata, MetadataValue, PatternEntry, Row};
use serde_json::Value;

pub const ID: &str = "id";
pub const KIND: &str = "kind";
pub const VALUE: &str = "value";
pub const TARGET: &str = "target";
pub const EXPIRES_AT: &str = "expiresAt";
pub const ADDED_AT: &str = "addedAt";
pub const METADATA: &str = "metadata";

/// Build a typed entry from a raw row. Never fails.
pub fn decode(row: &Row) -> PatternEntry {
    let mut metadata: Metadata = row
        .get(METADATA)
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(key, value)| {
                    MetadataValue::from_json(value).map(|value| (key.clone(), value))
                })
                .collect()
        })
        .unwrap_or_default();

    if let Some(id) = row.get(ID).and_then(MetadataValue::from_json) {
        metadata.insert(METADATA_ID.to_string(), id);
    }

    PatternEntry {
        kind: string_field(row, KIND).unwrap_or_default(),
        value: string_field(row, VALUE).unwrap_or_default(),
        target: string_field(row, TARGET),
        expires_at: row.get(EXPIRES_AT).and_then(Value::as_i64),
        added_at: row.get(ADDED_AT).and_then(Value::as_i64),
        metadata,
    }
}

/// Build the canonical row for `entry`.
///
/// `addedAt` falls back to `now` and `metadata.id` is always set to `id`.
pub fn encode(entry: &PatternEntry, id: &str, now: i64) -> Row {
    let mut metadata = serde_json::Map::new();
    for (key, value) in &entry.metadata {
        // Non-finite floats have no JSON form.
        let value = value.to_json();
        if !value.is_null() {
            metadata.insert(key.clone(), value);
        }
    }
    metadata.insert(METADATA_ID.to_string(), Value::String(id.to_string()));

    let mut row = Row::new();
    row.insert(ID.to_string(), Value::String(id.to_string()));
    row.insert(KIND.to_string(), Value::String(entry.kind.clone()));
    row.insert(VALUE.to_string(), Value::String(entry.value.clone()));
    row.insert(
        TARGET.to_string(),
        entry.target.clone().map_or(Value::Null, Value::String),
    );
    row.insert(
        EXPIRES_AT.to_string(),
        entry.expires_at.map_or(Value::Null, Value::from),
    );
    row.insert(
        ADDED_AT.to_string(),
        Value::from(entry.added_at.unwrap_or(now)),
    );
    row.insert(METADATA.to_string(), Value::Object(metadata));
    row
}

/// Expiry of a raw row for pruning.
///
/// Every scalar is coerced to an integer timestamp: numbers truncate,
/// booleans are 0 or 1, and strings use their leading numeric prefix (0 when
/// there is none). Absent, null, array and object values never expire.
pub fn row_expires_at(row: &Row) -> Option<i64> {
    match row.get(EXPIRES_AT)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => Some(leading_number(s)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn string_field(row: &Row, key: &str) -> Option<String> {
    row.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Integer value of the numeric prefix of `s`, e.g. `"12abc"` is 12 and
/// `"1.5e3s"` is 1500. Float-to-int conversion saturates.
fn leading_number(s: &str) -> i64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(sign);
    let mut end = int_end;
    if bytes.get(end) == Some(&b'.') {
        end = digits_from(end + 1);
    }
    // Needs at least one digit on either side of the point.
    if end - sign - usize::from(end > int_end) == 0 {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + exp_sign);
        if exp_end > end + 1 + exp_sign {
            end = exp_end;
        }
    }

    let prefix = &s[..end];
    if end == int_end
        && let Ok(i) = prefix.parse::<i64>()
    {
        return i;
    }
    prefix.parse::<f64>().map_or(0, |f| f as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(row) => row,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn decode_well_formed_row() {
        let entry = decode(&row(json!({
            "id": "abc",
            "kind": "ip",
            "value": "10.0.0.1",
            "target": "/login",
            "expiresAt": 2000,
            "addedAt": 1000,
            "metadata": {"reason": "brute force", "hits": 12, "manual": true}
        })));

        assert_eq!(entry.kind, "ip");
        assert_eq!(entry.value, "10.0.0.1");
        assert_eq!(entry.target.as_deref(), Some("/login"));
        assert_eq!(entry.expires_at, Some(2000));
        assert_eq!(entry.added_at, Some(1000));
        assert_eq!(entry.id(), Some("abc"));
        assert_eq!(entry.metadata.get("hits"), Some(&MetadataValue::Integer(12)));
        assert_eq!(entry.metadata.get("manual"), Some(&MetadataValue::Bool(true)));
    }

    #[test]
    fn decode_coerces_foreign_types() {
        let entry = decode(&row(json!({
            "kind": 5,
            "value": ["x"],
            "target": {"route": "/"},
            "expiresAt": "tomorrow",
            "addedAt": 1.5,
            "metadata": {"ok": "yes", "nested": {"a": 1}, "list": [1], "nil": null},
            "unrelated": "ignored"
        })));

        assert_eq!(entry.kind, "");
        assert_eq!(entry.value, "");
        assert_eq!(entry.target, None);
        assert_eq!(entry.expires_at, None);
        assert_eq!(entry.added_at, None);
        assert_eq!(entry.metadata.len(), 1);
        assert_eq!(
            entry.metadata.get("ok"),
            Some(&MetadataValue::String("yes".to_string()))
        );
    }

    #[test]
    fn decode_ignores_non_mapping_metadata() {
        let entry = decode(&row(json!({"kind": "ip", "value": "1.1.1.1", "metadata": [1, 2]})));
        assert!(entry.metadata.is_empty());
    }

    #[test]
    fn decode_folds_row_id_over_metadata_id() {
        let entry = decode(&row(json!({
            "id": "from-row",
            "kind": "ip",
            "value": "1.1.1.1",
            "metadata": {"id": "from-metadata"}
        })));
        assert_eq!(entry.id(), Some("from-row"));
    }

    #[test]
    fn decode_empty_row_defaults() {
        let entry = decode(&Row::new());
        assert_eq!(entry, PatternEntry::default());
    }

    #[test]
    fn encode_writes_all_keys() {
        let entry = PatternEntry::new("ip", "1.2.3.4");
        let encoded = encode(&entry, "deadbeef", 777);

        assert_eq!(
            Value::Object(encoded),
            json!({
                "id": "deadbeef",
                "kind": "ip",
                "value": "1.2.3.4",
                "target": null,
                "expiresAt": null,
                "addedAt": 777,
                "metadata": {"id": "deadbeef"}
            })
        );
    }

    #[test]
    fn encode_keeps_explicit_added_at_and_overrides_metadata_id() {
        let entry = PatternEntry::new("path", "/admin")
            .with_target("backend")
            .with_expires_at(900)
            .with_added_at(100)
            .with_metadata("id", "stale")
            .with_metadata("note", "x");
        let encoded = encode(&entry, "fresh", 777);

        assert_eq!(encoded[ADDED_AT], json!(100));
        assert_eq!(encoded[EXPIRES_AT], json!(900));
        assert_eq!(encoded[TARGET], json!("backend"));
        assert_eq!(encoded[METADATA], json!({"id": "fresh", "note": "x"}));

        let decoded = decode(&encoded);
        assert_eq!(decoded.natural_key(), entry.natural_key());
        assert_eq!(decoded.id(), Some("fresh"));
    }

    #[test]
    fn encode_drops_non_finite_metadata() {
        let entry = PatternEntry::new("ip", "1.1.1.1").with_metadata("score", f64::NAN);
        let encoded = encode(&entry, "x", 0);
        assert_eq!(encoded[METADATA], json!({"id": "x"}));
    }

    #[test]
    fn row_expiry_coercion() {
        let expiry = |value: Value| row_expires_at(&row(json!({ "expiresAt": value })));

        assert_eq!(expiry(json!(100)), Some(100));
        assert_eq!(expiry(json!(100.9)), Some(100));
        assert_eq!(expiry(json!(1e300)), Some(i64::MAX));
        assert_eq!(expiry(json!(true)), Some(1));
        assert_eq!(expiry(json!(false)), Some(0));
        assert_eq!(expiry(json!(null)), None);
        assert_eq!(expiry(json!([100])), None);
        assert_eq!(expiry(json!({"at": 100})), None);
        assert_eq!(row_expires_at(&Row::new()), None);
    }

    #[test]
    fn string_expiry_uses_numeric_prefix() {
        let expiry = |value: &str| row_expires_at(&row(json!({ "expiresAt": value })));

        assert_eq!(expiry(" 250 "), Some(250));
        assert_eq!(expiry("12.5"), Some(12));
        assert_eq!(expiry("-40"), Some(-40));
        assert_eq!(expiry("1700000000 UTC"), Some(1_700_000_000));
        assert_eq!(expiry("1.5e3s"), Some(1500));
        assert_eq!(expiry("7e"), Some(7));
        assert_eq!(expiry(".5"), Some(0));
        assert_eq!(expiry("99999999999999999999"), Some(i64::MAX));
        assert_eq!(expiry("never"), Some(0));
        assert_eq!(expiry("."), Some(0));
        assert_eq!(expiry("-"), Some(0));
        assert_eq!(expiry(""), Some(0));
    }
}
