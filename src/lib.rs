//! # patternstore
//!
//! Durable flat-file storage for firewall pattern rules.
//!
//! A [`PatternStore`] is bound to one file. Administrative callers append,
//! remove and prune entries; a matching engine calls
//! [`consume`](PatternStore::consume) to get an immutable [`PatternSnapshot`]
//! stamped with the file's modification time for cache invalidation.
//!
//! ```no_run
//! use patternstore::{PatternEntry, PatternStore, StoreConfig};
//!
//! let store = PatternStore::from_config(
//!     StoreConfig::new("/var/lib/firewall/patterns.json").max_entries(5000),
//! );
//! store.append(&PatternEntry::new("ip", "203.0.113.7").with_metadata("reason", "scanner"))?;
//!
//! let snapshot = store.consume()?;
//! for entry in &snapshot {
//!     println!("{} {} ({:?})", entry.kind, entry.value, entry.id());
//! }
//! # Ok::<(), patternstore::StoreError>(())
//! ```
//!
//! Writes are atomic with respect to readers but not serialized across
//! processes: concurrent writers are last-write-wins.

pub mod clock;
pub mod config;
pub mod error;
pub mod pattern;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, StoreConfig};
pub use error::{Result, StoreError};
pub use pattern::{
    Capabilities, METADATA_ID, Metadata, MetadataValue, PatternBackend, PatternEntry,
    PatternSnapshot, PatternStore, Row, generate_id,
};
