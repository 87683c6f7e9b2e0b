//! Pattern record store.
//!
//! Persists firewall pattern rules (IP, host and path blocklist entries with
//! optional expiry and metadata) in a flat JSON file and reconstructs them
//! into immutable snapshots for a matching engine.
//!
//! # Architecture
//!
//! - **Array file**: loads and atomically rewrites the raw row list (temp file + rename)
//! - **Codec**: tolerant row decoding, canonical row encoding
//! - **Identity**: SHA-256 ids over `(kind, value, target)` and merge-on-duplicate
//! - **Store**: consume/append/remove/prune with a capacity bound
//!
//! # On-disk format
//!
//! ```json
//! [
//!   {
//!     "id": "…",
//!     "kind": "ip",
//!     "value": "203.0.113.7",
//!     "target": null,
//!     "expiresAt": 1767225600,
//!     "addedAt": 1764633600,
//!     "metadata": { "id": "…", "reason": "scanner" }
//!   }
//! ]
//! ```

pub mod array_file;
pub mod backend;
pub mod codec;
pub mod identity;
mod store;
mod types;

pub use array_file::ArrayFile;
pub use backend::{Capabilities, PatternBackend};
pub use identity::generate_id;
pub use store::{BACKEND_TYPE, PatternStore};
pub use types::{METADATA_ID, Metadata, MetadataValue, PatternEntry, PatternSnapshot, Row};
