//! Time sources for the pattern store.
//!
//! Timestamps are Unix seconds. A store samples its clock once when it is
//! constructed, so expiry and default `addedAt` values stay stable for the
//! lifetime of that store instance.

/// Source of the current time in Unix seconds.
pub trait Clock: Send + Sync {
    /// Current time as a Unix timestamp.
    fn now(&self) -> i64;
}

/// Wall clock backed by `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}
