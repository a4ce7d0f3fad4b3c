//! TTL evaluation.
//!
//! Expiry is lazy: nothing runs in the background. The orchestrator asks
//! [`is_expired`] on every read and treats an expired entry as a miss.
//! An entry with `ttl = None` never expires on its own.

use std::time::{Duration, Instant};

/// Returns `true` once `now - inserted_at >= ttl`.
///
/// A `now` earlier than `inserted_at` counts as zero elapsed time.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use rcache::expiry::is_expired;
///
/// let t0 = Instant::now();
/// let ttl = Some(Duration::from_millis(100));
/// assert!(!is_expired(t0, ttl, t0 + Duration::from_millis(50)));
/// assert!(is_expired(t0, ttl, t0 + Duration::from_millis(100)));
/// assert!(!is_expired(t0, None, t0 + Duration::from_secs(3600)));
/// ```
pub fn is_expired(inserted_at: Instant, ttl: Option<Duration>, now: Instant) -> bool {
    match ttl {
        Some(ttl) => now.saturating_duration_since(inserted_at) >= ttl,
        None => false,
    }
}

/// Time left before expiry, or `None` for entries without a TTL.
///
/// Returns `Some(Duration::ZERO)` for an already-expired entry.
pub fn remaining(inserted_at: Instant, ttl: Option<Duration>, now: Instant) -> Option<Duration> {
    ttl.map(|ttl| ttl.saturating_sub(now.saturating_duration_since(inserted_at)))
}

/// Outcome of a TTL-aware lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Present and fresh.
    Hit,
    /// Never cached, or already removed.
    Absent,
    /// Present but stale; removed as part of the lookup.
    Expired,
}

impl Lookup {
    /// `true` for [`Lookup::Absent`] and [`Lookup::Expired`].
    pub fn is_miss(self) -> bool {
        !matches!(self, Lookup::Hit)
    }
}
