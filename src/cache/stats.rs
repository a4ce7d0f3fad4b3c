//! Hit/miss accounting.

use serde::Serialize;

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Counters {
    pub(crate) hits: u64,
    pub(crate) misses: u64,
    pub(crate) evictions: u64,
    pub(crate) expirations: u64,
    pub(crate) invalidations: u64,
}

/// A point-in-time snapshot of cache activity.
///
/// Counters are cumulative since construction (or the last
/// [`reset_stats`](crate::Cache::reset_stats)); `size` and `capacity` reflect
/// the store when the snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub invalidations: u64,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub(crate) fn snapshot(counters: Counters, size: usize, capacity: usize) -> Self {
        Self {
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
            expirations: counters.expirations,
            invalidations: counters.invalidations,
            size,
            capacity,
        }
    }

    /// Total lookups that reached the cache.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups served from the cache, `0.0` when there were none.
    pub fn hit_ratio(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            n => self.hits as f64 / n as f64,
        }
    }
}
