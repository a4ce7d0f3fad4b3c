//! A single cached value and its freshness metadata.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::expiry;
use crate::index::Tag;

/// A value owned by the [`Store`](super::Store), with the moment it was
/// written, its TTL, and its tags.
///
/// Entries are never handed out mutably. Callers see `&CacheEntry` or a
/// clone of the value.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Option<Duration>,
    tags: HashSet<Tag>,
}

impl<V> CacheEntry<V> {
    pub(crate) fn new(
        value: V,
        inserted_at: Instant,
        ttl: Option<Duration>,
        tags: HashSet<Tag>,
    ) -> Self {
        Self {
            value,
            inserted_at,
            ttl,
            tags,
        }
    }

    /// Returns the cached value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the entry, returning the cached value.
    pub fn into_value(self) -> V {
        self.value
    }

    /// When the entry was last written.
    pub fn inserted_at(&self) -> Instant {
        self.inserted_at
    }

    /// The entry's TTL, or `None` if it never expires on its own.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// The tags attached to this entry.
    pub fn tags(&self) -> &HashSet<Tag> {
        &self.tags
    }

    /// Returns `true` if the entry carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Returns `true` if the entry is stale at `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        expiry::is_expired(self.inserted_at, self.ttl, now)
    }

    /// Time left before the entry goes stale at `now`.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        expiry::remaining(self.inserted_at, self.ttl, now)
    }
}
