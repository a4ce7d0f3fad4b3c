//! Cache-aside orchestration over the LRU [`Store`].
//!
//! [`Cache`] is the single-threaded entry point. A read goes through
//! [`Cache::get_or_compute`]:
//!
//! 1. Look the key up in the store.
//! 2. If the entry has outlived its TTL, delete it and treat the read as a miss.
//! 3. On a fresh hit, return a clone of the value. The supplier is not called.
//! 4. On a miss, call the supplier exactly once. Cache and return `Ok`. Return
//!    `Err` untouched without caching anything.
//!
//! Writes elsewhere in the application call [`Cache::invalidate`] or
//! [`Cache::invalidate_by_tag`]. The next read then goes back to the supplier.
//!
//! Because every method takes `&mut self`, each call runs to completion before
//! the next one starts. This is what makes "one supplier call per miss" hold
//! without extra coordination. For shared, multi-task use see
//! [`SharedCache`](crate::sync::SharedCache).

mod stats;

pub use stats::CacheStats;

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use tracing::{debug, trace};

use crate::clock::{Clock, MonotonicClock};
use crate::config::CacheConfig;
use crate::error::ConfigError;
use crate::expiry::Lookup;
use crate::index::Tag;
use crate::store::Store;

use stats::Counters;

/// What the store actually holds for a key.
///
/// A negative marker is kept apart from real values. A cached "not found" can
/// therefore never be mistaken for data.
#[derive(Debug, Clone)]
enum Cached<V> {
    Found(V),
    NotFound,
}

/// An LRU + TTL cache with a cache-aside read path.
///
/// `K` is the key type (any `Hash + Eq + Clone + Debug`; string keys such as
/// `"user:42"` are typical), `V` the cached value, and `C` the [`Clock`] used
/// for TTL checks.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rcache::{Cache, Tag};
///
/// let mut cache: Cache<String, String> = Cache::new(100).unwrap();
///
/// let load = || Ok::<_, std::io::Error>("Ada Lovelace".to_string());
/// let name = cache
///     .get_or_compute("user:1".into(), load, Some(Duration::from_secs(30)), [Tag::from("user")])
///     .unwrap();
/// assert_eq!(name, "Ada Lovelace");
///
/// // Served from the cache: the supplier is not called again.
/// let again = cache
///     .get_or_compute(
///         "user:1".into(),
///         || -> Result<String, std::io::Error> { unreachable!() },
///         None,
///         [],
///     )
///     .unwrap();
/// assert_eq!(again, name);
///
/// // A write elsewhere invalidates everything tagged "user".
/// assert_eq!(cache.invalidate_by_tag("user"), 1);
/// assert!(cache.get("user:1").is_none());
/// ```
pub struct Cache<K, V, C = MonotonicClock> {
    store: Store<K, Cached<V>>,
    clock: C,
    config: CacheConfig,
    counters: Counters,
}

impl<K, V> Cache<K, V, MonotonicClock>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] if `capacity` is `0`.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Self::with_config(CacheConfig::new(capacity))
    }

    /// Creates a cache from a full [`CacheConfig`].
    pub fn with_config(config: CacheConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, MonotonicClock)
    }
}

impl<K, V, C> Cache<K, V, C>
where
    K: Hash + Eq + Clone + fmt::Debug,
    C: Clock,
{
    /// Creates a cache that reads time from `clock`.
    ///
    /// # Errors
    ///
    /// Any error [`CacheConfig::validate`] reports.
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = Store::new(config.capacity)?;
        debug!(
            capacity = config.capacity,
            default_ttl = ?config.default_ttl,
            negative_ttl = ?config.negative_ttl,
            "cache created"
        );
        Ok(Self {
            store,
            clock,
            config,
            counters: Counters::default(),
        })
    }

    /// Returns the cached value for `key` if present and fresh.
    ///
    /// A hit promotes the entry to most-recently-used. An expired entry is
    /// deleted and reported as `None`. So is a negative marker, which stays in
    /// place.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        if !matches!(self.lookup(key), Some(Cached::Found(_))) {
            self.record_miss(key);
            return None;
        }
        self.record_hit(key);
        match self.store.peek(key)?.value() {
            Cached::Found(value) => Some(value),
            Cached::NotFound => None,
        }
    }

    /// Returns the cached value for `key`, computing and caching it on a miss.
    ///
    /// - Fresh hit: returns a clone of the cached value. `supplier` is not
    ///   called.
    /// - Miss (absent, expired, or a negative marker): calls `supplier` once.
    ///   `Ok` is stored with `ttl` and `tags` and then returned. `Err` is
    ///   returned as-is and nothing is cached.
    ///
    /// `ttl = None` falls back to the configured default TTL, if any. Otherwise
    /// the entry never expires on its own.
    pub fn get_or_compute<F, E>(
        &mut self,
        key: K,
        supplier: F,
        ttl: Option<Duration>,
        tags: impl IntoIterator<Item = Tag>,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
        V: Clone,
    {
        if let Some(value) = self.fresh_value(&key) {
            return Ok(value);
        }
        self.record_miss(&key);

        let value = supplier()?;
        self.set(key, value.clone(), ttl, tags);
        Ok(value)
    }

    /// Cache-aside read for lookups that may legitimately find nothing.
    ///
    /// The supplier returns `Ok(None)` for "not found". That result is cached
    /// as a negative marker only when a window is given, either as
    /// `negative_ttl` here or as [`CacheConfig::negative_ttl`]. While the
    /// marker is fresh, later calls return `Ok(None)` without calling the
    /// supplier. Without a window, "not found" is not cached and the next call
    /// asks again.
    pub fn get_or_compute_optional<F, E>(
        &mut self,
        key: K,
        supplier: F,
        ttl: Option<Duration>,
        tags: impl IntoIterator<Item = Tag>,
        negative_ttl: Option<Duration>,
    ) -> Result<Option<V>, E>
    where
        F: FnOnce() -> Result<Option<V>, E>,
        V: Clone,
    {
        let cached = match self.lookup(&key) {
            Some(Cached::Found(value)) => Some(Some(value.clone())),
            Some(Cached::NotFound) => Some(None),
            None => None,
        };
        if let Some(found) = cached {
            self.record_hit(&key);
            return Ok(found);
        }
        self.record_miss(&key);

        match supplier()? {
            Some(value) => {
                self.set(key, value.clone(), ttl, tags);
                Ok(Some(value))
            }
            None => {
                if let Some(window) = negative_ttl.or(self.config.negative_ttl) {
                    debug!(key = ?key, window = ?window, "caching negative result");
                    self.insert(key, Cached::NotFound, Some(window), tags);
                }
                Ok(None)
            }
        }
    }

    /// Writes `value` under `key`, replacing any previous entry.
    ///
    /// Inserting a new key into a full cache evicts the least-recently-used
    /// entry first.
    pub fn set(
        &mut self,
        key: K,
        value: V,
        ttl: Option<Duration>,
        tags: impl IntoIterator<Item = Tag>,
    ) {
        let ttl = ttl.or(self.config.default_ttl);
        self.insert(key, Cached::Found(value), ttl, tags);
    }

    /// Removes `key` and its tag associations.
    ///
    /// Returns `true` if an entry was removed. A missing key is a no-op.
    pub fn invalidate<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let removed = self.store.delete(key).is_some();
        if removed {
            self.counters.invalidations += 1;
            debug!(key = ?key, "invalidated key");
        }
        removed
    }

    /// Removes every key in `keys`, returning how many were present.
    pub fn invalidate_many<'a, Q, I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a Q>,
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized + 'a,
    {
        keys.into_iter().filter(|key| self.invalidate(*key)).count()
    }

    /// Removes every entry tagged with `tag`, returning how many were removed.
    ///
    /// Entries that carry only other tags are left alone, even when those tags
    /// share a prefix with `tag`.
    pub fn invalidate_by_tag<Q>(&mut self, tag: &Q) -> usize
    where
        Tag: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let removed = self.store.remove_tag(tag).len();
        self.counters.invalidations += removed as u64;
        debug!(tag = ?tag, count = removed, "invalidated tag");
        removed
    }

    /// Reports whether `key` is a fresh hit, absent, or expired.
    ///
    /// An expired entry is deleted, exactly as a read would. Recency and the
    /// hit/miss counters are left alone.
    pub fn probe<Q>(&mut self, key: &Q) -> Lookup
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let now = self.clock.now();
        let expired = match self.store.peek(key) {
            Some(entry) => entry.is_expired(now),
            None => return Lookup::Absent,
        };
        if expired {
            self.store.delete(key);
            self.counters.expirations += 1;
            debug!(key = ?key, "entry expired");
            return Lookup::Expired;
        }
        Lookup::Hit
    }

    /// Time left before `key` expires.
    ///
    /// `None` if the key is absent, or if it has no TTL. Use
    /// [`probe`](Self::probe) to tell those cases apart.
    pub fn time_to_live<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.peek(key)?.remaining(self.clock.now())
    }

    /// Deletes every expired entry now, returning how many were removed.
    ///
    /// Expiry is otherwise lazy. Calling this is never required for
    /// correctness. It only releases memory held by stale entries.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let removed = self.store.retain(|_, entry| !entry.is_expired(now)).len();
        self.counters.expirations += removed as u64;
        if removed > 0 {
            debug!(count = removed, "purged expired entries");
        }
        removed
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        let removed = self.store.size();
        self.store.clear();
        self.counters.invalidations += removed as u64;
        debug!(count = removed, "cache cleared");
    }

    /// Number of stored entries, including stale ones not yet observed.
    pub fn len(&self) -> usize {
        self.store.size()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// A snapshot of the hit/miss/eviction counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats::snapshot(self.counters, self.store.size(), self.store.capacity())
    }

    /// Zeroes the counters.
    pub fn reset_stats(&mut self) {
        self.counters = Counters::default();
    }

    /// Keys from most- to least-recently-used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.store.keys()
    }

    /// Clone of the fresh value under `key`, counted as a hit. A miss is left
    /// for the caller to record.
    pub(crate) fn fresh_value<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
        V: Clone,
    {
        let value = match self.lookup(key) {
            Some(Cached::Found(value)) => value.clone(),
            _ => return None,
        };
        self.record_hit(key);
        Some(value)
    }

    pub(crate) fn record_miss<Q>(&mut self, key: &Q)
    where
        Q: fmt::Debug + ?Sized,
    {
        self.counters.misses += 1;
        trace!(key = ?key, "cache miss");
    }

    fn record_hit<Q>(&mut self, key: &Q)
    where
        Q: fmt::Debug + ?Sized,
    {
        self.counters.hits += 1;
        trace!(key = ?key, "cache hit");
    }

    // TTL-aware read: drops stale entries, promotes fresh ones.
    fn lookup<Q>(&mut self, key: &Q) -> Option<&Cached<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        match self.probe(key) {
            Lookup::Hit => self.store.get(key),
            Lookup::Absent | Lookup::Expired => None,
        }
    }

    fn insert(
        &mut self,
        key: K,
        value: Cached<V>,
        ttl: Option<Duration>,
        tags: impl IntoIterator<Item = Tag>,
    ) {
        let now = self.clock.now();
        if self.store.set_at(key, value, ttl, tags, now).is_some() {
            self.counters.evictions += 1;
        }
    }
}

impl<K, V, C> fmt::Debug for Cache<K, V, C>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("counters", &self.counters)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::convert::Infallible;

    use super::*;
    use crate::clock::ManualClock;

    #[derive(Debug, PartialEq)]
    struct NotReachable;

    fn manual(capacity: usize) -> (Cache<String, u32, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let cache = Cache::with_clock(CacheConfig::new(capacity), clock.clone()).unwrap();
        (cache, clock)
    }

    fn ok(value: u32) -> impl FnOnce() -> Result<u32, Infallible> {
        move || Ok(value)
    }

    #[test]
    fn zero_capacity_is_configuration_error() {
        assert!(matches!(
            Cache::<String, u32>::new(0),
            Err(ConfigError::ZeroCapacity)
        ));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = CacheConfig::new(4).with_default_ttl(Duration::ZERO);
        assert!(matches!(
            Cache::<String, u32>::with_config(config),
            Err(ConfigError::ZeroTtl { .. })
        ));
    }

    #[test]
    fn lru_scenario() {
        let mut cache: Cache<&str, i32> = Cache::new(2).unwrap();
        cache.set("a", 1, None, []);
        cache.set("b", 2, None, []);
        assert_eq!(cache.get("a"), Some(&1));
        cache.set("c", 3, None, []);

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(&1));
        assert_eq!(cache.get("c"), Some(&3));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn supplier_called_once_for_fresh_key() {
        let (mut cache, _) = manual(4);
        let calls = Cell::new(0);
        for _ in 0..5 {
            let value = cache
                .get_or_compute(
                    "user:1".to_string(),
                    || {
                        calls.set(calls.get() + 1);
                        Ok::<_, Infallible>(7)
                    },
                    None,
                    [],
                )
                .unwrap();
            assert_eq!(value, 7);
        }
        assert_eq!(calls.get(), 1);

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 4);
    }

    #[test]
    fn ttl_expiry_triggers_recompute() {
        let (mut cache, clock) = manual(4);
        let ttl = Some(Duration::from_millis(100));
        cache
            .get_or_compute("k".into(), ok(1), ttl, [])
            .unwrap();

        clock.advance(Duration::from_millis(50));
        assert_eq!(cache.get("k"), Some(&1));
        assert_eq!(
            cache.time_to_live("k"),
            Some(Duration::from_millis(50))
        );

        clock.advance(Duration::from_millis(100));
        let value = cache.get_or_compute("k".into(), ok(2), ttl, []).unwrap();
        assert_eq!(value, 2);
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn expired_entry_is_deleted_on_read() {
        let (mut cache, clock) = manual(4);
        cache.set("k".into(), 1, Some(Duration::from_millis(10)), []);
        clock.advance(Duration::from_millis(10));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn no_ttl_never_expires() {
        let (mut cache, clock) = manual(4);
        cache.set("k".into(), 1, None, []);
        clock.advance(Duration::from_secs(86_400 * 365));
        assert_eq!(cache.get("k"), Some(&1));
        assert_eq!(cache.time_to_live("k"), None);
    }

    #[test]
    fn default_ttl_applies_when_call_passes_none() {
        let clock = ManualClock::new();
        let config = CacheConfig::new(4).with_default_ttl(Duration::from_secs(1));
        let mut cache: Cache<String, u32, _> = Cache::with_clock(config, clock.clone()).unwrap();

        cache.set("default".into(), 1, None, []);
        cache.set("explicit".into(), 2, Some(Duration::from_secs(10)), []);
        clock.advance(Duration::from_secs(2));

        assert_eq!(cache.get("default"), None);
        assert_eq!(cache.get("explicit"), Some(&2));
    }

    #[test]
    fn supplier_error_is_propagated_and_not_cached() {
        let (mut cache, _) = manual(4);
        let err = cache
            .get_or_compute("k".into(), || Err::<u32, _>("db down"), None, [])
            .unwrap_err();
        assert_eq!(err, "db down");
        assert!(cache.is_empty());

        let value = cache.get_or_compute("k".into(), ok(3), None, []).unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let (mut cache, _) = manual(4);
        cache.get_or_compute("k".into(), ok(1), None, []).unwrap();
        assert!(cache.invalidate("k"));
        assert!(!cache.invalidate("k"));

        let value = cache.get_or_compute("k".into(), ok(2), None, []).unwrap();
        assert_eq!(value, 2);
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn invalidate_many_counts_present_keys() {
        let (mut cache, _) = manual(4);
        cache.set("a".into(), 1, None, []);
        cache.set("b".into(), 2, None, []);
        assert_eq!(cache.invalidate_many(["a", "b", "zzz"]), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn tag_invalidation() {
        let (mut cache, _) = manual(8);
        cache.set(
            "post:42".into(),
            42,
            None,
            [Tag::from("post"), Tag::from("post-42")],
        );
        cache.set(
            "post:43".into(),
            43,
            None,
            [Tag::from("post"), Tag::from("post-43")],
        );
        cache.set("only:43".into(), 430, None, [Tag::from("post-43")]);

        assert_eq!(cache.invalidate_by_tag("post-42"), 1);
        assert_eq!(cache.get("only:43"), Some(&430));
        assert_eq!(cache.get("post:43"), Some(&43));

        assert_eq!(cache.invalidate_by_tag("post"), 1);
        assert_eq!(cache.get("post:43"), None);
        assert_eq!(cache.get("only:43"), Some(&430));
        assert_eq!(cache.invalidate_by_tag("missing"), 0);
    }

    #[test]
    fn expired_entries_leave_tag_index() {
        let (mut cache, clock) = manual(4);
        cache.set("k".into(), 1, Some(Duration::from_millis(5)), [Tag::from("t")]);
        clock.advance(Duration::from_millis(5));
        assert_eq!(cache.probe("k"), Lookup::Expired);
        assert_eq!(cache.probe("k"), Lookup::Absent);
        assert_eq!(cache.invalidate_by_tag("t"), 0);
    }

    #[test]
    fn negative_result_cached_only_when_requested() {
        let (mut cache, clock) = manual(4);
        let calls = Cell::new(0);
        let missing = || {
            calls.set(calls.get() + 1);
            Ok::<Option<u32>, NotReachable>(None)
        };

        assert_eq!(
            cache.get_or_compute_optional("u:9".into(), missing, None, [], None),
            Ok(None)
        );
        assert_eq!(
            cache.get_or_compute_optional("u:9".into(), missing, None, [], None),
            Ok(None)
        );
        assert_eq!(calls.get(), 2, "no window means no negative caching");

        let window = Some(Duration::from_millis(100));
        cache
            .get_or_compute_optional("u:9".into(), missing, None, [], window)
            .unwrap();
        cache
            .get_or_compute_optional("u:9".into(), missing, None, [], window)
            .unwrap();
        assert_eq!(calls.get(), 3);

        clock.advance(Duration::from_millis(100));
        cache
            .get_or_compute_optional("u:9".into(), missing, None, [], window)
            .unwrap();
        assert_eq!(calls.get(), 4, "negative marker expires on its own window");
    }

    #[test]
    fn negative_marker_is_not_a_value() {
        let (mut cache, _) = manual(4);
        let window = Some(Duration::from_secs(60));
        cache
            .get_or_compute_optional("k".into(), || Ok::<_, Infallible>(None), None, [], window)
            .unwrap();

        assert_eq!(cache.get("k"), None);
        let value = cache.get_or_compute("k".into(), ok(5), None, []).unwrap();
        assert_eq!(value, 5);
        assert_eq!(
            cache.get_or_compute_optional("k".into(), || Ok::<_, Infallible>(None), None, [], window),
            Ok(Some(5))
        );
    }

    #[test]
    fn configured_negative_ttl_is_default_window() {
        let clock = ManualClock::new();
        let config = CacheConfig::new(4).with_negative_ttl(Duration::from_secs(5));
        let mut cache: Cache<String, u32, _> = Cache::with_clock(config, clock).unwrap();
        cache
            .get_or_compute_optional("k".into(), || Ok::<_, Infallible>(None), None, [], None)
            .unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.time_to_live("k"), Some(Duration::from_secs(5)));
    }

    #[test]
    fn negative_marker_cleared_by_tag() {
        let (mut cache, _) = manual(4);
        cache
            .get_or_compute_optional(
                "k".into(),
                || Ok::<_, Infallible>(None),
                None,
                [Tag::from("user")],
                Some(Duration::from_secs(60)),
            )
            .unwrap();
        assert_eq!(cache.invalidate_by_tag("user"), 1);
    }

    #[test]
    fn optional_supplier_error_not_cached() {
        let (mut cache, _) = manual(4);
        let result = cache.get_or_compute_optional(
            "k".into(),
            || Err::<Option<u32>, _>("boom"),
            None,
            [],
            Some(Duration::from_secs(60)),
        );
        assert_eq!(result, Err("boom"));
        assert!(cache.is_empty());
    }

    #[test]
    fn purge_expired_sweeps_stale_entries() {
        let (mut cache, clock) = manual(8);
        cache.set("short".into(), 1, Some(Duration::from_millis(10)), [Tag::from("t")]);
        cache.set("long".into(), 2, Some(Duration::from_secs(10)), [Tag::from("t")]);
        cache.set("forever".into(), 3, None, []);
        clock.advance(Duration::from_millis(20));

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.invalidate_by_tag("t"), 1);
        assert_eq!(cache.purge_expired(), 0);
    }

    #[test]
    fn capacity_holds_under_churn() {
        let (mut cache, _) = manual(3);
        for i in 0..50u32 {
            cache.set(format!("k{i}"), i, None, []);
            assert!(cache.len() <= cache.capacity());
        }
        assert_eq!(cache.stats().evictions, 47);
        let keys: Vec<_> = cache.keys().cloned().collect();
        assert_eq!(keys, ["k49", "k48", "k47"]);
    }

    #[test]
    fn clear_and_reset_stats() {
        let (mut cache, _) = manual(4);
        cache.set("a".into(), 1, None, []);
        cache.get("a");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits, 1);
        cache.reset_stats();
        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.stats().capacity, 4);
    }
}
