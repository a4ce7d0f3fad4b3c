//! Thread-safe cache with single-flight misses.
//!
//! [`SharedCache`] wraps a [`Cache`] in one [`Mutex`]. A reader/writer lock would
//! not be enough, because every read moves the entry in the recency order.
//!
//! A cache-aside miss runs in two phases, and no lock is held while the
//! supplier runs:
//!
//! 1. **Claim.** Under the in-flight registry lock, the first caller for a key
//!    becomes the *leader* and registers a marker. Later callers find the
//!    marker and become *waiters*.
//! 2. **Release.** When the leader finishes (success, failure, or being dropped
//!    mid-flight), its `FlightGuard` removes the marker and closes the
//!    channel. Each waiter wakes and reads the store again. Waiters never
//!    receive the leader's result object. If the store still misses (the leader
//!    failed or was cancelled), the waiters compete to lead a new attempt with
//!    their own suppliers.
//!
//! A write that lands while a computation is in flight (`set`, `invalidate`,
//! `invalidate_by_tag`, `clear`) marks the flight as superseded. The leader
//! still returns its value to its own caller but does not store it, so the
//! write is never undone by a result computed before it.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::cache::{Cache, CacheStats};
use crate::clock::{Clock, MonotonicClock};
use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult, ConfigError, PoisonedLock};
use crate::index::Tag;

type Flights<K> = Mutex<HashMap<K, InFlight>>;

// Registry entry for one running computation.
struct InFlight {
    done: watch::Receiver<()>,
    tags: Vec<Tag>,
    superseded: bool,
}

struct Shared<K, V, C> {
    cache: Mutex<Cache<K, V, C>>,
    flights: Flights<K>,
}

/// A cloneable, `Send + Sync` handle to a shared [`Cache`].
///
/// Build one at the application's composition root and pass clones to
/// whatever needs it. Every clone refers to the same entries.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rcache::{SharedCache, Tag};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let cache: SharedCache<String, String> = SharedCache::new(1_000)?;
///
/// let profile = cache
///     .get_or_compute(
///         "user:42".to_string(),
///         || async { Ok::<_, std::io::Error>("Grace".to_string()) },
///         Some(Duration::from_secs(60)),
///         [Tag::from("user-42")],
///     )
///     .await?;
/// assert_eq!(profile, "Grace");
///
/// // Write path: drop everything derived from user 42.
/// cache.invalidate_by_tag("user-42")?;
/// assert_eq!(cache.len()?, 0);
/// # Ok(())
/// # }
/// ```
pub struct SharedCache<K, V, C = MonotonicClock> {
    inner: Arc<Shared<K, V, C>>,
}

impl<K, V, C> Clone for SharedCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V, MonotonicClock>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    /// Creates a shared cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] if `capacity` is `0`.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Cache::new(capacity).map(Self::from_cache)
    }

    /// Creates a shared cache from a full [`CacheConfig`].
    pub fn with_config(config: CacheConfig) -> Result<Self, ConfigError> {
        Cache::with_config(config).map(Self::from_cache)
    }
}

impl<K, V, C> SharedCache<K, V, C>
where
    K: Hash + Eq + Clone + fmt::Debug,
    C: Clock,
{
    /// Creates a shared cache that reads time from `clock`.
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self, ConfigError> {
        Cache::with_clock(config, clock).map(Self::from_cache)
    }

    /// Wraps an existing cache.
    pub fn from_cache(cache: Cache<K, V, C>) -> Self {
        Self {
            inner: Arc::new(Shared {
                cache: Mutex::new(cache),
                flights: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Returns the cached value for `key`, computing it at most once across
    /// concurrent callers.
    ///
    /// On a miss, exactly one caller runs its `supplier`. The rest wait and
    /// then read the value it stored. If the supplier fails, its caller gets
    /// [`CacheError::Supplier`] and nothing is cached. A waiting caller then
    /// runs its own supplier.
    ///
    /// Dropping the returned future, for example when it loses a
    /// `tokio::select!` or its task is aborted, releases the key's in-flight
    /// marker. Waiters never block on a computation that nobody is running.
    ///
    /// # Errors
    ///
    /// - [`CacheError::Supplier`] — this caller's supplier failed.
    /// - [`CacheError::PoisonedLock`] — an internal lock was poisoned.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: K,
        supplier: F,
        ttl: Option<Duration>,
        tags: impl IntoIterator<Item = Tag>,
    ) -> CacheResult<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        V: Clone,
    {
        let tags: Vec<Tag> = tags.into_iter().collect();

        let guard = loop {
            if let Some(value) = self.fresh(&key)? {
                return Ok(value);
            }
            match self.claim(&key, &tags)? {
                Flight::Lead(guard) => break guard,
                Flight::Wait(mut done) => {
                    trace!(key = ?key, "waiting on in-flight computation");
                    // Resolves with `Err` once the leader's sender is dropped.
                    let _ = done.changed().await;
                }
            }
        };

        // A leader may have finished between our miss and our claim.
        if let Some(value) = self.fresh(&key)? {
            return Ok(value);
        }
        self.lock_cache()?.record_miss(&key);

        let value = supplier().await.map_err(CacheError::Supplier)?;
        self.store_result(key, value.clone(), ttl, tags)?;
        drop(guard);
        Ok(value)
    }

    /// [`get_or_compute`](Self::get_or_compute) with a deadline covering both
    /// waiting and computing.
    ///
    /// On timeout nothing is cached and the in-flight marker is released.
    ///
    /// # Errors
    ///
    /// As [`get_or_compute`](Self::get_or_compute), plus
    /// [`CacheError::TimedOut`].
    pub async fn get_or_compute_with_timeout<F, Fut, E>(
        &self,
        key: K,
        supplier: F,
        ttl: Option<Duration>,
        tags: impl IntoIterator<Item = Tag>,
        timeout: Duration,
    ) -> CacheResult<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        V: Clone,
    {
        let label = format!("{key:?}");
        match tokio::time::timeout(timeout, self.get_or_compute(key, supplier, ttl, tags)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(key = %label, timeout = ?timeout, "cache computation timed out");
                Err(CacheError::TimedOut { after: timeout })
            }
        }
    }

    /// Returns a clone of the fresh value under `key`, if any.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<V>, PoisonedLock>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
        V: Clone,
    {
        Ok(self.lock_cache()?.get(key).cloned())
    }

    /// Writes `value` under `key`. See [`Cache::set`].
    ///
    /// A computation in flight for `key` will not overwrite this value.
    pub fn set(
        &self,
        key: K,
        value: V,
        ttl: Option<Duration>,
        tags: impl IntoIterator<Item = Tag>,
    ) -> Result<(), PoisonedLock> {
        let mut cache = self.lock_cache()?;
        if let Some(flight) = self.lock_flights()?.get_mut(&key) {
            flight.superseded = true;
        }
        cache.set(key, value, ttl, tags);
        Ok(())
    }

    /// Removes `key`. Returns `true` if it was present.
    ///
    /// A computation in flight for `key` finishes for its own caller but does
    /// not store its result, so the next read calls a supplier again.
    pub fn invalidate<Q>(&self, key: &Q) -> Result<bool, PoisonedLock>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let mut cache = self.lock_cache()?;
        if let Some(flight) = self.lock_flights()?.get_mut(key) {
            flight.superseded = true;
        }
        Ok(cache.invalidate(key))
    }

    /// Removes every entry tagged with `tag`, returning how many were removed.
    ///
    /// In-flight computations that will store under `tag` are superseded as
    /// in [`invalidate`](Self::invalidate).
    pub fn invalidate_by_tag<Q>(&self, tag: &Q) -> Result<usize, PoisonedLock>
    where
        Tag: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        let mut cache = self.lock_cache()?;
        for flight in self.lock_flights()?.values_mut() {
            if flight.tags.iter().any(|t| <Tag as Borrow<Q>>::borrow(t) == tag) {
                flight.superseded = true;
            }
        }
        Ok(cache.invalidate_by_tag(tag))
    }

    /// Deletes every expired entry now. See [`Cache::purge_expired`].
    pub fn purge_expired(&self) -> Result<usize, PoisonedLock> {
        Ok(self.lock_cache()?.purge_expired())
    }

    /// Drops every entry. Computations already in flight do not store their
    /// results.
    pub fn clear(&self) -> Result<(), PoisonedLock> {
        let mut cache = self.lock_cache()?;
        for flight in self.lock_flights()?.values_mut() {
            flight.superseded = true;
        }
        cache.clear();
        Ok(())
    }

    /// Number of stored entries.
    pub fn len(&self) -> Result<usize, PoisonedLock> {
        Ok(self.lock_cache()?.len())
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> Result<bool, PoisonedLock> {
        Ok(self.lock_cache()?.is_empty())
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> Result<usize, PoisonedLock> {
        Ok(self.lock_cache()?.capacity())
    }

    /// A snapshot of the cache counters.
    pub fn stats(&self) -> Result<CacheStats, PoisonedLock> {
        Ok(self.lock_cache()?.stats())
    }

    /// Number of keys with a computation currently in flight.
    pub fn in_flight(&self) -> Result<usize, PoisonedLock> {
        Ok(self.lock_flights()?.len())
    }

    fn fresh(&self, key: &K) -> Result<Option<V>, PoisonedLock>
    where
        V: Clone,
    {
        Ok(self.lock_cache()?.fresh_value(key))
    }

    // Registers this caller as leader for `key`, or hands back the running
    // leader's completion signal.
    fn claim(&self, key: &K, tags: &[Tag]) -> Result<Flight<'_, K>, PoisonedLock> {
        let mut flights = self.lock_flights()?;
        if let Some(flight) = flights.get(key) {
            return Ok(Flight::Wait(flight.done.clone()));
        }
        let (tx, rx) = watch::channel(());
        flights.insert(
            key.clone(),
            InFlight {
                done: rx,
                tags: tags.to_vec(),
                superseded: false,
            },
        );
        trace!(key = ?key, "leading computation");
        Ok(Flight::Lead(FlightGuard {
            flights: &self.inner.flights,
            key: key.clone(),
            _done: tx,
        }))
    }

    // Lock order is cache, then flights. Writers mark flights under the same
    // cache lock, so the check and the store cannot interleave with a write.
    fn store_result(
        &self,
        key: K,
        value: V,
        ttl: Option<Duration>,
        tags: Vec<Tag>,
    ) -> Result<(), PoisonedLock> {
        let mut cache = self.lock_cache()?;
        let superseded = self
            .lock_flights()?
            .get(&key)
            .is_some_and(|flight| flight.superseded);
        if superseded {
            debug!(key = ?key, "write landed during computation; result not cached");
            return Ok(());
        }
        cache.set(key, value, ttl, tags);
        Ok(())
    }

    fn lock_cache(&self) -> Result<MutexGuard<'_, Cache<K, V, C>>, PoisonedLock> {
        self.inner.cache.lock().map_err(|_| {
            warn!("cache lock poisoned");
            PoisonedLock
        })
    }

    fn lock_flights(&self) -> Result<MutexGuard<'_, HashMap<K, InFlight>>, PoisonedLock> {
        self.inner.flights.lock().map_err(|_| {
            warn!("in-flight registry lock poisoned");
            PoisonedLock
        })
    }
}

impl<K, V, C> fmt::Debug for SharedCache<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCache")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

enum Flight<'a, K: Hash + Eq> {
    Lead(FlightGuard<'a, K>),
    Wait(watch::Receiver<()>),
}

/// Held by the leader of a computation. Dropping it removes the in-flight
/// marker and then closes the channel waiters are parked on.
struct FlightGuard<'a, K: Hash + Eq> {
    flights: &'a Flights<K>,
    key: K,
    _done: watch::Sender<()>,
}

impl<K: Hash + Eq> Drop for FlightGuard<'_, K> {
    fn drop(&mut self) {
        // Must run even after a panic elsewhere, or waiters would hang.
        let mut flights = self.flights.lock().unwrap_or_else(PoisonError::into_inner);
        flights.remove(&self.key);
    }
}
