//! Bounded key → entry storage with LRU recency ordering.
//!
//! The recency list is arena-indexed: nodes live in a growable `Vec`, and
//! neighbours are referenced by slot index rather than by pointer. A
//! `HashMap<K, usize>` gives O(1) lookup of a key's slot. Freed slots are
//! recycled through a free list, so the arena never grows past `capacity`.
//!
//! ```text
//!   head (MRU)                                tail (LRU)
//!      │                                          │
//!      ▼                                          ▼
//!   [slot 2] ⇄ [slot 0] ⇄ [slot 3] ⇄ … ⇄ [slot 1]
//! ```
//!
//! Eviction is a property of that ordering: inserting a new key into a full
//! store first removes the tail. Ties between never-read entries resolve in
//! insertion order, because each insert lands at the head.
//!
//! The store also owns the [`TagIndex`] and updates it in every call that adds
//! or removes an entry, whether by overwrite, eviction, or deletion.
//!
//! TTL is stored per entry but **not** enforced here. The orchestrator checks
//! freshness so that expiry stays a policy above the data structure.

mod entry;

pub use entry::CacheEntry;

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::ConfigError;
use crate::index::{Tag, TagIndex};

// Sentinel for "no neighbour".
const NIL: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Links {
    prev: usize,
    next: usize,
}

impl Links {
    const DETACHED: Links = Links {
        prev: NIL,
        next: NIL,
    };
}

#[derive(Debug)]
struct Slot<K, V> {
    key: K,
    entry: CacheEntry<V>,
}

/// A fixed-capacity LRU map from `K` to [`CacheEntry<V>`].
///
/// # Examples
///
/// ```
/// use rcache::store::Store;
///
/// let mut store = Store::new(2).unwrap();
/// store.set("a", 1, None, []);
/// store.set("b", 2, None, []);
/// store.get("a");                       // promotes "a"
/// let evicted = store.set("c", 3, None, []);
///
/// assert_eq!(evicted, Some(("b", 2)));
/// assert_eq!(store.get("b"), None);
/// assert_eq!(store.get("a"), Some(&1));
/// assert_eq!(store.get("c"), Some(&3));
/// ```
pub struct Store<K, V> {
    slots: Vec<Option<Slot<K, V>>>,
    links: Vec<Links>,
    free: Vec<usize>,
    map: HashMap<K, usize>,
    head: usize,
    tail: usize,
    capacity: usize,
    index: TagIndex<K>,
}

impl<K, V> Store<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    /// Creates an empty store holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] if `capacity` is `0`.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(Self {
            slots: Vec::new(),
            links: Vec::new(),
            free: Vec::new(),
            map: HashMap::new(),
            head: NIL,
            tail: NIL,
            capacity,
            index: TagIndex::new(),
        })
    }

    /// Returns the value for `key` and promotes it to most-recently-used.
    ///
    /// TTL is not checked here.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entry(key).map(CacheEntry::value)
    }

    /// Like [`get`](Self::get), but returns the whole entry.
    pub fn entry<Q>(&mut self, key: &Q) -> Option<&CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.promote(idx);
        self.slots[idx].as_ref().map(|slot| &slot.entry)
    }

    /// Returns the entry for `key` without touching recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.slots[idx].as_ref().map(|slot| &slot.entry)
    }

    /// Returns `true` if `key` is stored (fresh or not).
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Inserts or overwrites `key`, stamped with the current instant.
    ///
    /// See [`set_at`](Self::set_at).
    pub fn set(
        &mut self,
        key: K,
        value: V,
        ttl: Option<Duration>,
        tags: impl IntoIterator<Item = Tag>,
    ) -> Option<(K, V)> {
        self.set_at(key, value, ttl, tags, Instant::now())
    }

    /// Inserts or overwrites `key` with an explicit insertion instant.
    ///
    /// An existing key has its value, TTL and tags replaced and moves to the
    /// most-recently-used position. A new key in a full store first evicts the
    /// least-recently-used entry, which is returned.
    pub fn set_at(
        &mut self,
        key: K,
        value: V,
        ttl: Option<Duration>,
        tags: impl IntoIterator<Item = Tag>,
        inserted_at: Instant,
    ) -> Option<(K, V)> {
        let tags: HashSet<Tag> = tags.into_iter().collect();
        for tag in &tags {
            self.index.tag(&key, tag);
        }
        let entry = CacheEntry::new(value, inserted_at, ttl, tags);

        if let Some(&idx) = self.map.get(&key) {
            if let Some(slot) = self.slots[idx].as_mut() {
                let previous = std::mem::replace(&mut slot.entry, entry);
                let dropped = previous
                    .tags()
                    .iter()
                    .filter(|tag| !slot.entry.tags().contains(*tag));
                self.index.untag_all(&slot.key, dropped);
            }
            self.promote(idx);
            return None;
        }

        let evicted = if self.map.len() >= self.capacity {
            self.evict_lru()
        } else {
            None
        };

        let idx = self.allocate(Slot {
            key: key.clone(),
            entry,
        });
        self.map.insert(key, idx);
        self.push_front(idx);
        evicted
    }

    /// Removes `key`, returning its value if it was present.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.remove_at(idx).map(|(_, entry)| entry.into_value())
    }

    /// Removes every entry tagged with `tag`, returning them.
    pub fn remove_tag<Q>(&mut self, tag: &Q) -> Vec<(K, V)>
    where
        Tag: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .keys_for_tag(tag)
            .into_iter()
            .filter_map(|key| {
                let idx = *self.map.get(&key)?;
                self.remove_at(idx)
                    .map(|(key, entry)| (key, entry.into_value()))
            })
            .collect()
    }

    /// Removes every entry for which `keep` returns `false`.
    pub fn retain<F>(&mut self, mut keep: F) -> Vec<(K, V)>
    where
        F: FnMut(&K, &CacheEntry<V>) -> bool,
    {
        let doomed: Vec<usize> = self
            .map
            .values()
            .copied()
            .filter(|&idx| {
                self.slots[idx]
                    .as_ref()
                    .is_some_and(|slot| !keep(&slot.key, &slot.entry))
            })
            .collect();

        doomed
            .into_iter()
            .filter_map(|idx| self.remove_at(idx))
            .map(|(key, entry)| (key, entry.into_value()))
            .collect()
    }

    /// Snapshot of the keys currently tagged with `tag`.
    pub fn keys_for_tag<Q>(&self, tag: &Q) -> HashSet<K>
    where
        Tag: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.keys_for_tag(tag)
    }

    /// Read access to the tag index.
    pub fn tag_index(&self) -> &TagIndex<K> {
        &self.index
    }

    /// The key that the next overflowing insert would evict.
    pub fn lru_key(&self) -> Option<&K> {
        self.slots
            .get(self.tail)?
            .as_ref()
            .map(|slot| &slot.key)
    }

    /// Keys from most- to least-recently-used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Entries from most- to least-recently-used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &CacheEntry<V>)> + '_ {
        let first = (self.head != NIL).then_some(self.head);
        std::iter::successors(first, move |&idx| {
            let next = self.links[idx].next;
            (next != NIL).then_some(next)
        })
        .filter_map(move |idx| {
            self.slots[idx]
                .as_ref()
                .map(|slot| (&slot.key, &slot.entry))
        })
    }

    /// Drops every entry and tag association.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.links.clear();
        self.free.clear();
        self.map.clear();
        self.index.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    /// Number of entries currently stored.
    pub fn size(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn evict_lru(&mut self) -> Option<(K, V)> {
        if self.tail == NIL {
            return None;
        }
        let (key, entry) = self.remove_at(self.tail)?;
        debug!(key = ?key, capacity = self.capacity, "evicted least-recently-used entry");
        Some((key, entry.into_value()))
    }

    // Unlinks a slot, frees it, and purges the key from the map and tag index.
    fn remove_at(&mut self, idx: usize) -> Option<(K, CacheEntry<V>)> {
        let slot = self.slots[idx].take()?;
        self.detach(idx);
        self.free.push(idx);
        self.map.remove(&slot.key);
        self.index.untag_all(&slot.key, slot.entry.tags());
        Some((slot.key, slot.entry))
    }

    fn allocate(&mut self, slot: Slot<K, V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(slot);
                self.links[idx] = Links::DETACHED;
                idx
            }
            None => {
                self.slots.push(Some(slot));
                self.links.push(Links::DETACHED);
                self.slots.len() - 1
            }
        }
    }

    fn promote(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.detach(idx);
        self.push_front(idx);
    }

    fn detach(&mut self, idx: usize) {
        let Links { prev, next } = self.links[idx];
        if prev != NIL {
            self.links[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.links[next].prev = prev;
        } else {
            self.tail = prev;
        }
        self.links[idx] = Links::DETACHED;
    }

    fn push_front(&mut self, idx: usize) {
        self.links[idx] = Links {
            prev: NIL,
            next: self.head,
        };
        if self.head != NIL {
            self.links[self.head].prev = idx;
        } else {
            self.tail = idx;
        }
        self.head = idx;
    }
}

impl<K, V> fmt::Debug for Store<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("size", &self.size())
            .field("capacity", &self.capacity)
            .field("recency", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}
