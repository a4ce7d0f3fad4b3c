//! # rcache
//!
//! An in-process cache layer: LRU eviction, per-entry TTL, a cache-aside read
//! path, and explicit invalidation by key or by tag.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use rcache::{Cache, Tag};
//!
//! #[derive(Debug)]
//! struct NotFound;
//!
//! fn load_post(id: u32) -> Result<String, NotFound> {
//!     Ok(format!("post #{id}"))
//! }
//!
//! let mut cache: Cache<String, String> = Cache::new(1_000).unwrap();
//!
//! // Read path: compute on miss, serve from memory afterwards.
//! let post = cache
//!     .get_or_compute(
//!         "post:42".to_string(),
//!         || load_post(42),
//!         Some(Duration::from_secs(300)),
//!         [Tag::from("post"), Tag::from("post-42")],
//!     )
//!     .unwrap();
//! assert_eq!(post, "post #42");
//!
//! // Write path: invalidate what the write made stale.
//! cache.invalidate_by_tag("post-42");
//! assert!(cache.get("post:42").is_none());
//! ```
//!
//! For multi-threaded or multi-task use, [`SharedCache`] adds locking and
//! guarantees one computation per key at a time.

// ── Core data structures ──────────────────────────────────────────────────────
pub mod expiry;
pub mod index;
pub mod store;

// ── Orchestration ─────────────────────────────────────────────────────────────
pub mod cache;
pub mod sync;

// ── Supporting modules ────────────────────────────────────────────────────────
pub mod clock;
pub mod config;
pub mod error;
pub mod key;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use cache::{Cache, CacheStats};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use config::CacheConfig;
pub use error::{CacheError, CacheResult, ConfigError, PoisonedLock};
pub use expiry::Lookup;
pub use index::{Tag, TagIndex};
pub use store::{CacheEntry, Store};
pub use sync::SharedCache;
