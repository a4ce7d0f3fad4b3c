//! Error types shared by the store, the orchestrators, and configuration.
//!
//! - [`ConfigError`] — invalid construction parameters; fatal, never retried.
//! - [`CacheError`] — failures of the concurrent [`SharedCache`](crate::sync::SharedCache)
//!   read path, generic over the caller's supplier error.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while building a cache or loading its configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cache capacity must be at least 1")]
    ZeroCapacity,

    #[error("{field} must be greater than zero when set")]
    ZeroTtl { field: &'static str },

    #[error("{field} must be a whole number of milliseconds that fits in a u64")]
    UnrepresentableTtl { field: &'static str },

    #[error("invalid cache configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A lock inside [`SharedCache`](crate::sync::SharedCache) was poisoned by a
/// panicking holder. The cache refuses to serve possibly corrupted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cache lock poisoned by a panicking holder")]
pub struct PoisonedLock;

/// Errors returned by the concurrent cache-aside path.
///
/// `E` is the caller's supplier error. It is carried verbatim and never
/// stored in the cache.
#[derive(Debug, Error)]
pub enum CacheError<E> {
    #[error("supplier failed")]
    Supplier(#[source] E),

    #[error("cache lock poisoned by a panicking holder")]
    PoisonedLock,

    #[error("supplier did not complete within {after:?}")]
    TimedOut { after: Duration },
}

impl<E> CacheError<E> {
    /// Returns the supplier error, if this is [`CacheError::Supplier`].
    pub fn into_supplier(self) -> Option<E> {
        match self {
            CacheError::Supplier(e) => Some(e),
            _ => None,
        }
    }

    /// Returns `true` if the failure came from the caller's supplier.
    pub fn is_supplier(&self) -> bool {
        matches!(self, CacheError::Supplier(_))
    }
}

impl<E> From<PoisonedLock> for CacheError<E> {
    fn from(_: PoisonedLock) -> Self {
        CacheError::PoisonedLock
    }
}

/// Result alias for the concurrent cache-aside path.
pub type CacheResult<T, E> = Result<T, CacheError<E>>;
