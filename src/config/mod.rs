//! Cache configuration — capacity and default freshness windows.
//!
//! A [`CacheConfig`] is built in code through its builder methods or loaded
//! from JSON. Durations are written as integer milliseconds:
//!
//! ```json
//! { "capacity": 1024, "default_ttl_ms": 30000, "negative_ttl_ms": 5000 }
//! ```
//!
//! Validation happens once, at construction; a cache never holds an invalid
//! configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Construction parameters for [`Cache`](crate::Cache) and
/// [`SharedCache`](crate::SharedCache).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rcache::CacheConfig;
///
/// let config = CacheConfig::new(512)
///     .with_default_ttl(Duration::from_secs(60))
///     .with_negative_ttl(Duration::from_secs(5));
/// assert!(config.validate().is_ok());
/// assert!(CacheConfig::new(0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of live entries.
    pub capacity: usize,

    /// TTL applied when a write passes `ttl = None`. Unset means such
    /// entries never expire on their own.
    #[serde(rename = "default_ttl_ms", default, with = "opt_millis")]
    pub default_ttl: Option<Duration>,

    /// How long a "not found" result is remembered by
    /// [`Cache::get_or_compute_optional`](crate::Cache::get_or_compute_optional)
    /// when the call does not pass its own window. Unset disables negative
    /// caching by default.
    #[serde(rename = "negative_ttl_ms", default, with = "opt_millis")]
    pub negative_ttl: Option<Duration>,
}

impl CacheConfig {
    /// Creates a configuration with the given capacity and no TTL defaults.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            default_ttl: None,
            negative_ttl: None,
        }
    }

    /// Sets the TTL used when a write does not specify one.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Enables negative caching by default for the given window.
    pub fn with_negative_ttl(mut self, ttl: Duration) -> Self {
        self.negative_ttl = Some(ttl);
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ZeroCapacity`] — `capacity` is `0`.
    /// - [`ConfigError::ZeroTtl`] — a configured duration is zero.
    /// - [`ConfigError::UnrepresentableTtl`] — a configured duration is not a
    ///   whole number of milliseconds, or overflows `u64` milliseconds, and so
    ///   would not survive a JSON round trip.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        check_ttl(self.default_ttl, "default_ttl")?;
        check_ttl(self.negative_ttl, "negative_ttl")
    }

    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or any error
    /// [`validate`](Self::validate) reports.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: CacheConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration back to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn check_ttl(ttl: Option<Duration>, field: &'static str) -> Result<(), ConfigError> {
    let Some(ttl) = ttl else {
        return Ok(());
    };
    if ttl.is_zero() {
        return Err(ConfigError::ZeroTtl { field });
    }
    if ttl.subsec_nanos() % 1_000_000 != 0 || u64::try_from(ttl.as_millis()).is_err() {
        return Err(ConfigError::UnrepresentableTtl { field });
    }
    Ok(())
}

// `Option<Duration>` as optional integer milliseconds.
mod opt_millis {
    use std::time::Duration;

    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let Some(d) = value else {
            return serializer.serialize_none();
        };
        if d.subsec_nanos() % 1_000_000 != 0 {
            return Err(S::Error::custom(format!("{d:?} is not a whole number of milliseconds")));
        }
        let millis = u64::try_from(d.as_millis())
            .map_err(|_| S::Error::custom(format!("{d:?} overflows u64 milliseconds")))?;
        serializer.serialize_some(&millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
