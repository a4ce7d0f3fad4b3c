//! Key-naming helpers.
//!
//! The cache accepts any `Hash + Eq` key. These helpers produce the two string
//! shapes application code usually settles on: `"<entity>:<id>"` for a single
//! record and `"<entity>.<field>"` for a derived value.

use std::fmt;

/// Key for a single record: `entity_key("user", 42) == "user:42"`.
///
/// # Examples
///
/// ```
/// use rcache::key::{entity_key, field_key};
///
/// assert_eq!(entity_key("user", 42), "user:42");
/// assert_eq!(field_key("user", "count"), "user.count");
/// ```
pub fn entity_key(entity: &str, id: impl fmt::Display) -> String {
    format!("{entity}:{id}")
}

/// Key for a derived value or listing: `field_key("post", "latest") == "post.latest"`.
pub fn field_key(entity: &str, field: &str) -> String {
    format!("{entity}.{field}")
}
