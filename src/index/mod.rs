//! Tag index — bulk invalidation of related entries.
//!
//! A [`Tag`] is a label such as `"post"` or `"user-42"`. It is a separate type
//! from cache keys, so a tag can never be mistaken for a key with the same
//! spelling.
//!
//! [`TagIndex`] maps each tag to the set of keys carrying it. The
//! [`Store`](crate::store::Store) owns the index and updates it in the same
//! call that adds or removes an entry. The index therefore never names a key
//! that is not live in the store.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// An invalidation label attached to cache entries.
///
/// # Examples
///
/// ```
/// use rcache::Tag;
///
/// let tag = Tag::new("post-42");
/// assert_eq!(tag.as_str(), "post-42");
/// assert_eq!(Tag::from("post-42"), tag);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Creates a tag from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the tag name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Mapping from [`Tag`] to the keys currently tagged with it.
#[derive(Debug, Clone)]
pub struct TagIndex<K> {
    tags: HashMap<Tag, HashSet<K>>,
}

impl<K> Default for TagIndex<K> {
    fn default() -> Self {
        Self {
            tags: HashMap::new(),
        }
    }
}

impl<K> TagIndex<K>
where
    K: Hash + Eq + Clone,
{
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `key` carries `tag`.
    pub fn tag(&mut self, key: &K, tag: &Tag) {
        self.tags
            .entry(tag.clone())
            .or_default()
            .insert(key.clone());
    }

    /// Removes `key` from every tag in `tags`, dropping tags left empty.
    ///
    /// `tags` is the entry's own tag set, so this touches only the sets the
    /// key can actually appear in.
    pub fn untag_all<'a>(&mut self, key: &K, tags: impl IntoIterator<Item = &'a Tag>) {
        for tag in tags {
            if let Some(keys) = self.tags.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tags.remove(tag);
                }
            }
        }
    }

    /// Returns a snapshot of the keys tagged with `tag`.
    pub fn keys_for_tag<Q>(&self, tag: &Q) -> HashSet<K>
    where
        Tag: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.tags.get(tag).cloned().unwrap_or_default()
    }

    /// Number of keys tagged with `tag`.
    pub fn count<Q>(&self, tag: &Q) -> usize
    where
        Tag: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.tags.get(tag).map_or(0, HashSet::len)
    }

    /// Returns `true` if `key` is recorded under `tag`.
    pub fn contains<Q>(&self, tag: &Q, key: &K) -> bool
    where
        Tag: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.tags.get(tag).is_some_and(|keys| keys.contains(key))
    }

    /// Number of distinct tags in use.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns `true` if no tag is in use.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates over the tags in use, in no particular order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags.keys()
    }

    /// Drops every association.
    pub fn clear(&mut self) {
        self.tags.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<Tag> {
        names.iter().map(|n| Tag::from(*n)).collect()
    }

    #[test]
    fn tag_and_lookup() {
        let mut index = TagIndex::new();
        index.tag(&"a", &Tag::from("post"));
        index.tag(&"b", &Tag::from("post"));
        index.tag(&"b", &Tag::from("user"));

        let post = index.keys_for_tag("post");
        assert_eq!(post.len(), 2);
        assert!(post.contains(&"a") && post.contains(&"b"));
        assert_eq!(index.count("user"), 1);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn untag_all_drops_empty_tags() {
        let mut index = TagIndex::new();
        let t = tags(&["post", "user"]);
        for tag in &t {
            index.tag(&"a", tag);
        }
        index.tag(&"b", &t[0]);

        index.untag_all(&"a", &t);
        assert!(!index.contains("post", &"a"));
        assert!(index.contains("post", &"b"));
        assert_eq!(index.count("user"), 0);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn unknown_tag_is_empty() {
        let index: TagIndex<&str> = TagIndex::new();
        assert!(index.keys_for_tag("missing").is_empty());
        assert_eq!(index.count("missing"), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn untag_unknown_key_is_noop() {
        let mut index = TagIndex::new();
        index.tag(&"a", &Tag::from("post"));
        index.untag_all(&"zzz", &tags(&["post", "nope"]));
        assert_eq!(index.count("post"), 1);
    }

    #[test]
    fn tag_display_and_serde() {
        let tag = Tag::new("post-42");
        assert_eq!(tag.to_string(), "post-42");
        assert_eq!(serde_json::to_string(&tag).unwrap(), r#""post-42""#);
    }
}
