//! Route parameters.
//!
//! [`RouteParams`] is the ordered `key → value` map that flows through a
//! navigation: raw captures produced by the route matcher, the decoded
//! parameter blob produced by [`ParseParameters`](crate::ParseParameters),
//! and the parameters handed to a [`PageController`](crate::PageController).
//!
//! Keys are kept in lexicographic order so that anything derived from the
//! map (most importantly the encoded URL segment, see [`codec`](crate::codec))
//! is deterministic.
//!
//! # Example
//!
//! ```
//! use page_navigator::RouteParams;
//!
//! let mut params = RouteParams::new();
//! params.set("query", "tag:red");
//! params.set("page", "3");
//!
//! assert_eq!(params.get_as::<u32>("page"), Some(3));
//! assert_eq!(params.keys().collect::<Vec<_>>(), vec!["page", "query"]);
//! ```

use std::collections::BTreeMap;

/// Ordered parameter map with typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    params: BTreeMap<String, String>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an existing map.
    pub fn from_map(params: BTreeMap<String, String>) -> Self {
        Self { params }
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Get a parameter and parse it as a specific type
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.parse().ok()
    }

    /// Insert or overwrite a parameter.
    pub fn insert(&mut self, key: String, value: String) {
        self.params.insert(key, value);
    }

    /// Set a parameter from anything string-like.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Remove a parameter, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Get a reference to the underlying map.
    pub fn all(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Iterate over all `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Merge two parameter sets; values from `overrides` win on collision.
    ///
    /// Used when a feature controller builds the URL of another page from the
    /// current parameters plus a changed value.
    ///
    /// ```
    /// use page_navigator::RouteParams;
    ///
    /// let current = RouteParams::new().with("query", "red").with("page", "1");
    /// let next = RouteParams::merge(&current, &RouteParams::new().with("page", "2"));
    ///
    /// assert_eq!(next.get("query"), Some("red"));
    /// assert_eq!(next.get("page"), Some("2"));
    /// ```
    pub fn merge(base: &RouteParams, overrides: &RouteParams) -> RouteParams {
        let mut merged = base.clone();
        for (key, value) in overrides.iter() {
            merged.set(key, value);
        }
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RouteParams {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
