//! Fragment text cache.
//!
//! Unbounded path → text map with no expiry. Fragments are assumed static
//! for the lifetime of a loader, so entries only leave through explicit
//! removal.

use std::sync::Arc;

use dashmap::DashMap;

/// Cached fragment text keyed by fragment path.
#[derive(Debug, Default)]
pub struct FragmentCache {
    entries: DashMap<String, Arc<str>>,
}

impl FragmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Arc<str>> {
        self.entries.get(path).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Store `content` unless `path` is already cached.
    ///
    /// Returns the text now held for `path`: the first completed fetch wins
    /// when two loads race on the same uncached path.
    pub fn insert(&self, path: &str, content: String) -> Arc<str> {
        let entry = self
            .entries
            .entry(path.to_string())
            .or_insert_with(|| Arc::from(content));
        Arc::clone(entry.value())
    }

    /// Remove one entry. Returns whether it was present.
    pub fn remove(&self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
