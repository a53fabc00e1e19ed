//! In-memory fragment source.

use std::collections::HashMap;

use dashmap::DashMap;

use super::{Fetch, FetchError};

/// Serves fragments from a fixed map and counts every fetch per path.
///
/// Unknown paths answer with status 404. Each fetch suspends once before
/// answering, so concurrent loads interleave the way network fetches do.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    fragments: HashMap<String, String>,
    fetches: DashMap<String, usize>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment (builder form).
    pub fn with(mut self, path: impl Into<String>, markup: impl Into<String>) -> Self {
        self.insert(path, markup);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, markup: impl Into<String>) {
        self.fragments.insert(path.into(), markup.into());
    }

    /// Number of fetches issued for `path`, found or not.
    pub fn fetch_count(&self, path: &str) -> usize {
        self.fetches.get(path).map_or(0, |count| *count)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.iter().map(|entry| *entry.value()).sum()
    }
}

impl Fetch for MemoryFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        *self.fetches.entry(path.to_string()).or_insert(0) += 1;
        tokio::task::yield_now().await;

        self.fragments
            .get(path)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_hits_and_misses() {
        let fetcher = MemoryFetcher::new().with("/a.html", "a");

        assert_eq!(fetcher.fetch("/a.html").await.unwrap(), "a");
        assert_eq!(fetcher.fetch("/a.html").await.unwrap(), "a");
        assert!(fetcher.fetch("/b.html").await.is_err());

        assert_eq!(fetcher.fetch_count("/a.html"), 2);
        assert_eq!(fetcher.fetch_count("/b.html"), 1);
        assert_eq!(fetcher.fetch_count("/c.html"), 0);
        assert_eq!(fetcher.total_fetches(), 3);
    }
}
