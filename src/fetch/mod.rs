//! Fragment sources.
//!
//! A fragment path is resolved and read through the [`Fetch`] trait:
//!
//! - `http`: GET against a base URL (`reqwest`)
//! - `fs`: read below a site directory (`tokio::fs`)
//! - `memory`: fixed map, counts accesses
//!
//! [`Source`] picks one of these from a configured base string.

mod fs;
mod http;
mod memory;

pub use fs::FsFetcher;
pub use http::HttpFetcher;
pub use memory::MemoryFetcher;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while fetching a fragment.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error when reading `{}`: {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("invalid url `{0}`: {1}")]
    InvalidUrl(String, url::ParseError),
}

impl FetchError {
    /// The HTTP status carried by a non-success response.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(*code),
            _ => None,
        }
    }
}

/// Reads fragment text by path.
///
/// Implementations suspend only while waiting on their backing store and
/// never cache; caching belongs to the loader.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        (**self).fetch(path).await
    }
}

/// A fragment source chosen at runtime.
#[derive(Debug)]
pub enum Source {
    Http(HttpFetcher),
    Fs(FsFetcher),
    Memory(MemoryFetcher),
}

impl Source {
    /// HTTP for `http://` and `https://` bases, the filesystem otherwise.
    pub fn from_base(base: &str) -> Result<Self, FetchError> {
        if base.starts_with("http://") || base.starts_with("https://") {
            HttpFetcher::from_base(base).map(Self::Http)
        } else {
            Ok(Self::Fs(FsFetcher::new(base)))
        }
    }
}

impl Fetch for Source {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        match self {
            Self::Http(fetcher) => fetcher.fetch(path).await,
            Self::Fs(fetcher) => fetcher.fetch(path).await,
            Self::Memory(fetcher) => fetcher.fetch(path).await,
        }
    }
}
