//! Filesystem fragment source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Fetch, FetchError};
use crate::debug;

/// Reads fragments below a site directory.
///
/// Paths are resolved the way a static file server would: a leading `/`
/// refers to the root, and a missing file answers like a 404.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path for a fragment path.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl Fetch for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let file = self.resolve(path);
        debug!("fetch"; "read {}", file.display());

        match tokio::fs::read_to_string(&file).await {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(FetchError::Status(404)),
            Err(err) => Err(FetchError::Io(file, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_strips_leading_slash() {
        let fetcher = FsFetcher::new("/site");
        assert_eq!(
            fetcher.resolve("/components/nav.html"),
            PathBuf::from("/site/components/nav.html")
        );
        assert_eq!(
            fetcher.resolve("nav.html"),
            PathBuf::from("/site/nav.html")
        );
    }

    #[tokio::test]
    async fn test_reads_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("components")).unwrap();
        fs::write(dir.path().join("components/nav.html"), "<nav></nav>").unwrap();

        let fetcher = FsFetcher::new(dir.path());
        let content = fetcher.fetch("/components/nav.html").await.unwrap();
        assert_eq!(content, "<nav></nav>");
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let dir = TempDir::new().unwrap();
        let fetcher = FsFetcher::new(dir.path());
        let err = fetcher.fetch("missing.html").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("folder")).unwrap();
        let fetcher = FsFetcher::new(dir.path());
        assert!(matches!(
            fetcher.fetch("folder").await,
            Err(FetchError::Io(..))
        ));
    }
}
