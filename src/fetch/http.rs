//! HTTP fragment source.

use url::Url;

use super::{Fetch, FetchError};
use crate::debug;

/// Fetches fragments with GET requests relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(base: Url) -> Self {
        Self::with_client(reqwest::Client::new(), base)
    }

    /// Reuse an existing client (connection pool, proxy settings).
    pub fn with_client(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    /// Parse `base` as a URL. A trailing `/` is added so relative fragment
    /// paths resolve inside it rather than next to it.
    pub fn from_base(base: &str) -> Result<Self, FetchError> {
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let url = Url::parse(&normalized)
            .map_err(|err| FetchError::InvalidUrl(base.to_string(), err))?;
        Ok(Self::new(url))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for a fragment path.
    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.base
            .join(path)
            .map_err(|err| FetchError::InvalidUrl(path.to_string(), err))
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.resolve(path)?;
        debug!("fetch"; "GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
