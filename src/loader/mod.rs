//! Fragment loading.
//!
//! [`ComponentLoader`] fetches HTML fragments by path, caches their text,
//! and inserts them into a [`Page`] relative to a target element:
//!
//! | Options              | Effect                                    |
//! |----------------------|-------------------------------------------|
//! | default              | fragment becomes the target's last children |
//! | `prepend`            | fragment becomes the target's first children |
//! | `replace`            | target is replaced by the fragment        |
//!
//! `replace` wins when both flags are set. Every load returns an explicit
//! outcome; [`LoadReport::log`] and [`ComponentLoader::load_component_logged`]
//! keep the log-and-continue behavior for callers that want it.

mod cache;
mod report;
#[cfg(test)]
mod tests;

pub use cache::FragmentCache;
pub use report::{Descriptor, LoadReport};

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;

use crate::dom::{DomError, Document, NodeId, Page, Position, SelectorError};
use crate::fetch::{Fetch, FetchError};
use crate::{debug, log};

// ============================================================================
// Targets and options
// ============================================================================

/// Where a fragment goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// First element matching a selector.
    Selector(String),
    /// A specific element.
    Node(NodeId),
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<NodeId> for Target {
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(selector) => f.write_str(selector),
            Self::Node(id) => write!(f, "{id:?}"),
        }
    }
}

/// How fetched markup is attached to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    Append,
    Prepend,
    Replace,
}

/// Per-load options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub replace: bool,
    pub prepend: bool,
}

impl LoadOptions {
    pub const fn replace() -> Self {
        Self {
            replace: true,
            prepend: false,
        }
    }

    pub const fn prepend() -> Self {
        Self {
            replace: false,
            prepend: true,
        }
    }

    /// Resolve the flags into one mode. `replace` takes precedence.
    pub const fn mode(self) -> InsertMode {
        if self.replace {
            InsertMode::Replace
        } else if self.prepend {
            InsertMode::Prepend
        } else {
            InsertMode::Append
        }
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// A fragment that was inserted.
#[derive(Debug, Clone)]
pub struct Inserted {
    pub path: String,
    pub mode: InsertMode,
    /// Top-level nodes created from the fragment.
    pub nodes: Vec<NodeId>,
    /// Whether the text came from the cache instead of a fetch.
    pub cached: bool,
}

/// Why a fragment was not inserted.
// NOTE: causes are formatted into the message instead of exposed via
// source() so logged errors print once.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load component `{path}`: {reason}")]
    Fetch { path: String, reason: FetchError },

    #[error("target element not found: {target} (component `{path}`)")]
    TargetNotFound { path: String, target: String },

    #[error("component `{path}`: {reason}")]
    Selector { path: String, reason: SelectorError },

    #[error("failed to insert component `{path}`: {reason}")]
    Insert { path: String, reason: DomError },
}

impl LoadError {
    /// Fragment path of the failed load.
    pub fn path(&self) -> &str {
        match self {
            Self::Fetch { path, .. }
            | Self::TargetNotFound { path, .. }
            | Self::Selector { path, .. }
            | Self::Insert { path, .. } => path,
        }
    }

    /// HTTP status when the fetch answered with a non-success status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { reason, .. } => reason.status(),
            _ => None,
        }
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Fetches, caches, and inserts HTML fragments.
///
/// The cache is shared by every load issued through this loader. Two loads
/// racing on the same uncached path both fetch; the first to finish fills
/// the cache.
#[derive(Debug)]
pub struct ComponentLoader<F> {
    fetcher: F,
    cache: FragmentCache,
}

impl<F: Fetch> ComponentLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: FragmentCache::new(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn cache(&self) -> &FragmentCache {
        &self.cache
    }

    /// Load `path` and insert it relative to `target`.
    ///
    /// Cached text is reused without fetching. The page is locked only while
    /// inserting.
    pub async fn load_component(
        &self,
        page: &Page,
        path: &str,
        target: impl Into<Target>,
        options: LoadOptions,
    ) -> Result<Inserted, LoadError> {
        let target = target.into();

        let (content, cached) = self.content(path).await?;

        let mut doc = page.lock();
        let nodes = insert(&mut doc, path, &target, &content, options.mode())?;
        drop(doc);

        debug!("load"; "inserted {} into {} ({:?})", path, target, options.mode());
        Ok(Inserted {
            path: path.to_string(),
            mode: options.mode(),
            nodes,
            cached,
        })
    }

    /// [`Self::load_component`] with failures logged instead of returned.
    pub async fn load_component_logged(
        &self,
        page: &Page,
        path: &str,
        target: impl Into<Target>,
        options: LoadOptions,
    ) -> Option<Inserted> {
        match self.load_component(page, path, target, options).await {
            Ok(inserted) => Some(inserted),
            Err(err) => {
                log!("error"; "{}", err);
                None
            }
        }
    }

    /// Start every load at once and wait for all of them to settle.
    ///
    /// Loads interleave on the calling task; there is no ordering between
    /// insertions. Outcomes are reported in descriptor order.
    pub async fn load_components(
        &self,
        page: &Page,
        descriptors: impl IntoIterator<Item = Descriptor>,
    ) -> LoadReport {
        let loads = descriptors.into_iter().map(|descriptor| async move {
            let outcome = self
                .load_component(
                    page,
                    &descriptor.path,
                    descriptor.target.clone(),
                    descriptor.options,
                )
                .await;
            (descriptor, outcome)
        });

        LoadReport::new(join_all(loads).await)
    }

    /// Drop every cached fragment.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Drop one cached fragment; no-op when absent.
    pub fn remove_from_cache(&self, path: &str) {
        self.cache.remove(path);
    }

    /// Cached text or a fresh fetch, with whether it was a cache hit.
    async fn content(&self, path: &str) -> Result<(Arc<str>, bool), LoadError> {
        if let Some(content) = self.cache.get(path) {
            debug!("cache"; "hit {}", path);
            return Ok((content, true));
        }

        let fetched = self
            .fetcher
            .fetch(path)
            .await
            .map_err(|reason| LoadError::Fetch {
                path: path.to_string(),
                reason,
            })?;

        Ok((self.cache.insert(path, fetched), false))
    }
}

/// Resolve `target` and attach `content` to it.
fn insert(
    doc: &mut Document,
    path: &str,
    target: &Target,
    content: &str,
    mode: InsertMode,
) -> Result<Vec<NodeId>, LoadError> {
    let resolved = match target {
        Target::Selector(selector) => {
            doc.query_selector(selector)
                .map_err(|reason| LoadError::Selector {
                    path: path.to_string(),
                    reason,
                })?
        }
        Target::Node(id) => {
            Some(*id).filter(|id| doc.is_attached(*id) && doc.element(*id).is_some())
        }
    };

    let Some(element) = resolved else {
        return Err(LoadError::TargetNotFound {
            path: path.to_string(),
            target: target.to_string(),
        });
    };

    let inserted = match mode {
        InsertMode::Replace => doc.replace_with_html(element, content),
        InsertMode::Prepend => doc.insert_html(element, Position::AfterBegin, content),
        InsertMode::Append => doc.insert_html(element, Position::BeforeEnd, content),
    };

    inserted.map_err(|reason| LoadError::Insert {
        path: path.to_string(),
        reason,
    })
}
