//! `<head>` assembly.
//!
//! [`HeadBuilder`] accumulates metadata, stylesheets, styles, and scripts
//! through chained calls, then realizes them one of three ways:
//!
//! - `render`: serialize to a `<head>...</head>` string
//! - `apply`: update an existing document head in place
//! - `replace`: swap the document head for the rendered markup
//!
//! # Example
//!
//! ```ignore
//! let head = HeadBuilder::new()
//!     .set_title("Docs")
//!     .add_stylesheet("/style.css")
//!     .add_script(Script::new("/app.js").with_defer(true));
//! let markup = head.render();
//! ```

mod apply;
mod defaults;
mod render;

use thiserror::Error;

use crate::dom::DomError;

/// Viewport used until [`HeadBuilder::set_viewport`] overrides it.
pub const DEFAULT_VIEWPORT: &str = "width=device-width, initial-scale=1.0";

/// Errors raised when realizing a head configuration on a document.
#[derive(Debug, Error)]
pub enum HeadError {
    #[error("document has no <head> element")]
    MissingHead,

    #[error(transparent)]
    Dom(#[from] DomError),
}

// ============================================================================
// Entries
// ============================================================================

/// Which attribute carries a meta tag's key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetaKind {
    /// `<meta name="...">`
    #[default]
    Name,
    /// `<meta property="...">` (Open Graph)
    Property,
}

impl MetaKind {
    pub const fn attr(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Property => "property",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub key: String,
    pub content: String,
    pub kind: MetaKind,
}

/// A `<link rel="stylesheet">` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub href: String,
    pub media: String,
    pub crossorigin: bool,
    /// Value of the `as` attribute.
    pub resource_hint: Option<String>,
}

impl Stylesheet {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            media: "all".to_string(),
            crossorigin: false,
            resource_hint: None,
        }
    }

    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = media.into();
        self
    }

    pub fn with_crossorigin(mut self, crossorigin: bool) -> Self {
        self.crossorigin = crossorigin;
        self
    }

    pub fn with_resource_hint(mut self, hint: impl Into<String>) -> Self {
        self.resource_hint = Some(hint.into());
        self
    }
}

impl From<&str> for Stylesheet {
    fn from(href: &str) -> Self {
        Self::new(href)
    }
}

/// A `<script src>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub src: String,
    pub defer: bool,
    pub is_async: bool,
}

impl Script {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            defer: false,
            is_async: false,
        }
    }

    pub fn with_defer(mut self, defer: bool) -> Self {
        self.defer = defer;
        self
    }

    pub fn with_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }
}

impl From<&str> for Script {
    fn from(src: &str) -> Self {
        Self::new(src)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulated `<head>` contents.
///
/// Collections keep insertion order; scalar setters overwrite. Realizing
/// the configuration never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadBuilder {
    meta_tags: Vec<MetaTag>,
    stylesheets: Vec<Stylesheet>,
    scripts: Vec<Script>,
    inline_styles: Vec<String>,
    utility_styles: Vec<String>,
    title: String,
    description: String,
    keywords: String,
    author: String,
    viewport: String,
}

impl Default for HeadBuilder {
    fn default() -> Self {
        Self {
            meta_tags: Vec::new(),
            stylesheets: Vec::new(),
            scripts: Vec::new(),
            inline_styles: Vec::new(),
            utility_styles: Vec::new(),
            title: String::new(),
            description: String::new(),
            keywords: String::new(),
            author: String::new(),
            viewport: DEFAULT_VIEWPORT.to_string(),
        }
    }
}

impl HeadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------------

    /// Add `<meta name="key" content="...">`.
    pub fn add_meta(self, key: impl Into<String>, content: impl Into<String>) -> Self {
        self.add_meta_with(key, content, MetaKind::Name)
    }

    pub fn add_meta_with(
        mut self,
        key: impl Into<String>,
        content: impl Into<String>,
        kind: MetaKind,
    ) -> Self {
        self.meta_tags.push(MetaTag {
            key: key.into(),
            content: content.into(),
            kind,
        });
        self
    }

    /// Add an Open Graph `<meta property>`.
    pub fn add_open_graph(self, property: impl Into<String>, content: impl Into<String>) -> Self {
        self.add_meta_with(property, content, MetaKind::Property)
    }

    /// Add a Twitter card `<meta name>`.
    pub fn add_twitter_card(self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.add_meta_with(name, content, MetaKind::Name)
    }

    pub fn add_stylesheet(mut self, stylesheet: impl Into<Stylesheet>) -> Self {
        self.stylesheets.push(stylesheet.into());
        self
    }

    /// Add raw CSS; all inline styles share one `<style>` block.
    pub fn add_inline_style(mut self, css: impl Into<String>) -> Self {
        self.inline_styles.push(css.into());
        self
    }

    /// Add raw CSS for the Tailwind browser processor.
    ///
    /// Each entry gets its own `<style type="text/tailwindcss">` block.
    pub fn add_utility_style(mut self, css: impl Into<String>) -> Self {
        self.utility_styles.push(css.into());
        self
    }

    pub fn add_script(mut self, script: impl Into<Script>) -> Self {
        self.scripts.push(script.into());
        self
    }

    // ------------------------------------------------------------------------
    // Scalars
    // ------------------------------------------------------------------------

    pub fn set_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn set_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn set_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    pub fn set_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn set_viewport(mut self, viewport: impl Into<String>) -> Self {
        self.viewport = viewport.into();
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn meta_tags(&self) -> &[MetaTag] {
        &self.meta_tags
    }

    pub fn stylesheets(&self) -> &[Stylesheet] {
        &self.stylesheets
    }

    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    pub fn inline_styles(&self) -> &[String] {
        &self.inline_styles
    }

    pub fn utility_styles(&self) -> &[String] {
        &self.utility_styles
    }

    /// Title, if set to a non-empty value.
    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(&self.description)
    }

    pub fn keywords(&self) -> Option<&str> {
        non_empty(&self.keywords)
    }

    pub fn author(&self) -> Option<&str> {
        non_empty(&self.author)
    }

    pub fn viewport(&self) -> &str {
        &self.viewport
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}
