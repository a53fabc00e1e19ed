//! `[head]` section: how the page head is built and realized.

use clap::ValueEnum;
use serde::Deserialize;

use super::ConfigDiagnostics;
use crate::head::{HeadBuilder, MetaKind, Script, Stylesheet};

/// How `assemble` realizes the head on a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeadMode {
    /// Update the existing head in place.
    #[default]
    Apply,
    /// Swap the existing head for the rendered one.
    Replace,
    /// Leave the head untouched.
    Skip,
}

/// Starting point the configured entries are added to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadPreset {
    /// [`HeadBuilder::site_default`]
    #[default]
    Site,
    None,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeadConfig {
    pub mode: HeadMode,
    pub preset: HeadPreset,
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub author: Option<String>,
    pub viewport: Option<String>,
    pub meta: Vec<MetaEntry>,
    pub stylesheets: Vec<StylesheetEntry>,
    pub scripts: Vec<ScriptEntry>,
    pub inline_styles: Vec<String>,
    pub utility_styles: Vec<String>,
}

impl HeadConfig {
    /// Build the head: the preset first, then every configured entry.
    ///
    /// Scalars override the preset's; collections extend it.
    pub fn builder(&self) -> HeadBuilder {
        let mut head = match self.preset {
            HeadPreset::Site => HeadBuilder::site_default(),
            HeadPreset::None => HeadBuilder::new(),
        };

        if let Some(title) = &self.title {
            head = head.set_title(title);
        }
        if let Some(description) = &self.description {
            head = head.set_description(description);
        }
        if let Some(keywords) = &self.keywords {
            head = head.set_keywords(keywords);
        }
        if let Some(author) = &self.author {
            head = head.set_author(author);
        }
        if let Some(viewport) = &self.viewport {
            head = head.set_viewport(viewport);
        }

        for entry in &self.meta {
            if let Some((key, kind)) = entry.key() {
                head = head.add_meta_with(key, &entry.content, kind);
            }
        }
        for entry in &self.stylesheets {
            head = head.add_stylesheet(entry.to_stylesheet());
        }
        for css in &self.inline_styles {
            head = head.add_inline_style(css);
        }
        for css in &self.utility_styles {
            head = head.add_utility_style(css);
        }
        for entry in &self.scripts {
            head = head.add_script(entry.to_script());
        }

        head
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (i, entry) in self.meta.iter().enumerate() {
            if entry.key().is_none() {
                diag.error_with_hint(
                    format!("head.meta[{i}]"),
                    "meta entry needs exactly one key",
                    "set either `name` or `property`, not both",
                );
            }
        }

        for (i, entry) in self.stylesheets.iter().enumerate() {
            if entry.href().trim().is_empty() {
                diag.error(format!("head.stylesheets[{i}]"), "stylesheet href is empty");
            }
        }

        for (i, entry) in self.scripts.iter().enumerate() {
            if entry.src().trim().is_empty() {
                diag.error(format!("head.scripts[{i}]"), "script src is empty");
            }
        }
    }
}

// ============================================================================
// Entries
// ============================================================================

/// `{ name = "...", content = "..." }` or `{ property = "...", content = "..." }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaEntry {
    pub name: Option<String>,
    pub property: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl MetaEntry {
    /// The entry's key and kind; `None` unless exactly one key is set.
    pub fn key(&self) -> Option<(&str, MetaKind)> {
        match (&self.name, &self.property) {
            (Some(name), None) => Some((name, MetaKind::Name)),
            (None, Some(property)) => Some((property, MetaKind::Property)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StylesheetEntry {
    /// Bare href.
    Simple(String),
    WithOptions {
        href: String,
        #[serde(default = "default_media")]
        media: String,
        #[serde(default)]
        crossorigin: bool,
        #[serde(rename = "as")]
        resource_hint: Option<String>,
    },
}

fn default_media() -> String {
    "all".to_string()
}

impl StylesheetEntry {
    pub fn href(&self) -> &str {
        match self {
            Self::Simple(href) | Self::WithOptions { href, .. } => href,
        }
    }

    pub fn to_stylesheet(&self) -> Stylesheet {
        match self {
            Self::Simple(href) => Stylesheet::new(href),
            Self::WithOptions {
                href,
                media,
                crossorigin,
                resource_hint,
            } => {
                let sheet = Stylesheet::new(href)
                    .with_media(media)
                    .with_crossorigin(*crossorigin);
                match resource_hint {
                    Some(hint) => sheet.with_resource_hint(hint),
                    None => sheet,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScriptEntry {
    /// Bare src.
    Simple(String),
    /// Src with `defer`/`async` attributes.
    WithOptions {
        src: String,
        #[serde(default)]
        defer: bool,
        #[serde(default)]
        r#async: bool,
    },
}

impl ScriptEntry {
    pub fn src(&self) -> &str {
        match self {
            Self::Simple(src) | Self::WithOptions { src, .. } => src,
        }
    }

    pub fn to_script(&self) -> Script {
        match self {
            Self::Simple(src) => Script::new(src),
            Self::WithOptions { src, defer, r#async } => {
                Script::new(src).with_defer(*defer).with_async(*r#async)
            }
        }
    }
}
