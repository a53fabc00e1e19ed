//! Project configuration from `pagekit.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                            |
//! |---------------|----------------------------------------------------|
//! | `[fragments]` | Where fragment paths resolve (directory or URL)    |
//! | `[head]`      | Head preset, extra entries, and realization mode   |
//!
//! A missing file is not an error: every section has defaults.

mod error;
mod fragments;
mod head;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use fragments::FragmentsConfig;
pub use head::{HeadConfig, HeadMode, HeadPreset, MetaEntry, ScriptEntry, StylesheetEntry};

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{debug, log};

/// Default config file name.
pub const CONFIG_FILE: &str = "pagekit.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `pagekit.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageConfig {
    /// Path the config was read from (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub fragments: FragmentsConfig,

    #[serde(default)]
    pub head: HeadConfig,
}

impl PageConfig {
    /// Load and validate the config at `path`, or defaults if it is absent.
    ///
    /// A relative filesystem `fragments.base` is resolved against the
    /// directory holding the config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("config"; "{} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let (mut config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        if let Some(root) = path.parent() {
            config.resolve_base(root);
        }
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string without validating it.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    fn resolve_base(&mut self, root: &Path) {
        let base = &self.fragments.base;
        if base.is_empty() || base.starts_with("http://") || base.starts_with("https://") {
            return;
        }
        if Path::new(base).is_relative() && !root.as_os_str().is_empty() {
            self.fragments.base = root.join(base).to_string_lossy().into_owned();
        }
    }

    /// Validate every section, collecting all failures at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.fragments.validate(&mut diag);
        self.head.validate(&mut diag);
        diag.into_result()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PageConfig {
    let (parsed, ignored) = PageConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_str_invalid_toml() {
        let result = PageConfig::from_str("[fragments\nbase = \"x\"");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[fragments]\nbase = \"site\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = PageConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.fragments.base, "site");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PageConfig::load(&dir.path().join(CONFIG_FILE)).unwrap();

        assert!(config.config_path.is_none());
        assert_eq!(config.fragments.base, ".");
        assert_eq!(config.head.mode, HeadMode::Apply);
        assert_eq!(config.head.preset, HeadPreset::Site);
    }

    #[test]
    fn test_load_resolves_relative_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[fragments]\nbase = \"components\"\n").unwrap();

        let config = PageConfig::load(&path).unwrap();

        assert_eq!(
            PathBuf::from(&config.fragments.base),
            dir.path().join("components")
        );
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_keeps_url_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[fragments]\nbase = \"https://example.com/parts\"\n").unwrap();

        let config = PageConfig::load(&path).unwrap();
        assert_eq!(config.fragments.base, "https://example.com/parts");
    }

    #[test]
    fn test_load_reports_all_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[fragments]\nbase = \"\"\n[head]\nscripts = [\"\"]\n",
        )
        .unwrap();

        match PageConfig::load(&path) {
            Err(ConfigError::Validation(diag)) => assert_eq!(diag.len(), 2),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
