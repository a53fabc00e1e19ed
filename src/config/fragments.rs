//! `[fragments]` section: where fragment paths are resolved.

use serde::Deserialize;

use super::ConfigDiagnostics;
use crate::fetch::{FetchError, Source};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FragmentsConfig {
    /// Site directory, or an `http(s)://` URL.
    pub base: String,
}

impl Default for FragmentsConfig {
    fn default() -> Self {
        Self {
            base: ".".to_string(),
        }
    }
}

impl FragmentsConfig {
    pub fn source(&self) -> Result<Source, FetchError> {
        Source::from_base(&self.base)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.base.trim().is_empty() {
            diag.error_with_hint(
                "fragments.base",
                "fragment base is empty",
                "use a directory such as \".\" or an http(s) URL",
            );
        } else if let Err(err) = self.source() {
            diag.error("fragments.base", err.to_string());
        }
    }
}
