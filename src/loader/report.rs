//! Batch load descriptors and outcomes.

use super::{Inserted, LoadError, LoadOptions, Target};
use crate::{debug, log};

/// One entry of a batch load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub path: String,
    pub target: Target,
    pub options: LoadOptions,
}

impl Descriptor {
    pub fn new(path: impl Into<String>, target: impl Into<Target>) -> Self {
        Self {
            path: path.into(),
            target: target.into(),
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }
}

/// Outcomes of a batch load, in descriptor order.
#[derive(Debug, Default)]
pub struct LoadReport {
    outcomes: Vec<(Descriptor, Result<Inserted, LoadError>)>,
}

impl LoadReport {
    pub fn new(outcomes: Vec<(Descriptor, Result<Inserted, LoadError>)>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[(Descriptor, Result<Inserted, LoadError>)] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// True when every load inserted its fragment.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &LoadError> {
        self.outcomes.iter().filter_map(|(_, r)| r.as_ref().err())
    }

    /// Log every failure; successes are only shown with `--verbose`.
    pub fn log(&self) {
        for err in self.errors() {
            log!("error"; "{}", err);
        }
        debug!("load"; "{} of {} components inserted", self.succeeded(), self.len());
    }

    pub fn into_outcomes(self) -> Vec<(Descriptor, Result<Inserted, LoadError>)> {
        self.outcomes
    }
}
