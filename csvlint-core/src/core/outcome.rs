//! Validation outcome types.

use super::{Level, ValidationFinding};
use std::time::Duration;

/// The result of validating one source.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    /// Whether the source is valid (no errors were found)
    pub valid: bool,
    /// Error-level findings, in discovery order
    pub errors: Vec<ValidationFinding>,
    /// Warning-level findings, in discovery order
    pub warnings: Vec<ValidationFinding>,
    /// Info-level findings, in discovery order
    pub info_messages: Vec<ValidationFinding>,
    /// Time spent validating the source
    pub elapsed: Duration,
}

impl ValidationOutcome {
    /// Builds an outcome by sorting findings into lists by level.
    ///
    /// The outcome is valid when no error-level finding is present.
    pub fn from_findings(
        findings: impl IntoIterator<Item = ValidationFinding>,
        elapsed: Duration,
    ) -> Self {
        let mut outcome = Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            info_messages: Vec::new(),
            elapsed,
        };
        for finding in findings {
            outcome.push(finding);
        }
        outcome
    }

    /// Adds a finding to the list matching its level.
    pub fn push(&mut self, finding: ValidationFinding) {
        match finding.level {
            Level::Error => {
                self.valid = false;
                self.errors.push(finding);
            }
            Level::Warning => self.warnings.push(finding),
            Level::Info => self.info_messages.push(finding),
        }
    }

    /// Returns true if the source is valid.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns true if any warning was produced.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns whether the source passes, optionally treating warnings as errors.
    pub fn passes(&self, warnings_are_errors: bool) -> bool {
        self.valid && !(warnings_are_errors && self.has_warnings())
    }
}
