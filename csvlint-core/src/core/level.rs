//! Finding severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity of a validation finding.
///
/// Errors make a source invalid, warnings only do so when the caller treats
/// warnings as errors, and info messages never affect validity.
/// Levels are ordered by severity: Error > Warning > Info.
///
/// # Examples
///
/// ```rust
/// use csvlint_core::core::Level;
///
/// assert!(Level::Error > Level::Warning);
/// assert!(Level::Warning > Level::Info);
/// assert_eq!(Level::Warning.to_string(), "warning");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Informational observation
    Info = 0,
    /// Potential problem that does not invalidate the source
    Warning = 1,
    /// Problem that invalidates the source
    Error = 2,
}

impl Level {
    /// Returns the string representation of the level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
