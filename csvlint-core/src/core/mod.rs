//! Core data model shared by validators and their callers.
//!
//! - **[`InputHandle`]**: a source of CSV data, consumed once per validation
//! - **[`ValidationFinding`]**: one error, warning or info message with an
//!   optional row/column location
//! - **[`ValidationOutcome`]**: the findings for one source plus its validity
//! - **[`Level`]**, **[`Category`]**, **[`FindingKind`]**: finding classifiers

mod finding;
mod input;
mod level;
mod outcome;

pub use finding::{Category, FindingKind, ValidationFinding};
pub use input::{InputHandle, FALLBACK_DISPLAY_NAME};
pub use level::Level;
pub use outcome::ValidationOutcome;
