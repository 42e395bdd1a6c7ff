//! Prelude for commonly used types and traits in csvlint-core.

pub use crate::core::{InputHandle, ValidationFinding, ValidationOutcome};
pub use crate::error::{CsvlintError, ErrorContext, Result};
pub use crate::schema::Schema;
pub use crate::validator::{ProgressFn, RowProgress, Validator};
