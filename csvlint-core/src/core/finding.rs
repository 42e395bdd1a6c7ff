//! Validation findings produced by a [`Validator`](super::Validator).

use super::Level;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The type of a finding, serialized with its csvlint name (`ragged_rows`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    // structure
    RaggedRows,
    BlankRows,
    InvalidEncoding,
    LineBreaks,
    NonrfcLineBreaks,
    Whitespace,
    NotFound,
    // header
    EmptyColumnName,
    DuplicateColumnName,
    // content
    InconsistentValues,
    // schema
    MalformedHeader,
    MissingValue,
    Unique,
    MinLength,
    MaxLength,
    Pattern,
    BelowMinimum,
    AboveMaximum,
}

impl FindingKind {
    /// Returns the csvlint name of the finding type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::RaggedRows => "ragged_rows",
            FindingKind::BlankRows => "blank_rows",
            FindingKind::InvalidEncoding => "invalid_encoding",
            FindingKind::LineBreaks => "line_breaks",
            FindingKind::NonrfcLineBreaks => "nonrfc_line_breaks",
            FindingKind::Whitespace => "whitespace",
            FindingKind::NotFound => "not_found",
            FindingKind::EmptyColumnName => "empty_column_name",
            FindingKind::DuplicateColumnName => "duplicate_column_name",
            FindingKind::InconsistentValues => "inconsistent_values",
            FindingKind::MalformedHeader => "malformed_header",
            FindingKind::MissingValue => "missing_value",
            FindingKind::Unique => "unique",
            FindingKind::MinLength => "min_length",
            FindingKind::MaxLength => "max_length",
            FindingKind::Pattern => "pattern",
            FindingKind::BelowMinimum => "below_minimum",
            FindingKind::AboveMaximum => "above_maximum",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The broad area a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// CSV syntax and layout problems
    Structure,
    /// Problems found while checking the data against a schema or its header
    Schema,
}

impl Category {
    /// Returns the string representation of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Structure => "structure",
            Category::Schema => "schema",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single error, warning or info message about a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFinding {
    /// The finding type
    pub kind: FindingKind,
    /// The severity of the finding
    pub level: Level,
    /// The area the finding belongs to
    pub category: Category,
    /// 1-based row number, when the finding is tied to a row
    pub row: Option<u64>,
    /// 1-based column number, when the finding is tied to a column
    pub column: Option<u64>,
    /// Offending content or extra detail
    pub content: Option<String>,
}

impl ValidationFinding {
    /// Creates a finding without location or content.
    pub fn new(kind: FindingKind, level: Level, category: Category) -> Self {
        Self {
            kind,
            level,
            category,
            row: None,
            column: None,
            content: None,
        }
    }

    /// Creates an error-level finding.
    pub fn error(kind: FindingKind, category: Category) -> Self {
        Self::new(kind, Level::Error, category)
    }

    /// Creates a warning-level finding.
    pub fn warning(kind: FindingKind, category: Category) -> Self {
        Self::new(kind, Level::Warning, category)
    }

    /// Creates an info-level finding.
    pub fn info(kind: FindingKind, category: Category) -> Self {
        Self::new(kind, Level::Info, category)
    }

    /// Sets the 1-based row number.
    pub fn at_row(mut self, row: u64) -> Self {
        self.row = Some(row);
        self
    }

    /// Sets the 1-based column number.
    pub fn at_column(mut self, column: u64) -> Self {
        self.column = Some(column);
        self
    }

    /// Sets the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_serde() {
        for kind in [
            FindingKind::RaggedRows,
            FindingKind::NonrfcLineBreaks,
            FindingKind::DuplicateColumnName,
            FindingKind::MissingValue,
            FindingKind::AboveMaximum,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_finding_builder() {
        let finding = ValidationFinding::error(FindingKind::RaggedRows, Category::Structure)
            .at_row(3)
            .with_content("1,2,3,4");

        assert_eq!(finding.level, Level::Error);
        assert_eq!(finding.row, Some(3));
        assert_eq!(finding.column, None);
        assert_eq!(finding.content.as_deref(), Some("1,2,3,4"));
    }
}
