//! The [`Validator`] interface and the built-in [`CsvValidator`].
//!
//! A validator consumes an [`InputHandle`], optionally checks the data
//! against a [`Schema`], and returns a [`ValidationOutcome`]. While rows are
//! processed it reports progress through an optional callback that receives
//! the cumulative error count after each row.
//!
//! # Examples
//!
//! ```rust
//! use csvlint_core::validator::CsvValidator;
//!
//! let validator = CsvValidator::new();
//! let outcome = validator
//!     .validate_bytes(b"id,name\r\n1,Alice\r\n2\r\n", None, None)
//!     .unwrap();
//!
//! assert!(!outcome.is_valid());
//! assert_eq!(outcome.errors[0].kind.as_str(), "ragged_rows");
//! assert_eq!(outcome.errors[0].row, Some(3));
//! ```

use crate::core::{
    Category, FindingKind, InputHandle, Level, ValidationFinding, ValidationOutcome,
};
use crate::prelude::*;
use crate::schema::{anchored_pattern, Schema, TableSchema};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tracing::{debug, instrument};

static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(\d+(\.\d*)?|\.\d+)([eE][-+]?\d+)?$").expect("numeric pattern is valid")
});

/// Progress of a running validation, passed to the progress callback after each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowProgress {
    /// 1-based number of the row just processed
    pub row: u64,
    /// Number of errors found so far, including this row
    pub errors: usize,
}

/// Per-row progress callback.
pub type ProgressFn<'a> = dyn for<'r> FnMut(&'r RowProgress) + Send + 'a;

/// Validates a single source of CSV data.
///
/// Implementations must be deterministic: validating unchanged data with an
/// unchanged schema yields the same findings in the same order.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validates `input`, checking it against `schema` when one applies.
    ///
    /// When `progress` is given it is called once per processed row.
    ///
    /// # Errors
    ///
    /// Returns an error when the input cannot be read at all. Problems with
    /// the data itself are reported as findings in the outcome.
    async fn validate(
        &self,
        input: InputHandle,
        schema: Option<&Schema>,
        progress: Option<&mut ProgressFn<'_>>,
    ) -> Result<ValidationOutcome>;
}

/// Options for the built-in validator.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Whether the first row is a header
    pub has_header: bool,
    /// Field delimiter
    pub delimiter: u8,
    /// Quote character
    pub quote: u8,
    /// Minimum share of non-empty cells in a column that must belong to the
    /// dominant value class before an `inconsistent_values` warning is raised
    pub consistency_threshold: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            quote: b'"',
            consistency_threshold: 0.9,
        }
    }
}

impl ValidatorConfig {
    /// Sets whether the first row is a header.
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Sets the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// The built-in validator: structural checks plus JSON Table Schema constraints.
#[derive(Debug, Clone, Default)]
pub struct CsvValidator {
    config: ValidatorConfig,
}

enum Fetched {
    Body(Vec<u8>),
    Missing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ValueClass {
    Numeric,
    Alphabetic,
    Alphanumeric,
    Other,
}

impl CsvValidator {
    /// Creates a validator with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with the given options.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validates in-memory CSV data.
    pub fn validate_bytes(
        &self,
        bytes: &[u8],
        schema: Option<&TableSchema>,
        progress: Option<&mut ProgressFn<'_>>,
    ) -> Result<ValidationOutcome> {
        let started = Instant::now();
        let findings = self.check(bytes, schema, progress)?;
        Ok(ValidationOutcome::from_findings(findings, started.elapsed()))
    }

    async fn read(&self, input: InputHandle) -> Result<Fetched> {
        match input {
            InputHandle::LocalFile { path, file } => {
                let mut file = tokio::fs::File::from_std(file);
                let mut body = Vec::new();
                file.read_to_end(&mut body)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Ok(Fetched::Body(body))
            }
            InputHandle::RemoteUrl { url } => {
                let response = reqwest::get(&url)
                    .await
                    .map_err(|e| CsvlintError::fetch(&url, e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Ok(Fetched::Missing(status.to_string()));
                }
                let body = response.bytes().await?;
                Ok(Fetched::Body(body.to_vec()))
            }
        }
    }

    fn check(
        &self,
        bytes: &[u8],
        schema: Option<&TableSchema>,
        mut progress: Option<&mut ProgressFn<'_>>,
    ) -> Result<Vec<ValidationFinding>> {
        let mut findings = line_break_findings(bytes);
        let patterns = compile_patterns(schema)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .from_reader(bytes);

        let mut expected_len: Option<usize> = None;
        let mut seen: HashMap<usize, HashSet<String>> = HashMap::new();
        let mut classes: HashMap<usize, HashMap<ValueClass, usize>> = HashMap::new();
        let mut rows = 0u64;
        let mut checked = findings.len();
        let mut errors = findings
            .iter()
            .filter(|f| f.level == Level::Error)
            .count();

        for (index, record) in reader.byte_records().enumerate() {
            let record = record?;
            let row = index as u64 + 1;
            rows = row;

            match decode(&record) {
                None => findings.push(
                    ValidationFinding::error(FindingKind::InvalidEncoding, Category::Structure)
                        .at_row(row),
                ),
                Some(values) if row == 1 && self.config.has_header => {
                    expected_len = Some(values.len());
                    check_header(&values, schema, &mut findings);
                }
                Some(values) => {
                    let expected = *expected_len.get_or_insert(values.len());
                    self.check_row(
                        row,
                        &values,
                        expected,
                        schema,
                        &patterns,
                        &mut seen,
                        &mut classes,
                        &mut findings,
                    );
                }
            }

            errors += findings[checked..]
                .iter()
                .filter(|f| f.level == Level::Error)
                .count();
            checked = findings.len();
            if let Some(callback) = progress.as_deref_mut() {
                callback(&RowProgress { row, errors });
            }
        }

        findings.extend(self.consistency_findings(&classes));
        debug!(rows, findings = findings.len(), "Checked CSV data");
        Ok(findings)
    }

    #[allow(clippy::too_many_arguments)]
    fn check_row(
        &self,
        row: u64,
        values: &[String],
        expected_len: usize,
        schema: Option<&TableSchema>,
        patterns: &[Option<Regex>],
        seen: &mut HashMap<usize, HashSet<String>>,
        classes: &mut HashMap<usize, HashMap<ValueClass, usize>>,
        findings: &mut Vec<ValidationFinding>,
    ) {
        if values.iter().all(|v| v.is_empty()) {
            findings.push(
                ValidationFinding::error(FindingKind::BlankRows, Category::Structure).at_row(row),
            );
            return;
        }

        if values.len() != expected_len {
            findings.push(
                ValidationFinding::error(FindingKind::RaggedRows, Category::Structure)
                    .at_row(row)
                    .with_content(values.join(",")),
            );
        }

        for (i, value) in values.iter().enumerate() {
            let column = i as u64 + 1;
            if value.trim() != value {
                findings.push(
                    ValidationFinding::error(FindingKind::Whitespace, Category::Structure)
                        .at_row(row)
                        .at_column(column),
                );
            }
            if !value.is_empty() {
                *classes
                    .entry(i)
                    .or_default()
                    .entry(classify(value))
                    .or_default() += 1;
            }

            let Some(field) = schema.and_then(|s| s.field_for_column(column)) else {
                continue;
            };
            let schema_error = |kind: FindingKind| {
                ValidationFinding::error(kind, Category::Schema)
                    .at_row(row)
                    .at_column(column)
            };

            if value.is_empty() {
                if field.required() {
                    findings.push(schema_error(FindingKind::MissingValue));
                }
                continue;
            }

            let length = value.chars().count() as u64;
            if field.min_length().is_some_and(|min| length < min) {
                findings.push(schema_error(FindingKind::MinLength).with_content(value.as_str()));
            }
            if field.max_length().is_some_and(|max| length > max) {
                findings.push(schema_error(FindingKind::MaxLength).with_content(value.as_str()));
            }
            if let Some(Some(pattern)) = patterns.get(i) {
                if !pattern.is_match(value) {
                    findings.push(schema_error(FindingKind::Pattern).with_content(value.as_str()));
                }
            }
            if let Ok(number) = value.trim().parse::<f64>() {
                if field.minimum().is_some_and(|min| number < min) {
                    findings.push(
                        schema_error(FindingKind::BelowMinimum).with_content(value.as_str()),
                    );
                }
                if field.maximum().is_some_and(|max| number > max) {
                    findings.push(
                        schema_error(FindingKind::AboveMaximum).with_content(value.as_str()),
                    );
                }
            }
            if field.unique() && !seen.entry(i).or_default().insert(value.clone()) {
                findings.push(schema_error(FindingKind::Unique).with_content(value.as_str()));
            }
        }
    }

    fn consistency_findings(
        &self,
        classes: &HashMap<usize, HashMap<ValueClass, usize>>,
    ) -> Vec<ValidationFinding> {
        let mut columns: Vec<_> = classes.keys().copied().collect();
        columns.sort_unstable();

        columns
            .into_iter()
            .filter(|column| {
                let counts = &classes[column];
                let total: usize = counts.values().sum();
                let dominant = counts.values().copied().max().unwrap_or(0);
                total > 0 && (dominant as f64 / total as f64) < self.config.consistency_threshold
            })
            .map(|column| {
                ValidationFinding::warning(FindingKind::InconsistentValues, Category::Schema)
                    .at_column(column as u64 + 1)
            })
            .collect()
    }
}

#[async_trait]
impl Validator for CsvValidator {
    #[instrument(skip_all, fields(source = %input.display_name()))]
    async fn validate(
        &self,
        input: InputHandle,
        schema: Option<&Schema>,
        progress: Option<&mut ProgressFn<'_>>,
    ) -> Result<ValidationOutcome> {
        let started = Instant::now();
        let location = input.location();
        let table_schema = schema.and_then(|s| s.table_schema_for(&location));

        let bytes = match self.read(input).await? {
            Fetched::Body(bytes) => bytes,
            Fetched::Missing(status) => {
                debug!(%status, "Remote source not available");
                let finding = ValidationFinding::error(FindingKind::NotFound, Category::Structure)
                    .with_content(status);
                return Ok(ValidationOutcome::from_findings(
                    vec![finding],
                    started.elapsed(),
                ));
            }
        };

        let findings = self.check(&bytes, table_schema, progress)?;
        let outcome = ValidationOutcome::from_findings(findings, started.elapsed());
        debug!(
            valid = outcome.valid,
            errors = outcome.errors.len(),
            warnings = outcome.warnings.len(),
            "Validated source"
        );
        Ok(outcome)
    }
}

fn decode(record: &csv::ByteRecord) -> Option<Vec<String>> {
    record
        .iter()
        .map(|field| std::str::from_utf8(field).ok().map(str::to_string))
        .collect()
}

fn check_header(
    names: &[String],
    schema: Option<&TableSchema>,
    findings: &mut Vec<ValidationFinding>,
) {
    let mut seen = HashSet::new();
    for (i, name) in names.iter().enumerate() {
        let column = i as u64 + 1;
        if name.trim().is_empty() {
            findings.push(
                ValidationFinding::error(FindingKind::EmptyColumnName, Category::Schema)
                    .at_row(1)
                    .at_column(column),
            );
        } else if !seen.insert(name.as_str()) {
            findings.push(
                ValidationFinding::error(FindingKind::DuplicateColumnName, Category::Schema)
                    .at_row(1)
                    .at_column(column)
                    .with_content(name.as_str()),
            );
        }
    }

    if let Some(schema) = schema.filter(|s| !s.fields.is_empty()) {
        let expected = schema.fields.iter().map(|f| f.name.as_str());
        if !expected.eq(names.iter().map(String::as_str)) {
            findings.push(
                ValidationFinding::warning(FindingKind::MalformedHeader, Category::Schema)
                    .at_row(1)
                    .with_content(names.join(",")),
            );
        }
    }
}

fn compile_patterns(schema: Option<&TableSchema>) -> Result<Vec<Option<Regex>>> {
    let Some(schema) = schema else {
        return Ok(Vec::new());
    };

    schema
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            field
                .pattern()
                .map(|pattern| {
                    anchored_pattern(pattern).map_err(|e| {
                        CsvlintError::metadata_at(
                            format!("invalid pattern: {e}"),
                            format!("$.fields[{i}].constraints.pattern"),
                        )
                    })
                })
                .transpose()
        })
        .collect()
}

fn line_break_findings(bytes: &[u8]) -> Vec<ValidationFinding> {
    let mut crlf = 0usize;
    let mut lf = 0usize;
    for (i, byte) in bytes.iter().enumerate() {
        if *byte == b'\n' {
            if i > 0 && bytes[i - 1] == b'\r' {
                crlf += 1;
            } else {
                lf += 1;
            }
        }
    }

    if crlf > 0 && lf > 0 {
        vec![ValidationFinding::error(
            FindingKind::LineBreaks,
            Category::Structure,
        )]
    } else if lf > 0 {
        vec![ValidationFinding::info(
            FindingKind::NonrfcLineBreaks,
            Category::Structure,
        )]
    } else {
        Vec::new()
    }
}

fn classify(value: &str) -> ValueClass {
    let value = value.trim();
    if NUMERIC.is_match(value) {
        ValueClass::Numeric
    } else if value.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
        ValueClass::Alphabetic
    } else if value.chars().all(|c| c.is_alphanumeric() || c.is_whitespace()) {
        ValueClass::Alphanumeric
    } else {
        ValueClass::Other
    }
}
