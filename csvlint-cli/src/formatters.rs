//! Rendering of per-source validation outcomes.
//!
//! Three formatters are provided:
//! - [`TextFormatter`] prints a VALID/INVALID header followed by numbered
//!   error and warning lines, colorized when writing to a terminal
//! - [`JsonFormatter`] prints one compact JSON document per source
//! - [`JUnitFormatter`] prints one `<testsuite>` per source; the caller wraps
//!   all suites in [`JUnitFormatter::envelope_open`] and
//!   [`JUnitFormatter::envelope_close`]
//!
//! # Examples
//!
//! ```rust
//! use csvlint_cli::formatters::{ResultFormatter, SourceReport, TextFormatter};
//! use csvlint_core::core::ValidationOutcome;
//! use std::time::Duration;
//!
//! let outcome = ValidationOutcome::from_findings(Vec::new(), Duration::ZERO);
//! let report = SourceReport::new("data.csv", &outcome);
//! let output = TextFormatter::new().format(&report).unwrap();
//! assert_eq!(output, "\ndata.csv is VALID\n");
//! ```

use crate::error::Result;
use csvlint_core::core::{Category, FindingKind, ValidationFinding, ValidationOutcome};
use csvlint_core::schema::{Field, TableSchema};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Write;

/// ANSI green, used for valid results.
pub const GREEN: &str = "\x1b[32m";
/// ANSI red, used for invalid results and errors.
pub const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Wraps `text` in an ANSI color when `enabled`.
pub fn paint(text: &str, color: &str, enabled: bool) -> String {
    if enabled {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Configuration options for formatting validation results.
#[derive(Debug, Clone, Default)]
pub struct FormatterConfig {
    /// Whether to use colorized output (text formatter only)
    pub use_colors: bool,
    /// Whether to pretty-print each finding after its report line
    pub dump_findings: bool,
}

impl FormatterConfig {
    /// Creates a configuration for an interactive terminal.
    pub fn terminal() -> Self {
        Self {
            use_colors: true,
            dump_findings: false,
        }
    }

    /// Sets whether to use colorized output.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Sets whether findings are dumped after their report line.
    pub fn with_dump_findings(mut self, dump_findings: bool) -> Self {
        self.dump_findings = dump_findings;
        self
    }
}

/// The outcome of one source, ready for formatting.
#[derive(Debug, Clone, Copy)]
pub struct SourceReport<'a> {
    /// Display name of the source
    pub name: &'a str,
    /// What the validator found
    pub outcome: &'a ValidationOutcome,
    /// The table schema the source was checked against, if any
    pub schema: Option<&'a TableSchema>,
}

impl<'a> SourceReport<'a> {
    /// Creates a report without schema information.
    pub fn new(name: &'a str, outcome: &'a ValidationOutcome) -> Self {
        Self {
            name,
            outcome,
            schema: None,
        }
    }

    /// Attaches the table schema used for field names.
    pub fn with_schema(mut self, schema: Option<&'a TableSchema>) -> Self {
        self.schema = schema;
        self
    }

    /// Returns the schema field for the finding's column, if both exist.
    pub fn field_for(&self, finding: &ValidationFinding) -> Option<&'a Field> {
        let column = finding.column?;
        self.schema?.field_for_column(column)
    }
}

/// Formats the outcome of one source.
pub trait ResultFormatter: Send + Sync {
    /// Formats a report into its string representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be serialized.
    fn format(&self, report: &SourceReport<'_>) -> Result<String>;
}

/// Human-readable output.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    config: FormatterConfig,
}

impl TextFormatter {
    /// Creates a text formatter without colors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a text formatter with the specified configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    fn finding_line(
        &self,
        index: usize,
        finding: &ValidationFinding,
        report: &SourceReport<'_>,
    ) -> Result<String> {
        let mut line = String::new();
        write!(line, "{}. ", index + 1)?;
        if let Some(field) = report.field_for(finding) {
            write!(line, "{}: ", field.name)?;
        }
        line.push_str(finding.kind.as_str());

        match (finding.row, finding.column) {
            (Some(row), Some(column)) => write!(line, ". Row: {row},{column}")?,
            (Some(row), None) => write!(line, ". Row: {row}")?,
            (None, Some(column)) => write!(line, ". Column: {column}")?,
            (None, None) => {}
        }

        if let Some(content) = &finding.content {
            write!(line, ". {content}")?;
        }
        Ok(line)
    }
}

impl ResultFormatter for TextFormatter {
    fn format(&self, report: &SourceReport<'_>) -> Result<String> {
        let colors = self.config.use_colors;
        let mut output = String::new();

        let state = if report.outcome.valid {
            paint("VALID", GREEN, colors)
        } else {
            paint("INVALID", RED, colors)
        };
        writeln!(output)?;
        writeln!(output, "{} is {state}", report.name)?;

        for findings in [&report.outcome.errors, &report.outcome.warnings] {
            for (index, finding) in findings.iter().enumerate() {
                let line = self.finding_line(index, finding, report)?;
                writeln!(output, "{}", paint(&line, RED, colors))?;
                if self.config.dump_findings {
                    writeln!(output, "{finding:#?}")?;
                }
            }
        }

        Ok(output)
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    validation: JsonValidation<'a>,
}

#[derive(Serialize)]
struct JsonValidation<'a> {
    state: &'static str,
    errors: Vec<JsonFinding<'a>>,
    warnings: Vec<JsonFinding<'a>>,
    info: Vec<JsonFinding<'a>>,
}

#[derive(Serialize)]
struct JsonFinding<'a> {
    #[serde(rename = "type")]
    kind: FindingKind,
    category: Category,
    row: Option<u64>,
    col: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    constraints: Option<Map<String, Value>>,
}

impl<'a> JsonFinding<'a> {
    fn new(finding: &ValidationFinding, report: &SourceReport<'a>) -> Self {
        let field = report.field_for(finding);
        Self {
            kind: finding.kind,
            category: finding.category,
            row: finding.row,
            col: finding.column,
            header: field.map(|f| f.name.as_str()),
            constraints: field.map(|f| {
                f.constraints
                    .iter()
                    .map(|(key, value)| (underscore(key), value.clone()))
                    .collect()
            }),
        }
    }
}

/// Machine-readable JSON output, one compact document per source.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Creates a JSON formatter.
    pub fn new() -> Self {
        Self
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, report: &SourceReport<'_>) -> Result<String> {
        let convert = |findings: &[ValidationFinding]| {
            findings
                .iter()
                .map(|f| JsonFinding::new(f, report))
                .collect::<Vec<_>>()
        };
        let outcome = report.outcome;
        let document = JsonDocument {
            validation: JsonValidation {
                state: if outcome.valid { "valid" } else { "invalid" },
                errors: convert(&outcome.errors),
                warnings: convert(&outcome.warnings),
                info: convert(&outcome.info_messages),
            },
        };

        Ok(serde_json::to_string(&document)?)
    }
}

/// Name of the JUnit `<testsuites>` envelope.
pub const JUNIT_SUITES_NAME: &str = "csvlint";

/// JUnit XML output, one `<testsuite>` per source.
#[derive(Debug, Clone, Default)]
pub struct JUnitFormatter;

impl JUnitFormatter {
    /// Creates a JUnit formatter.
    pub fn new() -> Self {
        Self
    }

    /// The XML declaration and opening `<testsuites>` tag.
    pub fn envelope_open() -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuites name=\"{JUNIT_SUITES_NAME}\">\n"
        )
    }

    /// The closing `</testsuites>` tag.
    pub fn envelope_close() -> String {
        "</testsuites>\n".to_string()
    }
}

impl ResultFormatter for JUnitFormatter {
    fn format(&self, report: &SourceReport<'_>) -> Result<String> {
        let outcome = report.outcome;
        let name = escape_xml(report.name);
        let mut output = String::new();

        writeln!(
            output,
            "  <testsuite name=\"{name}\" failures=\"{}\" time=\"{:.6}\">",
            outcome.errors.len(),
            outcome.elapsed.as_secs_f64()
        )?;

        for error in &outcome.errors {
            let kind = error.kind.as_str();
            let row = position(error.row);
            let column = position(error.column);

            let mut body = format!("Validation failure: {kind}\nat row {row}, column {column}");
            if let Some(field) = report.field_for(error) {
                write!(body, ", {}: ", field.name)?;
            }
            if let Some(content) = &error.content {
                write!(body, ": {content}")?;
            }

            writeln!(output, "    <testcase name=\"{kind}\" classname=\"{name}\">")?;
            writeln!(
                output,
                "      <failure message=\"{kind} row {row} col {column}\" type=\"{kind}\">{}</failure>",
                escape_xml(&body)
            )?;
            writeln!(output, "    </testcase>")?;
        }

        writeln!(output, "  </testsuite>")?;
        Ok(output)
    }
}

fn position(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Escapes the five XML special characters.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Converts a camelCase or kebab-case key to snake_case.
///
/// Runs of capitals are kept together, so `HTTPCode` becomes `http_code`.
pub fn underscore(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            out.push('_');
            continue;
        }
        if !c.is_uppercase() {
            out.push(c);
            continue;
        }

        let prev = i.checked_sub(1).map(|j| chars[j]);
        let next = chars.get(i + 1).copied();
        let boundary = match prev {
            Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
            Some(p) if p.is_uppercase() => next.is_some_and(char::is_lowercase),
            _ => false,
        };
        if boundary && !out.ends_with('_') {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvlint_core::core::{Category, FindingKind, ValidationFinding};
    use serde_json::json;
    use std::time::Duration;

    fn create_test_outcome() -> ValidationOutcome {
        ValidationOutcome::from_findings(
            vec![
                ValidationFinding::error(FindingKind::RaggedRows, Category::Structure)
                    .at_row(3)
                    .with_content("1,2,3"),
                ValidationFinding::error(FindingKind::MissingValue, Category::Schema)
                    .at_row(2)
                    .at_column(2),
                ValidationFinding::warning(FindingKind::InconsistentValues, Category::Schema)
                    .at_column(1),
                ValidationFinding::info(FindingKind::NonrfcLineBreaks, Category::Structure),
            ],
            Duration::from_millis(1500),
        )
    }

    fn create_test_schema() -> TableSchema {
        TableSchema {
            uri: "schema.json".to_string(),
            fields: vec![
                Field::new("id"),
                Field::new("email")
                    .with_constraint("required", json!(true))
                    .with_constraint("minLength", json!(3)),
            ],
            ..TableSchema::default()
        }
    }

    #[test]
    fn test_formatter_config() {
        let config = FormatterConfig::default();
        assert!(!config.use_colors);
        assert!(!config.dump_findings);

        let config = FormatterConfig::terminal().with_dump_findings(true);
        assert!(config.use_colors);
        assert!(config.dump_findings);
    }

    #[test]
    fn test_text_formatter() {
        let outcome = create_test_outcome();
        let schema = create_test_schema();
        let report = SourceReport::new("data.csv", &outcome).with_schema(Some(&schema));

        let output = TextFormatter::new().format(&report).unwrap();
        assert_eq!(
            output,
            "\ndata.csv is INVALID\n\
             1. ragged_rows. Row: 3. 1,2,3\n\
             2. email: missing_value. Row: 2,2\n\
             1. id: inconsistent_values. Column: 1\n"
        );
    }

    #[test]
    fn test_text_formatter_colors() {
        let outcome = create_test_outcome();
        let report = SourceReport::new("data.csv", &outcome);
        let formatter = TextFormatter::with_config(FormatterConfig::terminal());

        let output = formatter.format(&report).unwrap();
        assert!(output.contains("data.csv is \x1b[31mINVALID\x1b[0m"));
        assert!(output.contains("\x1b[31m1. ragged_rows. Row: 3. 1,2,3\x1b[0m"));

        let valid = ValidationOutcome::from_findings(Vec::new(), Duration::ZERO);
        let output = formatter
            .format(&SourceReport::new("ok.csv", &valid))
            .unwrap();
        assert_eq!(output, "\nok.csv is \x1b[32mVALID\x1b[0m\n");
    }

    #[test]
    fn test_text_formatter_dump() {
        let outcome = create_test_outcome();
        let report = SourceReport::new("data.csv", &outcome);
        let formatter = TextFormatter::with_config(FormatterConfig::default().with_dump_findings(true));

        let output = formatter.format(&report).unwrap();
        assert!(output.contains("ValidationFinding {"));
        assert!(output.contains("kind: RaggedRows"));
    }

    #[test]
    fn test_json_formatter() {
        let outcome = create_test_outcome();
        let schema = create_test_schema();
        let report = SourceReport::new("data.csv", &outcome).with_schema(Some(&schema));

        let output = JsonFormatter::new().format(&report).unwrap();
        assert!(!output.contains('\n'));

        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            parsed,
            json!({
                "validation": {
                    "state": "invalid",
                    "errors": [
                        {"type": "ragged_rows", "category": "structure", "row": 3, "col": null},
                        {
                            "type": "missing_value",
                            "category": "schema",
                            "row": 2,
                            "col": 2,
                            "header": "email",
                            "constraints": {"required": true, "min_length": 3}
                        }
                    ],
                    "warnings": [
                        {
                            "type": "inconsistent_values",
                            "category": "schema",
                            "row": null,
                            "col": 1,
                            "header": "id",
                            "constraints": {}
                        }
                    ],
                    "info": [
                        {"type": "nonrfc_line_breaks", "category": "structure", "row": null, "col": null}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_json_formatter_valid() {
        let outcome = ValidationOutcome::from_findings(Vec::new(), Duration::ZERO);
        let output = JsonFormatter::new()
            .format(&SourceReport::new("ok.csv", &outcome))
            .unwrap();
        assert_eq!(
            output,
            r#"{"validation":{"state":"valid","errors":[],"warnings":[],"info":[]}}"#
        );
    }

    #[test]
    fn test_junit_formatter() {
        let outcome = create_test_outcome();
        let schema = create_test_schema();
        let report = SourceReport::new("data.csv", &outcome).with_schema(Some(&schema));

        let output = JUnitFormatter::new().format(&report).unwrap();
        assert!(output.starts_with(
            "  <testsuite name=\"data.csv\" failures=\"2\" time=\"1.500000\">\n"
        ));
        assert!(output.contains(
            "<testcase name=\"ragged_rows\" classname=\"data.csv\">"
        ));
        assert!(output.contains(
            "<failure message=\"ragged_rows row 3 col \" type=\"ragged_rows\">\
             Validation failure: ragged_rows\nat row 3, column : 1,2,3</failure>"
        ));
        assert!(output.contains(
            "Validation failure: missing_value\nat row 2, column 2, email: </failure>"
        ));
        assert_eq!(output.matches("<testcase ").count(), 2);
        assert!(output.ends_with("  </testsuite>\n"));
    }

    #[test]
    fn test_junit_escaping() {
        let outcome = ValidationOutcome::from_findings(
            vec![ValidationFinding::error(FindingKind::RaggedRows, Category::Structure)
                .at_row(1)
                .with_content("<a>&\"b\"")],
            Duration::ZERO,
        );
        let report = SourceReport::new("a&b.csv", &outcome);

        let output = JUnitFormatter::new().format(&report).unwrap();
        assert!(output.contains("name=\"a&amp;b.csv\""));
        assert!(output.contains(": &lt;a&gt;&amp;&quot;b&quot;</failure>"));
    }

    #[test]
    fn test_junit_envelope() {
        assert_eq!(
            JUnitFormatter::envelope_open(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuites name=\"csvlint\">\n"
        );
        assert_eq!(JUnitFormatter::envelope_close(), "</testsuites>\n");
    }

    #[test]
    fn test_paint() {
        assert_eq!(
            paint("data.csv not found", RED, true),
            "\x1b[31mdata.csv not found\x1b[0m"
        );
        assert_eq!(paint("data.csv not found", RED, false), "data.csv not found");
    }

    #[test]
    fn test_underscore() {
        assert_eq!(underscore("minLength"), "min_length");
        assert_eq!(underscore("maxLength"), "max_length");
        assert_eq!(underscore("required"), "required");
        assert_eq!(underscore("HTTPCode"), "http_code");
        assert_eq!(underscore("already_snake"), "already_snake");
        assert_eq!(underscore("date-format"), "date_format");
    }
}
