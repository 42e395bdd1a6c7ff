//! Per-invocation run options.

use crate::error::{CliError, Result};
use std::str::FromStr;

/// Message shown when `--format` has an unsupported value.
pub const FORMAT_ERROR: &str = "--format must be json or junit";

/// How validation results are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text, colorized on a terminal
    #[default]
    Text,
    /// One JSON document per source
    Json,
    /// JUnit XML
    JUnit,
}

impl OutputFormat {
    /// Returns true for the machine-readable formats.
    pub fn is_structured(&self) -> bool {
        !matches!(self, OutputFormat::Text)
    }
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "junit" => Ok(OutputFormat::JUnit),
            _ => Err(CliError::configuration(FORMAT_ERROR)),
        }
    }
}

/// Options for one invocation, immutable once the run starts.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Pretty-print each finding after its report line
    pub dump_errors: bool,
    /// Schema path or URL
    pub schema: Option<String>,
    /// Raw `--format` value, validated when the run starts
    pub format: Option<String>,
    /// Fail the run when any source produced a warning
    pub warnings_are_errors: bool,
    /// Print a progress glyph per row (text output only)
    pub verbose: bool,
}

impl RunOptions {
    /// Creates options with every flag off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the schema reference.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Sets the raw output format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets whether findings are dumped after their report line.
    pub fn with_dump_errors(mut self, dump_errors: bool) -> Self {
        self.dump_errors = dump_errors;
        self
    }

    /// Sets whether warnings fail the run.
    pub fn with_warnings_as_errors(mut self, enabled: bool) -> Self {
        self.warnings_are_errors = enabled;
        self
    }

    /// Sets whether progress glyphs are printed.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Parses the requested output format.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Configuration`] for anything other than `json`,
    /// `junit`, or an empty value.
    pub fn output_format(&self) -> Result<OutputFormat> {
        self.format
            .as_deref()
            .map_or(Ok(OutputFormat::Text), OutputFormat::from_str)
    }

    /// Whether progress glyphs are printed for the given format.
    pub fn progress_enabled(&self, format: OutputFormat) -> bool {
        self.verbose && !format.is_structured()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(RunOptions::new().output_format().unwrap(), OutputFormat::Text);
        assert_eq!(
            RunOptions::new().with_format("").output_format().unwrap(),
            OutputFormat::Text
        );
        assert_eq!(
            RunOptions::new().with_format("json").output_format().unwrap(),
            OutputFormat::Json
        );
        assert_eq!(
            RunOptions::new().with_format("junit").output_format().unwrap(),
            OutputFormat::JUnit
        );

        let err = RunOptions::new().with_format("xml").output_format().unwrap_err();
        assert_eq!(err.to_string(), FORMAT_ERROR);
    }

    #[test]
    fn test_progress_only_for_verbose_text() {
        let verbose = RunOptions::new().with_verbose(true);
        assert!(verbose.progress_enabled(OutputFormat::Text));
        assert!(!verbose.progress_enabled(OutputFormat::Json));
        assert!(!verbose.progress_enabled(OutputFormat::JUnit));
        assert!(!RunOptions::new().progress_enabled(OutputFormat::Text));
    }
}
