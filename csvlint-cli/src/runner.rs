//! Drives one invocation from resolved options to an exit status.

use crate::config::{OutputFormat, RunOptions};
use crate::error::{CliError, Result};
use crate::formatters::{
    paint, FormatterConfig, JUnitFormatter, JsonFormatter, ResultFormatter, SourceReport,
    TextFormatter, RED,
};
use crate::progress::ProgressReporter;
use crate::schema_loader::load_schema;
use crate::sources::{resolve_schema_tables, resolve_source, TableSource};
use csvlint_core::core::{InputHandle, ValidationOutcome};
use csvlint_core::schema::Schema;
use csvlint_core::validator::{RowProgress, Validator};
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, info, instrument, warn};

/// The aggregate result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// True when every source passed
    pub valid: bool,
    /// Number of sources attempted
    pub sources: usize,
}

impl RunStatus {
    /// Maps the status to the process exit code.
    pub fn exit_code(&self) -> ExitCode {
        if self.valid {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Validates every source of an invocation and writes the reports.
///
/// # Examples
///
/// ```rust,no_run
/// use csvlint_cli::config::RunOptions;
/// use csvlint_cli::runner::Runner;
/// use csvlint_core::validator::CsvValidator;
///
/// # async fn example() -> csvlint_cli::error::Result<()> {
/// let runner = Runner::new(CsvValidator::new(), RunOptions::new().with_format("json"));
/// let status = runner
///     .run(Some("data.csv"), &mut std::io::stdout(), &mut std::io::stderr())
///     .await?;
/// assert!(status.valid);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Runner<V> {
    validator: V,
    options: RunOptions,
    use_colors: bool,
}

impl<V: Validator> Runner<V> {
    /// Creates a runner without colored output.
    pub fn new(validator: V, options: RunOptions) -> Self {
        Self {
            validator,
            options,
            use_colors: false,
        }
    }

    /// Sets whether text output is colorized.
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Runs the invocation.
    ///
    /// Reports go to `out`. In JSON and JUnit mode, messages about sources
    /// that could not be validated go to `diag` so `out` stays parseable.
    ///
    /// # Errors
    ///
    /// Returns an error, before any report is written, when the source does
    /// not exist, the schema cannot be loaded, the format is unknown, or
    /// there is nothing to validate. Failures of individual sources are
    /// reported and folded into the status instead.
    #[instrument(skip_all, fields(source = ?source))]
    pub async fn run<W, E>(&self, source: Option<&str>, out: &mut W, diag: &mut E) -> Result<RunStatus>
    where
        W: Write + Send,
        E: Write + Send,
    {
        let direct = resolve_source(source)?;
        let schema = match &self.options.schema {
            Some(reference) => Some(load_schema(reference).await?),
            None => None,
        };
        let format = self.options.output_format()?;

        let planned = match direct {
            Some(handle) => vec![TableSource::resolved(handle)],
            None => resolve_schema_tables(schema.as_ref())?,
        };
        info!(sources = planned.len(), ?format, "Starting validation");

        let formatter = self.formatter_for(format);
        if format == OutputFormat::JUnit {
            out.write_all(JUnitFormatter::envelope_open().as_bytes())?;
        }

        let mut status = RunStatus {
            valid: true,
            sources: planned.len(),
        };
        for table in planned {
            let handle = match table.handle {
                Ok(handle) => handle,
                Err(err) => {
                    warn!(location = %table.location, error = %err, "Skipping table");
                    self.report_problem(format, &err, out, diag)?;
                    status.valid = false;
                    continue;
                }
            };

            let name = handle.display_name();
            match self.validate_one(handle, schema.as_ref(), format, out).await {
                Ok(outcome) => {
                    let report = SourceReport::new(&name, &outcome)
                        .with_schema(schema.as_ref().and_then(Schema::as_table));
                    out.write_all(formatter.format(&report)?.as_bytes())?;
                    if format == OutputFormat::Json {
                        writeln!(out)?;
                    }

                    let passed = outcome.passes(self.options.warnings_are_errors);
                    debug!(source = %name, valid = outcome.valid, passed, "Source validated");
                    status.valid &= passed;
                }
                Err(error) => {
                    warn!(source = %name, %error, "Validation failed");
                    let err = CliError::Validation {
                        name,
                        source: error,
                    };
                    self.report_problem(format, &err, out, diag)?;
                    status.valid = false;
                }
            }
        }

        if format == OutputFormat::JUnit {
            out.write_all(JUnitFormatter::envelope_close().as_bytes())?;
        }
        out.flush()?;

        info!(valid = status.valid, "Validation finished");
        Ok(status)
    }

    async fn validate_one<W: Write + Send>(
        &self,
        handle: InputHandle,
        schema: Option<&Schema>,
        format: OutputFormat,
        out: &mut W,
    ) -> csvlint_core::error::Result<ValidationOutcome> {
        if !self.options.progress_enabled(format) {
            return self.validator.validate(handle, schema, None).await;
        }

        let mut reporter = ProgressReporter::new(self.use_colors);
        let mut callback = |progress: &RowProgress| reporter.record(progress, &mut *out);
        self.validator
            .validate(handle, schema, Some(&mut callback))
            .await
    }

    fn formatter_for(&self, format: OutputFormat) -> Box<dyn ResultFormatter> {
        match format {
            OutputFormat::Text => {
                let config = FormatterConfig::default()
                    .with_colors(self.use_colors)
                    .with_dump_findings(self.options.dump_errors);
                Box::new(TextFormatter::with_config(config))
            }
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::JUnit => Box::new(JUnitFormatter::new()),
        }
    }

    fn report_problem<W: Write, E: Write>(
        &self,
        format: OutputFormat,
        err: &CliError,
        out: &mut W,
        diag: &mut E,
    ) -> Result<()> {
        if format.is_structured() {
            writeln!(diag, "{err}")?;
        } else {
            writeln!(out, "{}", paint(&err.to_string(), RED, self.use_colors))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use csvlint_core::core::{Category, FindingKind, ValidationFinding};
    use csvlint_core::validator::ProgressFn;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    struct FixedValidator(Vec<ValidationFinding>);

    #[async_trait]
    impl Validator for FixedValidator {
        async fn validate(
            &self,
            _input: InputHandle,
            _schema: Option<&Schema>,
            progress: Option<&mut ProgressFn<'_>>,
        ) -> csvlint_core::error::Result<ValidationOutcome> {
            if let Some(progress) = progress {
                progress(&RowProgress { row: 1, errors: 0 });
                progress(&RowProgress {
                    row: 2,
                    errors: self.0.len(),
                });
            }
            Ok(ValidationOutcome::from_findings(
                self.0.clone(),
                Duration::ZERO,
            ))
        }
    }

    fn csv_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "a,b").unwrap();
        file
    }

    #[test]
    fn test_exit_codes() {
        let ok = RunStatus {
            valid: true,
            sources: 1,
        };
        let failed = RunStatus {
            valid: false,
            sources: 1,
        };
        assert_eq!(ok.exit_code(), ExitCode::SUCCESS);
        assert_eq!(failed.exit_code(), ExitCode::FAILURE);
    }

    #[tokio::test]
    async fn test_verbose_text_prints_progress() {
        let file = csv_file();
        let path = file.path().to_str().unwrap().to_string();
        let finding = ValidationFinding::error(FindingKind::RaggedRows, Category::Structure).at_row(2);
        let runner = Runner::new(
            FixedValidator(vec![finding]),
            RunOptions::new().with_verbose(true),
        );

        let mut out = Vec::new();
        let mut diag = Vec::new();
        let status = runner.run(Some(&path), &mut out, &mut diag).await.unwrap();

        assert!(!status.valid);
        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with(".!\n"));
        assert!(output.contains(&format!("{path} is INVALID")));
    }

    #[tokio::test]
    async fn test_verbose_json_has_no_progress() {
        let file = csv_file();
        let path = file.path().to_str().unwrap().to_string();
        let runner = Runner::new(
            FixedValidator(Vec::new()),
            RunOptions::new().with_verbose(true).with_format("json"),
        );

        let mut out = Vec::new();
        let mut diag = Vec::new();
        let status = runner.run(Some(&path), &mut out, &mut diag).await.unwrap();

        assert!(status.valid);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"validation\":{\"state\":\"valid\",\"errors\":[],\"warnings\":[],\"info\":[]}}\n"
        );
    }

    #[tokio::test]
    async fn test_unknown_format_writes_nothing() {
        let file = csv_file();
        let path = file.path().to_str().unwrap().to_string();
        let runner = Runner::new(FixedValidator(Vec::new()), RunOptions::new().with_format("xml"));

        let mut out = Vec::new();
        let mut diag = Vec::new();
        let err = runner
            .run(Some(&path), &mut out, &mut diag)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "--format must be json or junit");
        assert!(out.is_empty());
    }
}
