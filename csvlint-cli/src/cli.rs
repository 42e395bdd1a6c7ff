//! Command-line arguments.

use crate::config::RunOptions;
use clap::Parser;

/// Supports validating CSV files to check their syntax and contents.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "csvlint", version, about)]
pub struct Args {
    /// CSV file path or http(s) URL; when omitted, tables are read from the schema
    pub source: Option<String>,

    /// Schema file path or URL
    #[arg(short, long, value_name = "FILENAME OR URL")]
    pub schema: Option<String>,

    /// Output format
    #[arg(short, long, value_name = "json|junit")]
    pub format: Option<String>,

    /// Output in JSON (same as --format json)
    #[arg(short, long)]
    pub json: bool,

    /// Pretty print error and warning objects
    #[arg(short, long)]
    pub dump_errors: bool,

    /// Make all warnings into errors
    #[arg(short, long)]
    pub werror: bool,

    /// Print a progress glyph for every row
    #[arg(short, long)]
    pub verbose: bool,

    /// Write diagnostic logs to stderr as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Args {
    /// Converts the parsed arguments into run options.
    ///
    /// An explicit `--format` takes precedence over `--json`.
    pub fn run_options(&self) -> RunOptions {
        let format = match (&self.format, self.json) {
            (Some(format), _) => Some(format.clone()),
            (None, true) => Some("json".to_string()),
            (None, false) => None,
        };

        RunOptions {
            dump_errors: self.dump_errors,
            schema: self.schema.clone(),
            format,
            warnings_are_errors: self.werror,
            verbose: self.verbose,
        }
    }
}
