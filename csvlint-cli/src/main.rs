use anyhow::Result;
use clap::Parser;
use csvlint_cli::cli::Args;
use csvlint_cli::formatters::{paint, RED};
use csvlint_cli::logging::{init_logging, LoggingConfig};
use csvlint_cli::Runner;
use csvlint_core::validator::CsvValidator;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(LoggingConfig::default().with_json_format(args.log_json))?;

    let use_colors = io::stdout().is_terminal();
    let runner = Runner::new(CsvValidator::new(), args.run_options()).with_colors(use_colors);

    let mut out = io::stdout();
    let mut diag = io::stderr();
    match runner.run(args.source.as_deref(), &mut out, &mut diag).await {
        Ok(status) => {
            debug!(sources = status.sources, valid = status.valid, "Run finished");
            Ok(status.exit_code())
        }
        Err(err) => {
            debug!(error = ?err, "Run aborted");
            writeln!(out, "{}", paint(&err.to_string(), RED, use_colors))?;
            Ok(ExitCode::FAILURE)
        }
    }
}
