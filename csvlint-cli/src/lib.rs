//! # csvlint-cli
//!
//! The `csvlint` command: validates one CSV source, or every table of a CSVW
//! table group, and reports the findings as text, JSON, or JUnit XML.
//!
//! The validation itself is delegated to a [`Validator`](csvlint_core::validator::Validator);
//! this crate resolves sources, loads schemas, prints reports, and computes
//! the exit status.
//!
//! ## Exit status
//!
//! The process exits with 0 when every source passed and 1 otherwise. A
//! source fails when it has errors, or warnings under `--werror`. Setup
//! failures (missing source, unloadable schema, unknown format) print a
//! single message and exit with 1 before any report is written.

pub mod cli;
pub mod config;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod progress;
pub mod runner;
pub mod schema_loader;
pub mod sources;

pub use config::{OutputFormat, RunOptions};
pub use error::{CliError, Result};
pub use runner::{RunStatus, Runner};
