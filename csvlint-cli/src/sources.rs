//! Turns the command-line source and schema into input handles.

use crate::error::{CliError, Result};
use csvlint_core::core::InputHandle;
use csvlint_core::fetch::{is_url, strip_file_scheme};
use csvlint_core::schema::Schema;
use std::io::ErrorKind;
use tracing::debug;

/// Message shown when neither a source nor a table group was given.
pub const NO_DATA_MESSAGE: &str = "No CSV data to validate.";

/// A table declared by a table group, with the outcome of opening it.
#[derive(Debug)]
pub struct TableSource {
    /// Location of the table after `file:` stripping
    pub location: String,
    /// The opened handle, or the reason it could not be opened
    pub handle: Result<InputHandle>,
}

impl TableSource {
    /// Wraps an already opened handle.
    pub fn resolved(handle: InputHandle) -> Self {
        Self {
            location: handle.location(),
            handle: Ok(handle),
        }
    }
}

/// Resolves the positional source argument.
///
/// Returns `Ok(None)` when no source was given. Anything starting with
/// `http://` or `https://` is treated as a URL and not fetched here.
///
/// # Errors
///
/// Returns [`CliError::SourceNotFound`] when a local path does not exist.
pub fn resolve_source(source: Option<&str>) -> Result<Option<InputHandle>> {
    source.map(open_source).transpose()
}

/// Lists the tables of a table group, opening each one.
///
/// Tables that fail to open are returned with their error so the caller can
/// report them and move on to the next table.
///
/// # Errors
///
/// Returns [`CliError::Configuration`] when `schema` is absent or describes a
/// single table.
pub fn resolve_schema_tables(schema: Option<&Schema>) -> Result<Vec<TableSource>> {
    let group = schema
        .and_then(Schema::as_group)
        .ok_or_else(|| CliError::configuration(NO_DATA_MESSAGE))?;

    Ok(group
        .tables
        .iter()
        .map(|table| {
            let location = if is_url(&table.url) {
                table.url.clone()
            } else {
                strip_file_scheme(&table.url).to_string()
            };
            let handle = open_source(&location);
            TableSource { location, handle }
        })
        .collect())
}

fn open_source(reference: &str) -> Result<InputHandle> {
    if is_url(reference) {
        return Ok(InputHandle::remote(reference));
    }

    InputHandle::open(reference).map_err(|err| {
        debug!(source = reference, error = %err, "Failed to open source");
        if err.kind() == ErrorKind::NotFound {
            CliError::SourceNotFound {
                location: reference.to_string(),
            }
        } else {
            CliError::SourceUnreadable {
                location: reference.to_string(),
                source: err,
            }
        }
    })
}
