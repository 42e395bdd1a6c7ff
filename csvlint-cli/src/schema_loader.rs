//! Loads the schema named by `--schema` and classifies load failures.

use crate::error::{Result, SchemaLoadError};
use csvlint_core::error::CsvlintError;
use csvlint_core::schema::{Schema, TableSchema};
use tracing::{info, instrument, warn};

/// Loads a schema descriptor from a local path or URL.
///
/// # Errors
///
/// Every failure is a [`SchemaLoadError`]:
/// - invalid structure becomes [`SchemaLoadError::Metadata`]
/// - an unreachable descriptor becomes [`SchemaLoadError::Fetch`]
/// - a payload that is not JSON becomes [`SchemaLoadError::MalformedPayload`]
/// - any other engine failure becomes [`SchemaLoadError::Unreadable`]
#[instrument]
pub async fn load_schema(reference: &str) -> Result<Schema> {
    let schema = Schema::load_from_uri(reference)
        .await
        .map_err(|err| classify(reference, err))?;

    if schema.as_table().is_some_and(TableSchema::is_malformed) {
        return Err(SchemaLoadError::MalformedPayload.into());
    }

    info!(
        tables = schema.as_group().map_or(0, |g| g.tables.len()),
        "Loaded schema"
    );
    Ok(schema)
}

fn classify(reference: &str, err: CsvlintError) -> SchemaLoadError {
    match err {
        CsvlintError::Metadata { message, path } => SchemaLoadError::Metadata { message, path },
        CsvlintError::Fetch { message, .. } => {
            warn!(reference, %message, "Failed to fetch schema");
            SchemaLoadError::Fetch {
                reference: reference.to_string(),
            }
        }
        other => {
            warn!(reference, error = %other, "Failed to load schema");
            SchemaLoadError::Unreadable {
                reference: reference.to_string(),
                source: other,
            }
        }
    }
}
