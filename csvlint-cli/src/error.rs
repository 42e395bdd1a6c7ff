//! Error types for the csvlint command-line tool.
//!
//! The `Display` form of every variant is the exact message shown to the
//! user before the process exits with status 1.

use csvlint_core::error::CsvlintError;
use thiserror::Error;

/// Errors raised while running the CLI.
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command-line configuration, e.g. an unknown output format.
    #[error("{0}")]
    Configuration(String),

    /// A CSV source path does not exist.
    #[error("{location} not found")]
    SourceNotFound {
        /// The path that was requested
        location: String,
    },

    /// A CSV source exists but could not be opened.
    #[error("{location} could not be read: {source}")]
    SourceUnreadable {
        /// The path that was requested
        location: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The schema could not be loaded.
    #[error(transparent)]
    SchemaLoad(#[from] SchemaLoadError),

    /// The validator failed to process a source.
    #[error("{name} could not be validated: {source}")]
    Validation {
        /// Display name of the source
        name: String,
        /// Underlying engine error
        #[source]
        source: CsvlintError,
    },

    /// Writing a report failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Rendering a report into a string failed.
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serializing a report failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Schema load failures, classified for reporting.
#[derive(Error, Debug)]
pub enum SchemaLoadError {
    /// The descriptor is structurally or semantically invalid.
    #[error("invalid metadata: {message}{}", at_path(.path))]
    Metadata {
        /// Human-readable error message
        message: String,
        /// Location of the offending fragment, if known
        path: Option<String>,
    },

    /// The descriptor could not be fetched.
    #[error("{reference} not found")]
    Fetch {
        /// The path or URL given on the command line
        reference: String,
    },

    /// The descriptor payload is not valid JSON.
    #[error("invalid metadata: malformed JSON")]
    MalformedPayload,

    /// The descriptor was found but failed for another reason.
    #[error("{reference} could not be loaded: {source}")]
    Unreadable {
        /// The path or URL given on the command line
        reference: String,
        /// Underlying engine error
        #[source]
        source: CsvlintError,
    },
}

fn at_path(path: &Option<String>) -> String {
    path.as_ref().map(|p| format!(" at {p}")).unwrap_or_default()
}

/// A type alias for `Result<T, CliError>`.
pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_not_found_message() {
        let err = CliError::SourceNotFound {
            location: "missing.csv".to_string(),
        };
        assert_eq!(err.to_string(), "missing.csv not found");
    }

    #[test]
    fn test_schema_load_messages() {
        let err: CliError = SchemaLoadError::Metadata {
            message: "url must be a string".to_string(),
            path: Some("$.tables[0].url".to_string()),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invalid metadata: url must be a string at $.tables[0].url"
        );

        let err: CliError = SchemaLoadError::Metadata {
            message: "descriptor must be a JSON object".to_string(),
            path: None,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "invalid metadata: descriptor must be a JSON object"
        );

        let err: CliError = SchemaLoadError::MalformedPayload.into();
        assert_eq!(err.to_string(), "invalid metadata: malformed JSON");

        let err: CliError = SchemaLoadError::Fetch {
            reference: "schema.json".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "schema.json not found");
    }
}
