//! Error types for the csvlint validation engine.
//!
//! All fallible operations in this crate return [`CsvlintError`]. Validation
//! findings are not errors: they are data carried by
//! [`ValidationOutcome`](crate::core::ValidationOutcome).

use thiserror::Error;

/// The main error type for the csvlint engine.
#[derive(Error, Debug)]
pub enum CsvlintError {
    /// The schema descriptor is structurally or semantically invalid.
    #[error("{message}")]
    Metadata {
        /// Human-readable error message
        message: String,
        /// JSON path locating the offending fragment, e.g. `$.tables[0].url`
        path: Option<String>,
    },

    /// A local file or remote resource could not be fetched.
    #[error("Failed to fetch '{reference}': {message}")]
    Fetch {
        /// The path or URL that was requested
        reference: String,
        /// Detailed error message
        message: String,
    },

    /// Error from the CSV reader.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, CsvlintError>`.
pub type Result<T> = std::result::Result<T, CsvlintError>;

impl CsvlintError {
    /// Creates a metadata error without a location.
    pub fn metadata(message: impl Into<String>) -> Self {
        Self::Metadata {
            message: message.into(),
            path: None,
        }
    }

    /// Creates a metadata error pointing at a fragment of the descriptor.
    pub fn metadata_at(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Metadata {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Creates a new fetch error.
    pub fn fetch(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            reference: reference.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CsvlintError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<CsvlintError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            CsvlintError::Internal(inner) => CsvlintError::Internal(format!("{}: {}", f(), inner)),
            // Metadata and fetch errors are classified by callers, keep them intact
            err @ (CsvlintError::Metadata { .. } | CsvlintError::Fetch { .. }) => err,
            other => CsvlintError::Internal(format!("{}: {}", f(), other)),
        })
    }
}
