//! Retrieval of local and remote resources.

use crate::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Prefix of local file references written as URIs.
pub const FILE_SCHEME_PREFIX: &str = "file:";

/// Returns true if the reference is an HTTP(S) URL.
pub fn is_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Strips a leading `file:` scheme from a local reference.
pub fn strip_file_scheme(reference: &str) -> &str {
    reference
        .strip_prefix(FILE_SCHEME_PREFIX)
        .unwrap_or(reference)
}

/// Anchors a relative local path at the current directory.
///
/// The path is not canonicalized. If the current directory is unavailable the
/// path is returned unchanged.
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Reads a local file or downloads a URL, returning its raw bytes.
///
/// Missing files, network failures and non-success HTTP statuses are all
/// reported as [`CsvlintError::Fetch`].
#[instrument]
pub async fn fetch_bytes(reference: &str) -> Result<Vec<u8>> {
    if is_url(reference) {
        let response = reqwest::get(reference)
            .await
            .map_err(|e| CsvlintError::fetch(reference, e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CsvlintError::fetch(reference, format!("HTTP {status}")));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| CsvlintError::fetch(reference, e.to_string()))?;
        debug!(bytes = body.len(), "Downloaded resource");
        Ok(body.to_vec())
    } else {
        let path = strip_file_scheme(reference);
        let body = tokio::fs::read(path)
            .await
            .map_err(|e| CsvlintError::fetch(reference, e.to_string()))?;
        debug!(bytes = body.len(), "Read local resource");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_absolute_path_anchors_relative_paths() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolute_path(Path::new("data.csv")), cwd.join("data.csv"));
        assert_eq!(
            absolute_path(Path::new("/srv/data.csv")),
            PathBuf::from("/srv/data.csv")
        );
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("http://example.com/a.csv"));
        assert!(is_url("https://example.com/a.csv"));
        assert!(!is_url("http_log.csv"));
        assert!(!is_url("data/a.csv"));
        assert!(!is_url("file:/tmp/a.csv"));
    }

    #[test]
    fn test_strip_file_scheme() {
        assert_eq!(strip_file_scheme("file:/tmp/a.csv"), "/tmp/a.csv");
        assert_eq!(strip_file_scheme("/tmp/a.csv"), "/tmp/a.csv");
        assert_eq!(strip_file_scheme("data/file:a.csv"), "data/file:a.csv");
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{{\"fields\": []}}").unwrap();

        let reference = format!("file:{}", tmp.path().display());
        let bytes = fetch_bytes(&reference).await.unwrap();
        assert_eq!(bytes, b"{\"fields\": []}");
    }

    #[tokio::test]
    async fn test_fetch_missing_file_is_fetch_error() {
        let err = fetch_bytes("/no/such/schema.json").await.unwrap_err();
        assert!(matches!(err, CsvlintError::Fetch { .. }));
    }
}
