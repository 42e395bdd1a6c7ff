//! Input handles consumed by validators.

use crate::fetch::absolute_path;
use std::fs::File;
use std::path::PathBuf;

/// Name used in reports when a source has no printable name.
pub const FALLBACK_DISPLAY_NAME: &str = "CSV";

/// A concrete source of CSV data.
///
/// Handles are consumed by value: each one is validated exactly once.
#[derive(Debug)]
pub enum InputHandle {
    /// A local file, already opened for reading
    LocalFile {
        /// Path the file was opened from
        path: PathBuf,
        /// The open file
        file: File,
    },
    /// A remote resource fetched over HTTP(S)
    RemoteUrl {
        /// The URL to fetch
        url: String,
    },
}

impl InputHandle {
    /// Opens a local file for reading.
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let file = File::open(&path)?;
        Ok(Self::LocalFile { path, file })
    }

    /// Creates a handle for a remote URL.
    pub fn remote(url: impl Into<String>) -> Self {
        Self::RemoteUrl { url: url.into() }
    }

    /// Returns the name used for this source in reports.
    pub fn display_name(&self) -> String {
        match self {
            InputHandle::LocalFile { path, .. } => path
                .to_str()
                .map(str::to_string)
                .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string()),
            InputHandle::RemoteUrl { url } => url.clone(),
        }
    }

    /// Returns the location used to match the handle against a table group.
    ///
    /// Local paths are made absolute so they compare equal to table URLs
    /// resolved against a descriptor.
    pub fn location(&self) -> String {
        match self {
            InputHandle::LocalFile { path, .. } => {
                absolute_path(path).to_string_lossy().into_owned()
            }
            InputHandle::RemoteUrl { url } => url.clone(),
        }
    }
}
