//! Error types for content loading and the JSON integrity scan.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by content sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("content not found: {path}")]
    NotFound { path: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request for {path} failed with status {status}")]
    HttpStatus {
        path: String,
        status: reqwest::StatusCode,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid content url: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("content lock poisoned")]
    Poisoned,
}

impl ContentError {
    /// True for a missing file, which is expected while probing lesson numbers.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}

/// Errors that stop the JSON scan before any file is checked.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScanError {
    #[error("content directory not found: {}", path.display())]
    MissingRoot { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
