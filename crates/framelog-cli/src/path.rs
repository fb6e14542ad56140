//! Journal path validation.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from journal path validation.
#[derive(Error, Debug)]
pub enum PathError {
    /// Path does not exist.
    #[error("{0}: no such file")]
    NotFound(String),
    /// Path exists but is not a regular file.
    #[error("{0}: not a regular file")]
    NotAFile(String),
    /// Path could not be resolved.
    #[error("{path}: {source}")]
    Resolve {
        /// Sanitized path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
}

/// Validates that `journal` names an existing regular file and returns its
/// canonical path.
pub fn validate_journal_path(journal: &str) -> Result<PathBuf, PathError> {
    let path = Path::new(journal);
    if !path.exists() {
        return Err(PathError::NotFound(sanitize_path_for_error(path)));
    }
    if !path.is_file() {
        return Err(PathError::NotAFile(sanitize_path_for_error(path)));
    }
    path.canonicalize().map_err(|source| PathError::Resolve {
        path: sanitize_path_for_error(path),
        source,
    })
}

/// Reduces a path to its file name for error messages.
pub fn sanitize_path_for_error(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<journal>".to_string())
}
