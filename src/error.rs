//! Error types for SortCopy
//!
//! Every filesystem failure carries the path it happened on so a log line
//! alone is enough to locate the offending item.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for SortCopy operations
#[derive(Error, Debug)]
pub enum SortError {
    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source folder does not exist
    #[error("Source folder {0} does not exist")]
    SourceMissing(PathBuf),

    /// Source and destination resolve to the same file
    #[error("Source and destination are the same file: {0}")]
    SameFile(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory traversal failed part way through
    #[error("Scan of '{root}' failed: {message}")]
    Scan { root: PathBuf, message: String },

    /// Exclude pattern could not be compiled
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    /// A copy task panicked or was aborted
    #[error("Copy task failed to complete: {0}")]
    TaskPanicked(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SortError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a scan error for the given root
    pub fn scan(root: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Scan {
            root: root.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias for SortCopy operations
pub type Result<T> = std::result::Result<T, SortError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| SortError::io(path, e))
    }
}
