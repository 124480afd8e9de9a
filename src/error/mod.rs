//! Error handling for the study pipeline.
//!
//! Data-quality anomalies are never errors: a bad record is rejected and
//! counted by the filter stage. The variants here cover infrastructure
//! faults (unreadable or corrupt source files) and programming-contract
//! violations (invalid configuration).

use std::path::PathBuf;

use thiserror::Error;

/// Specialized error type for the study pipeline
#[derive(Debug, Error)]
pub enum StudyError {
    /// Error opening or reading a source file
    #[error("IO error for {path}: {source}")]
    Io {
        /// Path of the file that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Error processing Parquet data
    #[error("Parquet error for {path}: {message}")]
    Parquet {
        /// Path of the file that failed
        path: PathBuf,
        /// Description of the failure
        message: String,
    },

    /// Invalid study configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StudyError {
    /// Create an IO error for a given path
    #[must_use]
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a Parquet error for a given path
    #[must_use]
    pub fn parquet(path: &std::path::Path, message: impl Into<String>) -> Self {
        Self::Parquet {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

/// Result type for study pipeline operations
pub type Result<T> = std::result::Result<T, StudyError>;
