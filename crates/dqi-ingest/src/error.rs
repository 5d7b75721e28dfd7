//! Error types for report ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading study report exports.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Study directory not found or not a directory.
    #[error("study directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// A required report file is missing. Optional reports fall back to an
    /// empty table instead of raising this.
    #[error("required report not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read a file.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a CSV file.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A column the reader cannot work without is absent after synonym
    /// resolution.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
