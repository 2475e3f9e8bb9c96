//! Error types for input discovery and loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating or reading pipeline inputs.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Search root does not exist or is not a directory.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No file matching the expected name was found under the search root.
    #[error("could not find {name} under {root}")]
    FileNotFound { name: String, root: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// Failed to parse a delimited file.
    #[error("failed to parse {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Required column not found in an input file.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// Headerless file with fewer fields than its fixed layout.
    #[error("{path} line {line}: expected at least {expected} fields, found {found}")]
    ShortRecord {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_file_and_root() {
        let err = IngestError::FileNotFound {
            name: "medications.csv".to_string(),
            root: PathBuf::from("data/raw"),
        };
        assert_eq!(err.to_string(), "could not find medications.csv under data/raw");
    }

    #[test]
    fn polars_errors_convert() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("CODE".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
