//! Error types for loading, browsing and exporting the vehicle dataset.
//!
//! Malformed numeric fields are not errors: they are coerced to zero during
//! aggregation. Only a failed ingestion, an invalid table setting or a failed
//! export surface here.

use std::path::PathBuf;
use thiserror::Error;

/// The CSV source could not be read or parsed. No partial rows are returned.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV has no header row")]
    MissingHeader,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("rows per page must be one of 10, 25 or 50 (got {0})")]
    InvalidRowsPerPage(usize),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
}
