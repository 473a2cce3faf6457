//! Error types for regsurf

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for surface operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error on {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {format} data: {reason}")]
    Format { format: &'static str, reason: String },

    #[error("Invalid surface dimensions: {ncol}x{nrow}")]
    InvalidDimensions { ncol: usize, nrow: usize },

    #[error("Surface of size ({ncol}, {nrow}) needs {expected} cells, got {actual}")]
    CellCountMismatch {
        ncol: usize,
        nrow: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Index out of bounds: ({col}, {row}) in surface of size ({ncol}, {nrow})")]
    IndexOutOfBounds {
        col: usize,
        row: usize,
        ncol: usize,
        nrow: usize,
    },

    #[error("Surface shape mismatch: expected {expected_ncol}x{expected_nrow}, got {actual_ncol}x{actual_nrow}")]
    ShapeMismatch {
        expected_ncol: usize,
        expected_nrow: usize,
        actual_ncol: usize,
        actual_nrow: usize,
    },

    #[error("Surface geometry mismatch: {0}")]
    GeometryMismatch(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

impl Error {
    pub(crate) fn format(format: &'static str, reason: impl Into<String>) -> Self {
        Error::Format {
            format,
            reason: reason.into(),
        }
    }

    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::File {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for surface operations
pub type Result<T> = std::result::Result<T, Error>;
