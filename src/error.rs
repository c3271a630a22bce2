//! fmtsplice error types.
//!
//! All errors are typed and provide root cause information.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fmtsplice operations.
#[derive(Error, Debug)]
pub enum FmtspliceError {
    /// I/O error during file operations.
    #[error("I/O error for path {path}: {source}")]
    Io {
        /// The file path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A diff summary line carried no `a`, `c` or `d` operator.
    #[error("cannot parse diff line: {line:?}")]
    DiffParse {
        /// The offending summary line.
        line: String,
    },

    /// An edit address does not exist in the buffer.
    #[error("address {address} out of range (buffer has {lines} lines)")]
    InvalidAddress {
        /// Human-readable form of the address.
        address: String,
        /// Number of lines the buffer holds.
        lines: usize,
    },

    /// A saved file is not UTF-8 text and cannot be edited line by line.
    #[error("{path} is not UTF-8 text: {source}")]
    NotText {
        /// The saved file.
        path: PathBuf,
        /// Where decoding failed.
        #[source]
        source: std::str::Utf8Error,
    },

    /// Temporary file for the reformatted content could not be created.
    #[error("cannot create temporary file: {0}")]
    TempFile(#[source] std::io::Error),

    /// Writing to the shared report buffer failed.
    #[error("report write failed: {0}")]
    Report(#[source] std::io::Error),

    /// Filesystem watcher error.
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// The save-event stream broke.
    #[error("event stream error: {0}")]
    EventStream(String),

    /// Invalid configuration file.
    #[error("invalid config {path}: {message}")]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// The validation or parse error message.
        message: String,
    },

    /// UTF-8 validation error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for FmtspliceError {
    fn from(err: std::io::Error) -> Self {
        FmtspliceError::Io {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl FmtspliceError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FmtspliceError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for fmtsplice operations.
pub type Result<T> = std::result::Result<T, FmtspliceError>;
