//! Error type for reading CSV files

use std::path::{Path, PathBuf};
use std::str::Utf8Error;

use thiserror::Error;

/// Failure category, for callers that only care which class of error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Io,
    Decode,
}

/// Errors produced by the reader. Every variant is terminal for the call:
/// rows parsed before the failure are discarded.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("CSV file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid UTF-8 at line {line}, field {field}: {source}")]
    Decode {
        line: usize,
        field: usize,
        #[source]
        source: Utf8Error,
    },
}

impl ReadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReadError::NotFound { .. } => ErrorKind::NotFound,
            ReadError::Io { .. } => ErrorKind::Io,
            ReadError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Classify an io error raised while opening or reading `path`
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ReadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ReadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}
