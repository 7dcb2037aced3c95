//! Centralized error types for tnefextract.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the tnefextract library.
#[derive(Error, Debug)]
pub enum TnefError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified file does not exist.
    #[error("TNEF file not found: {0}")]
    FileNotFound(PathBuf),

    /// The buffer does not start with the TNEF signature.
    ///
    /// This is the decoder's only hard failure. Everything else (truncated
    /// records, malformed MAPI blocks, undecodable text) degrades to a
    /// partial result instead.
    #[error("Not a TNEF stream: missing 0x223E9F78 signature")]
    InvalidSignature,
}

/// Convenience alias for `Result<T, TnefError>`.
pub type Result<T> = std::result::Result<T, TnefError>;

impl TnefError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` inside functions returning `TnefError`
/// when no path context is available (rare — prefer `TnefError::io`).
impl From<std::io::Error> for TnefError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}
