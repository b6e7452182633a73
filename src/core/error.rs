//! Error types for the roadnet library
//!
//! Typed errors for the extraction pipeline. Recoverable map-data defects
//! (missing node refs, out-of-bounds coordinates, degenerate segments) are
//! not errors at all: they are skipped during decomposition. Everything that
//! reaches this enum aborts the whole conversion.

use thiserror::Error;

/// Main error type for roadnet operations
#[derive(Error, Debug)]
pub enum Error {
    /// Bounding box string has the wrong shape or non-numeric parts
    #[error("Invalid bounding box: {0}")]
    InvalidBbox(String),

    /// HTTP-level failure talking to the Overpass API
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network connectivity issues (connect failure, timeout)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed JSON, either from Overpass or a network document
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A road's positional id diverged from its assigned id. This signals a
    /// construction-order defect, never bad input data.
    #[error("Inconsistent network: {0}")]
    InconsistentNetwork(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Error::NetworkError(err.to_string())
        } else {
            Error::HttpError(err.to_string())
        }
    }
}

/// Convenience result type for roadnet operations
pub type Result<T> = std::result::Result<T, Error>;
