//! Error types shared by the core gateways.
//!
//! [`Error`] covers the cache and response-parsing paths. [`FetchError`] is the
//! failure half of a fetch result: a plain message, cloneable so it can ride
//! inside events and be stored on the session for rendering.

use std::fmt;

use thiserror::Error;

/// Failures raised by the cache gateway and the response parser.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem read/write failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote query could not be run or returned an error.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// A specialized `Result` for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Human-readable reason a fetch produced no records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    message: String,
}

impl FetchError {
    /// Wraps `message` as a fetch failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message shown to the user.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FetchError {}

impl From<Error> for FetchError {
    fn from(err: Error) -> Self {
        match err {
            Error::Fetch(inner) => inner,
            Error::Json(e) => FetchError::new(format!("failed to parse PRs: {e}")),
            Error::Io(e) => FetchError::new(format!("failed to fetch PRs: {e}")),
        }
    }
}
