//! Common error types for iosprobe.

use thiserror::Error;

/// Common error type for iosprobe operations.
///
/// Probes never hand these to the caller of `detect`; they exist so that
/// each failure can be logged with a precise cause before the affected
/// unit of data is dropped.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Command execution failed: {cmd} - {reason}")]
    CommandExecution { cmd: String, reason: String },

    #[error("Unparseable {tool} output: {reason}")]
    UnparseableOutput { tool: String, reason: String },

    #[error("Malformed provisioning profile: {0}")]
    MalformedProfile(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias using common Error.
pub type Result<T> = std::result::Result<T, Error>;

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Other(e.to_string())
    }
}
