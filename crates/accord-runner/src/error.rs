//! Error types for accord-runner.

use thiserror::Error;

/// Result type for accord-runner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving a batch run.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid run configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A malformed line in an input or log file
    #[error("{path}:{line}: malformed record: {detail}")]
    MalformedRecord {
        path: String,
        line: usize,
        detail: String,
    },

    /// A negotiation hit a programming error (malformed catalog metadata)
    #[error("negotiation error: {0}")]
    Negotiate(#[from] accord_negotiate::Error),

    /// A worker task died
    #[error("worker task failed: {0}")]
    Worker(String),
}
