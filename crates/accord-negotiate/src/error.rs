//! Error types for accord-negotiate.

use thiserror::Error;

/// Result type for accord-negotiate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that escape the negotiation as errors.
///
/// Constraint violations, infeasible windows and exhausted agents are all
/// recovered locally and reported inside a
/// [`NegotiationOutcome`](crate::NegotiationOutcome); only programming
/// errors surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// Verification hit malformed inputs (an item without catalog metadata).
    #[error("verification error: {0}")]
    Verify(#[from] accord_verify::Error),

    /// A prompt payload failed to serialize.
    #[error("prompt serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
