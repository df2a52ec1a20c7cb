//! The generative agent capability boundary.
//!
//! Everything the negotiation needs from a generative model fits in two
//! fallible operations: free-text advisories and structured mediation.
//! Implementations talk to a real model service; tests inject scripted
//! fakes. The orchestrator only ever sees this trait.
//!
//! Mediator output is schema-validated here, at the boundary: a payload
//! either parses into a strongly typed [`ProofCertificate`] or the call
//! fails with [`AgentError::Schema`]. No partially trusted dynamic data
//! crosses into the core.

use async_trait::async_trait;
use thiserror::Error;

use accord_slate::ProofCertificate;

/// The two advisory perspectives generated once per negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryRole {
    /// Advocate for the entity: maximize relevance.
    UserPreference,
    /// Advocate for the platform: surface constraint-relevant items.
    Policy,
}

impl AdvisoryRole {
    /// Stable role name for logging and prompt headers.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UserPreference => "user_preference",
            Self::Policy => "policy",
        }
    }
}

impl std::fmt::Display for AdvisoryRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the generative agent boundary.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    /// The mediator's payload failed schema validation.
    #[error("mediator output failed schema validation: {0}")]
    Schema(String),

    /// The backing service was unavailable or returned a transient failure.
    #[error("generative backend unavailable: {0}")]
    Unavailable(String),

    /// The retry policy ran out of attempts; the final failure is attached.
    #[error("agent call failed after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        #[source]
        source: Box<AgentError>,
    },
}

/// A generative model capability.
///
/// Both operations are single fallible calls; bounded retries are applied
/// around them by [`RetryPolicy`](crate::RetryPolicy), not inside
/// implementations.
#[async_trait]
pub trait GenerativeAgent: Send + Sync {
    /// Generate a free-text advisory summary for the given role.
    async fn advise(&self, prompt: &str, role: AdvisoryRole) -> Result<String, AgentError>;

    /// Generate a structured certificate proposal.
    async fn mediate(&self, prompt: &str) -> Result<ProofCertificate, AgentError>;
}

/// Parse a raw mediator payload into a typed certificate.
///
/// Implementations of [`GenerativeAgent::mediate`] that receive text from
/// their backing service validate it through this function so every schema
/// mismatch surfaces as [`AgentError::Schema`].
pub fn parse_certificate(payload: &str) -> Result<ProofCertificate, AgentError> {
    serde_json::from_str(payload).map_err(|e| AgentError::Schema(e.to_string()))
}
