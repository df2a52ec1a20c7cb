//! Accord Negotiation
//!
//! The negotiation orchestrator and its agent boundary: a bounded
//! multi-round exchange between an untrusted generative mediator and the
//! deterministic verifier, with a guaranteed repair fallback.
//!
//! # Protocol
//!
//! 1. Analyze window feasibility once; the result is kept for gating when
//!    the round budget runs out.
//! 2. Generate two advisory summaries once - user preference and platform
//!    policy - and reuse them unchanged across all rounds.
//! 3. Each round, the mediator receives the window, the constraints, both
//!    advisories and the previous round's verification feedback, and
//!    proposes a [`ProofCertificate`](accord_slate::ProofCertificate). The
//!    verifier recomputes everything; a pass ends the negotiation.
//! 4. When rounds are exhausted on a feasible window, the deterministic
//!    repair solver produces the slate instead. On an infeasible window or
//!    an unrecoverable agent failure, the same solver provides a
//!    best-effort fallback that is reported as such, never as success.
//!
//! No entity ever yields an empty outcome: a slate is always produced.
//!
//! # Trust
//!
//! The generative side is fallible and possibly inconsistent. Everything it
//! returns crosses a schema-validated boundary, and nothing it claims is
//! used for gating. Retries live at the agent boundary
//! ([`RetryPolicy`]); verification and repair are pure and never retried.

mod agent;
mod error;
mod orchestrator;
mod prompts;
mod retry;
mod signature;

pub use agent::{parse_certificate, AdvisoryRole, AgentError, GenerativeAgent};
pub use error::{Error, Result};
pub use orchestrator::{
    NegotiationConfig, NegotiationOutcome, NegotiationRecord, Negotiator,
};
pub use prompts::{
    platform_policy_prompt, render_candidates, render_constraints, user_advocate_prompt,
    MediatorContext,
};
pub use retry::RetryPolicy;
pub use signature::trace_signature;
