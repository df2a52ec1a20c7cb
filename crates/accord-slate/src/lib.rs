//! Accord Slate Data Model
//!
//! The shared vocabulary of the slate construction pipeline: catalog items
//! with popularity tiers and genre sets, scored candidate windows, the
//! constraint specification, and the proof certificate exchanged between the
//! generative mediator and the deterministic verifier.
//!
//! # Trust Boundaries
//!
//! Everything in this crate is plain data, but the pieces sit on different
//! sides of the trust boundary:
//!
//! - [`Catalog`] and [`CandidateWindow`] are **trusted** read-only inputs
//!   supplied by the surrounding pipeline.
//! - [`ProofCertificate`] is **untrusted**: it is produced by a generative
//!   model and its claimed statistics must never be used for gating. The
//!   verifier recomputes every statistic from the catalog.
//!
//! # Constraint Semantics
//!
//! Every field of [`ConstraintSpec`] is optional; an absent field means the
//! dimension is unconstrained. The only default-on rule is the duplicate
//! safety check.

mod certificate;
mod constraints;
mod item;
mod window;

pub use certificate::{
    NegotiationRound, ProofCertificate, SlateStats, CERTIFICATE_VERSION,
};
pub use constraints::{
    ConstraintSpec, DiversityConstraints, PopularityConstraints, SafetyConstraints,
};
pub use item::{Catalog, ItemId, ItemMeta, PopularityTier};
pub use window::{CandidateWindow, ScoredCandidate};
