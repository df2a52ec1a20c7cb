//! Deterministic Slate Verification
//!
//! The three deterministic leaves of the negotiation pipeline:
//!
//! - **Feasibility analysis** ([`analyze_window`]): a cheap
//!   necessary-condition check over a candidate window - "can any compliant
//!   slate exist here?" Computed once per entity and reused when the
//!   negotiation exhausts its rounds.
//! - **Certificate verification** ([`verify_certificate`]): independent
//!   recomputation of slate statistics from trusted catalog metadata,
//!   followed by constraint evaluation. Claimed statistics in a certificate
//!   are never consulted.
//! - **Greedy repair** ([`repair_slate`]): a deterministic single-pass slate
//!   builder that guarantees a non-empty output without any generative
//!   dependency, used both to fix near-misses and as the fallback of last
//!   resort.
//!
//! Everything here is a pure function of its inputs. There is nothing to
//! retry: identical inputs give identical outputs.

mod checks;
mod error;
mod feasibility;
mod recompute;
mod repair;
mod verifier;

pub use error::{Error, Result};
pub use feasibility::{analyze_window, FeasibilityReason, FeasibilityReport};
pub use recompute::recompute_stats;
pub use repair::repair_slate;
pub use verifier::{verify_certificate, Verification, Violation};
