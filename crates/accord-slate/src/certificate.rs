//! The proof certificate: the structured artifact exchanged between the
//! generative mediator and the deterministic verifier.
//!
//! A certificate is produced once per negotiation round and is immutable
//! after emission. Its claimed statistics document what the mediator
//! *believed*; they are never trusted for gating. The verifier recomputes
//! every statistic from the catalog.

use serde::{Deserialize, Serialize};

use crate::constraints::ConstraintSpec;
use crate::item::ItemId;

/// Certificate schema version stamped into every certificate.
pub const CERTIFICATE_VERSION: &str = "accord-v1";

/// Aggregate statistics over a selected slate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlateStats {
    /// Number of head-tier items.
    pub head_count: usize,
    /// Number of torso-tier items.
    pub torso_count: usize,
    /// Number of tail-tier items.
    pub tail_count: usize,
    /// Number of distinct genres covered.
    pub unique_genres: usize,
}

/// One round of the negotiation trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationRound {
    /// 1-based round number.
    pub round: u32,
    /// The user-preference advisory the mediator saw this round.
    pub user_advocate_summary: String,
    /// The policy advisory the mediator saw this round.
    pub platform_policy_summary: String,
    /// The mediator's stated reasoning for its selection.
    pub mediator_decision: String,
}

/// A proof certificate proposed by the mediator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofCertificate {
    /// Schema version, [`CERTIFICATE_VERSION`] for certificates built here.
    pub version: String,
    /// The constraints the mediator claims to have satisfied. Never
    /// cross-checked against the live spec; the verifier evaluates exactly
    /// this snapshot.
    pub constraints_snapshot: ConstraintSpec,
    /// The ordered slate selection.
    pub selected_item_ids: Vec<ItemId>,
    /// Statistics the mediator claims for its selection. Untrusted.
    pub claimed_stats: SlateStats,
    /// Ordered per-round trace of the negotiation so far.
    #[serde(default)]
    pub negotiation_trace: Vec<NegotiationRound>,
    /// Non-cryptographic traceability hash, stamped by the orchestrator.
    #[serde(default)]
    pub signature: String,
}

impl ProofCertificate {
    /// Number of items in the selection.
    #[must_use]
    pub fn slate_len(&self) -> usize {
        self.selected_item_ids.len()
    }
}
