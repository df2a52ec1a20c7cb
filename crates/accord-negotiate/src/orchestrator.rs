//! The negotiation orchestrator.
//!
//! Drives the round loop: `INIT -> ADVISORIES -> MEDIATE(round) ->
//! VERIFY(round) -> {SUCCESS | CONTINUE | EXHAUSTED} -> {REPAIR | FALLBACK}`,
//! with `ERROR -> FALLBACK` on unrecoverable agent failure.
//!
//! Feasibility is analyzed exactly once, before the first round, and that
//! result - never a fresh one - gates the exhaustion path. The two advisory
//! summaries are likewise generated once and reused verbatim each round;
//! only the verifier feedback changes between rounds.

use tracing::{debug, info, warn};

use accord_slate::{
    Catalog, CandidateWindow, ConstraintSpec, ItemId, NegotiationRound, ProofCertificate,
    CERTIFICATE_VERSION,
};
use accord_verify::{
    analyze_window, recompute_stats, repair_slate, verify_certificate, FeasibilityReason,
    FeasibilityReport, Verification, Violation,
};

use crate::agent::{AdvisoryRole, AgentError, GenerativeAgent};
use crate::error::Result;
use crate::prompts::{
    platform_policy_prompt, render_candidates, render_constraints, user_advocate_prompt,
    MediatorContext,
};
use crate::retry::RetryPolicy;
use crate::signature::trace_signature;

/// Configuration for one negotiation, constructed once and never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegotiationConfig {
    /// Target slate size N.
    pub slate_size: usize,
    /// Candidate window size W; the supplied window is truncated to this.
    pub window_size: usize,
    /// Maximum mediation rounds before the deterministic path takes over.
    pub max_rounds: u32,
    /// When false, the first mediator proposal is accepted unverified
    /// (ablation switch).
    pub enforce_verifier: bool,
    /// Retry policy applied around every agent call.
    pub retry: RetryPolicy,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            slate_size: 10,
            window_size: 100,
            max_rounds: 3,
            enforce_verifier: true,
            retry: RetryPolicy::default(),
        }
    }
}

impl NegotiationConfig {
    /// Set the target slate size.
    #[must_use]
    pub const fn with_slate_size(mut self, n: usize) -> Self {
        self.slate_size = n;
        self
    }

    /// Set the candidate window size.
    #[must_use]
    pub const fn with_window_size(mut self, w: usize) -> Self {
        self.window_size = w;
        self
    }

    /// Set the round budget.
    #[must_use]
    pub const fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Set the agent retry policy.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Disable verifier gating (ablation: trust the mediator's first
    /// proposal).
    #[must_use]
    pub const fn without_verifier_enforcement(mut self) -> Self {
        self.enforce_verifier = false;
        self
    }
}

/// Terminal outcome of one entity's negotiation.
#[derive(Debug, Clone)]
pub enum NegotiationOutcome {
    /// A certificate was accepted, either from the mediator or from repair.
    Success {
        /// The accepted certificate, signature stamped.
        certificate: ProofCertificate,
        /// Verification of exactly that certificate.
        verification: Verification,
        /// True when the deterministic repair path produced the slate.
        repaired: bool,
    },
    /// The window cannot satisfy the constraints; the selection is best
    /// effort and carries no compliance guarantee.
    Infeasible {
        fallback_selection: Vec<ItemId>,
        reasons: Vec<FeasibilityReason>,
    },
    /// The generative path failed permanently; the selection is the
    /// deterministic fallback.
    AgentFailure {
        fallback_selection: Vec<ItemId>,
        error: AgentError,
    },
}

impl NegotiationOutcome {
    /// Stable outcome name for logs and result records.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Infeasible { .. } => "infeasible",
            Self::AgentFailure { .. } => "agent_failure",
        }
    }

    /// The selected slate, whatever path produced it.
    #[must_use]
    pub fn selected_ids(&self) -> &[ItemId] {
        match self {
            Self::Success { certificate, .. } => &certificate.selected_item_ids,
            Self::Infeasible {
                fallback_selection, ..
            }
            | Self::AgentFailure {
                fallback_selection, ..
            } => fallback_selection,
        }
    }

    /// Whether this outcome is a verified (or ablation-bypassed) success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether the repair solver produced the slate.
    #[must_use]
    pub const fn was_repaired(&self) -> bool {
        matches!(self, Self::Success { repaired: true, .. })
    }
}

/// The full result of one entity's negotiation.
#[derive(Debug, Clone)]
pub struct NegotiationRecord {
    /// Terminal outcome.
    pub outcome: NegotiationOutcome,
    /// The feasibility report computed before round one.
    pub feasibility: FeasibilityReport,
    /// Mediation rounds actually spent.
    pub rounds_used: u32,
}

/// Drives verifier-gated negotiations for single entities.
#[derive(Debug, Clone, Default)]
pub struct Negotiator {
    config: NegotiationConfig,
}

impl Negotiator {
    /// Create a negotiator with the given configuration.
    #[must_use]
    pub const fn new(config: NegotiationConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Negotiate a slate for one entity.
    ///
    /// Always produces a non-empty outcome provided the window holds any
    /// usable candidate; constraint failures, infeasible windows and agent
    /// exhaustion are all folded into the returned record. `Err` means a
    /// programming error (malformed catalog metadata).
    pub async fn negotiate(
        &self,
        entity_id: u64,
        run_id: &str,
        candidates: &CandidateWindow,
        catalog: &Catalog,
        spec: &ConstraintSpec,
        agent: &dyn GenerativeAgent,
    ) -> Result<NegotiationRecord> {
        let window = candidates.truncated(self.config.window_size);
        let shown = window.id_set();

        // Computed once; reused for exhaustion gating, never refreshed.
        let feasibility = analyze_window(&window, catalog, spec, self.config.slate_size);
        debug!(
            entity_id,
            feasible = feasibility.feasible,
            avail_tail = feasibility.avail_tail,
            "analyzed window feasibility"
        );

        let candidates_json = render_candidates(&window, catalog)?;
        let constraints_json = render_constraints(spec)?;

        // The advisories are generated once from the fixed window and spec
        // and reused unchanged across all rounds.
        let user_prompt = user_advocate_prompt(&candidates_json);
        let user_advisory = match self
            .config
            .retry
            .run(|| agent.advise(&user_prompt, AdvisoryRole::UserPreference))
            .await
        {
            Ok(text) => text,
            Err(error) => {
                return Ok(self.agent_failure(entity_id, &window, catalog, spec, feasibility, 0, error))
            }
        };

        let policy_prompt = platform_policy_prompt(&candidates_json, &constraints_json);
        let policy_advisory = match self
            .config
            .retry
            .run(|| agent.advise(&policy_prompt, AdvisoryRole::Policy))
            .await
        {
            Ok(text) => text,
            Err(error) => {
                return Ok(self.agent_failure(entity_id, &window, catalog, spec, feasibility, 0, error))
            }
        };

        let mut feedback: Vec<Violation> = Vec::new();
        let mut last_trace: Vec<NegotiationRound> = Vec::new();

        for round in 1..=self.config.max_rounds {
            let context = MediatorContext {
                slate_size: self.config.slate_size,
                constraints_json: &constraints_json,
                candidates_json: &candidates_json,
                user_advisory: &user_advisory,
                policy_advisory: &policy_advisory,
                feedback: &feedback,
            };
            let mediator_prompt = context.render();

            let mut certificate = match self
                .config
                .retry
                .run(|| agent.mediate(&mediator_prompt))
                .await
            {
                Ok(certificate) => certificate,
                Err(error) => {
                    return Ok(self.agent_failure(
                        entity_id,
                        &window,
                        catalog,
                        spec,
                        feasibility,
                        round,
                        error,
                    ))
                }
            };

            // Whatever the mediator claimed as a signature is replaced.
            certificate.signature =
                trace_signature(entity_id, &certificate.selected_item_ids, spec, run_id);

            let verification = verify_certificate(&certificate, catalog, &shown)?;

            if verification.pass || !self.config.enforce_verifier {
                info!(
                    entity_id,
                    round,
                    verified = verification.pass,
                    "negotiation converged"
                );
                return Ok(NegotiationRecord {
                    outcome: NegotiationOutcome::Success {
                        certificate,
                        verification,
                        repaired: false,
                    },
                    feasibility,
                    rounds_used: round,
                });
            }

            debug!(
                entity_id,
                round,
                violations = verification.reasons.len(),
                "certificate rejected"
            );
            feedback = verification.reasons;
            last_trace = certificate.negotiation_trace;
        }

        // Round budget exhausted: the stored feasibility report decides
        // between guaranteed repair and best-effort fallback.
        let selection = repair_slate(&window, catalog, spec, self.config.slate_size);

        if feasibility.feasible {
            let stats = recompute_stats(&selection, catalog)?;
            let mut certificate = ProofCertificate {
                version: CERTIFICATE_VERSION.to_string(),
                constraints_snapshot: *spec,
                selected_item_ids: selection,
                claimed_stats: stats,
                negotiation_trace: last_trace,
                signature: String::new(),
            };
            certificate.signature =
                trace_signature(entity_id, &certificate.selected_item_ids, spec, run_id);
            let verification = verify_certificate(&certificate, catalog, &shown)?;
            info!(
                entity_id,
                rounds = self.config.max_rounds,
                verified = verification.pass,
                "rounds exhausted, repaired deterministically"
            );
            Ok(NegotiationRecord {
                outcome: NegotiationOutcome::Success {
                    certificate,
                    verification,
                    repaired: true,
                },
                feasibility,
                rounds_used: self.config.max_rounds,
            })
        } else {
            warn!(
                entity_id,
                reasons = feasibility.reasons.len(),
                "window infeasible, returning best-effort fallback"
            );
            let reasons = feasibility.reasons.clone();
            Ok(NegotiationRecord {
                outcome: NegotiationOutcome::Infeasible {
                    fallback_selection: selection,
                    reasons,
                },
                feasibility,
                rounds_used: self.config.max_rounds,
            })
        }
    }

    fn agent_failure(
        &self,
        entity_id: u64,
        window: &CandidateWindow,
        catalog: &Catalog,
        spec: &ConstraintSpec,
        feasibility: FeasibilityReport,
        rounds_used: u32,
        error: AgentError,
    ) -> NegotiationRecord {
        warn!(
            entity_id,
            error = %error,
            "generative path failed, falling back to deterministic repair"
        );
        let fallback_selection = repair_slate(window, catalog, spec, self.config.slate_size);
        NegotiationRecord {
            outcome: NegotiationOutcome::AgentFailure {
                fallback_selection,
                error,
            },
            feasibility,
            rounds_used,
        }
    }
}
