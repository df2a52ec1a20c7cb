//! Certificate verification: recompute, then check.
//!
//! The verifier never trusts a certificate's claimed statistics. It
//! recomputes every statistic from catalog metadata and evaluates each
//! active constraint independently, collecting every failure rather than
//! stopping at the first.
//!
//! The one exception to "collect everything" is the subset rule: a selection
//! that references items outside the shown window is rejected immediately
//! with that single reason and nothing else. There is no point evaluating
//! popularity balance over items the mediator was never offered.
//!
//! The constraints evaluated are the ones embedded in the certificate
//! snapshot. The snapshot is not cross-checked against the live spec; the
//! orchestrator stamps the live spec into every certificate it constructs
//! itself.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use accord_slate::{Catalog, ItemId, ProofCertificate, SlateStats};

use crate::checks;
use crate::error::Result;
use crate::recompute::recompute_stats;

/// One failed verification rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The selection references items outside the shown candidate window.
    SubsetViolation {
        /// The offending ids, in selection order.
        outside: Vec<ItemId>,
    },
    /// The selection contains duplicate item ids.
    DuplicateItems,
    /// More head items than the limit allows.
    TooManyHead { count: usize, limit: usize },
    /// Fewer tail items than the minimum requires.
    TooFewTail { count: usize, limit: usize },
    /// Fewer distinct genres than the minimum requires.
    TooFewGenres { count: usize, limit: usize },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubsetViolation { outside } => {
                let ids: Vec<String> = outside.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "selection contains items outside the candidate window: [{}]",
                    ids.join(", ")
                )
            }
            Self::DuplicateItems => write!(f, "duplicate items in selection"),
            Self::TooManyHead { count, limit } => {
                write!(f, "too many head items: {count} > {limit}")
            }
            Self::TooFewTail { count, limit } => {
                write!(f, "too few tail items: {count} < {limit}")
            }
            Self::TooFewGenres { count, limit } => {
                write!(f, "low diversity: {count} < {limit} unique genres")
            }
        }
    }
}

/// The outcome of verifying one certificate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    /// All evaluated checks passed.
    pub pass: bool,
    /// Every failed check, in evaluation order.
    pub reasons: Vec<Violation>,
    /// Statistics recomputed from the catalog. `None` only when the subset
    /// check short-circuited before recomputation.
    pub recomputed: Option<SlateStats>,
}

/// Verify a certificate against trusted catalog metadata and the exact
/// candidate-id set shown during the negotiation.
///
/// Returns `Err` only for programming errors (a shown item missing from the
/// catalog); every verification failure is reported inside the
/// [`Verification`].
pub fn verify_certificate(
    certificate: &ProofCertificate,
    catalog: &Catalog,
    shown: &HashSet<ItemId>,
) -> Result<Verification> {
    let selected = &certificate.selected_item_ids;

    // Subset check first. On failure nothing else is evaluated.
    let outside: Vec<ItemId> = selected
        .iter()
        .filter(|id| !shown.contains(id))
        .copied()
        .collect();
    if !outside.is_empty() {
        return Ok(Verification {
            pass: false,
            reasons: vec![Violation::SubsetViolation { outside }],
            recomputed: None,
        });
    }

    let stats = recompute_stats(selected, catalog)?;
    let spec = &certificate.constraints_snapshot;

    let mut reasons = Vec::new();

    if spec.safety.no_duplicates && !checks::no_duplicates(selected) {
        reasons.push(Violation::DuplicateItems);
    }

    if let Some(limit) = spec.popularity.max_head_in_slate {
        if !checks::within_max_head(stats.head_count, limit) {
            reasons.push(Violation::TooManyHead {
                count: stats.head_count,
                limit,
            });
        }
    }

    if let Some(limit) = spec.popularity.min_tail_in_slate {
        if !checks::meets_min_tail(stats.tail_count, limit) {
            reasons.push(Violation::TooFewTail {
                count: stats.tail_count,
                limit,
            });
        }
    }

    if let Some(limit) = spec.diversity.min_unique_genres_in_slate {
        if !checks::meets_min_genres(stats.unique_genres, limit) {
            reasons.push(Violation::TooFewGenres {
                count: stats.unique_genres,
                limit,
            });
        }
    }

    Ok(Verification {
        pass: reasons.is_empty(),
        reasons,
        recomputed: Some(stats),
    })
}
