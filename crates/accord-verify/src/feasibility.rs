//! Window feasibility analysis: can any compliant slate exist here?
//!
//! These are cheap **necessary-condition** checks, not an exact existence
//! proof. A window that fails any check cannot yield a compliant slate; a
//! window that passes all of them is merely not provably infeasible. The
//! genre check in particular counts distinct genres across the whole window,
//! a lower bound that does not confirm N items can realize that coverage
//! simultaneously.
//!
//! The report is computed once per entity, before the first negotiation
//! round, and reused unchanged when the round budget is exhausted.

use serde::{Deserialize, Serialize};

use accord_slate::{Catalog, CandidateWindow, ConstraintSpec, PopularityTier};

/// Why a window cannot yield a compliant slate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeasibilityReason {
    /// Fewer tail items available than the minimum requires.
    TailShortage,
    /// Filling the slate forces more head items than the maximum allows.
    HeadForcedViolation,
    /// The whole window covers fewer distinct genres than the minimum.
    GenreShortageWindow,
}

impl std::fmt::Display for FeasibilityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::TailShortage => "tail_shortage",
            Self::HeadForcedViolation => "head_forced_violation",
            Self::GenreShortageWindow => "genre_shortage_window",
        };
        f.write_str(s)
    }
}

/// The outcome of feasibility analysis over one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeasibilityReport {
    /// No necessary condition was violated.
    pub feasible: bool,
    /// Every violated condition, in check order.
    pub reasons: Vec<FeasibilityReason>,
    /// Head items available in the window.
    pub avail_head: usize,
    /// Torso items available in the window.
    pub avail_torso: usize,
    /// Tail items available in the window.
    pub avail_tail: usize,
    /// Distinct genres across the whole window.
    pub window_unique_genres: usize,
}

/// Analyze whether a compliant slate of `slate_size` items can exist within
/// the window.
///
/// Candidates without catalog metadata are invisible to the analysis, the
/// same way the repair solver skips them.
#[must_use]
pub fn analyze_window(
    window: &CandidateWindow,
    catalog: &Catalog,
    spec: &ConstraintSpec,
    slate_size: usize,
) -> FeasibilityReport {
    let mut avail_head = 0usize;
    let mut avail_torso = 0usize;
    let mut avail_tail = 0usize;
    let mut genres = std::collections::BTreeSet::new();

    for candidate in window {
        let Some(meta) = catalog.get(candidate.item_id) else {
            continue;
        };
        match meta.tier {
            PopularityTier::Head => avail_head += 1,
            PopularityTier::Torso => avail_torso += 1,
            PopularityTier::Tail => avail_tail += 1,
        }
        genres.extend(meta.genres.iter().map(String::as_str));
    }
    let window_unique_genres = genres.len();

    // Absent constraint fields are treated as the loosest possible bound.
    let max_head = spec.popularity.max_head_in_slate.unwrap_or(slate_size);
    let min_tail = spec.popularity.min_tail_in_slate.unwrap_or(0);
    let min_genres = spec.diversity.min_unique_genres_in_slate.unwrap_or(0);

    let mut reasons = Vec::new();

    if avail_tail < min_tail {
        reasons.push(FeasibilityReason::TailShortage);
    }

    // Filling N slots after using every non-head item leaves a residue that
    // must come from head.
    let avail_non_head = avail_tail + avail_torso;
    let min_head_needed = slate_size.saturating_sub(avail_non_head);
    if min_head_needed > max_head {
        reasons.push(FeasibilityReason::HeadForcedViolation);
    }

    if window_unique_genres < min_genres {
        reasons.push(FeasibilityReason::GenreShortageWindow);
    }

    FeasibilityReport {
        feasible: reasons.is_empty(),
        reasons,
        avail_head,
        avail_torso,
        avail_tail,
        window_unique_genres,
    }
}
