//! Candidate windows: the top-W scored items presented as the universe for
//! slate construction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::item::ItemId;

/// One externally ranked candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// The candidate item.
    pub item_id: ItemId,
    /// Relevance score from the upstream ranker. Higher is better.
    pub score: f64,
}

impl ScoredCandidate {
    /// Create a scored candidate.
    #[must_use]
    pub fn new(item_id: ItemId, score: f64) -> Self {
        Self { item_id, score }
    }
}

/// An ordered candidate sequence, descending by score.
///
/// The window is the universe for one entity's negotiation: every selection
/// the mediator proposes must be a subset of it, and the repair solver walks
/// it front to back. Equal scores keep their input order, so downstream
/// passes are deterministic given the same input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateWindow {
    candidates: Vec<ScoredCandidate>,
}

impl CandidateWindow {
    /// Build a window from unordered candidates, sorting descending by score.
    ///
    /// The sort is stable: candidates with equal scores keep their input
    /// order.
    #[must_use]
    pub fn new(mut candidates: Vec<ScoredCandidate>) -> Self {
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self { candidates }
    }

    /// Build a window from candidates already sorted descending by score.
    #[must_use]
    pub fn from_sorted(candidates: Vec<ScoredCandidate>) -> Self {
        Self { candidates }
    }

    /// A copy limited to the first `w` candidates.
    #[must_use]
    pub fn truncated(&self, w: usize) -> Self {
        Self {
            candidates: self.candidates.iter().take(w).copied().collect(),
        }
    }

    /// The set of candidate ids shown in this window.
    #[must_use]
    pub fn id_set(&self) -> HashSet<ItemId> {
        self.candidates.iter().map(|c| c.item_id).collect()
    }

    /// Whether the window contains the given item.
    #[must_use]
    pub fn contains(&self, id: ItemId) -> bool {
        self.candidates.iter().any(|c| c.item_id == id)
    }

    /// Number of candidates in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the window is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Iterate candidates in score order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScoredCandidate> {
        self.candidates.iter()
    }

    /// The candidates as a slice, in score order.
    #[must_use]
    pub fn as_slice(&self) -> &[ScoredCandidate] {
        &self.candidates
    }
}

impl<'a> IntoIterator for &'a CandidateWindow {
    type Item = &'a ScoredCandidate;
    type IntoIter = std::slice::Iter<'a, ScoredCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
