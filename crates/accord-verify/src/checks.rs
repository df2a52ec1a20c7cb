//! Single-constraint predicates.
//!
//! Each predicate evaluates one constraint against already-recomputed
//! statistics. The verifier composes them; keeping them separate keeps each
//! rule trivially auditable.

use std::collections::HashSet;

use accord_slate::ItemId;

/// All selected ids are pairwise distinct.
#[must_use]
pub fn no_duplicates(selected: &[ItemId]) -> bool {
    let mut seen = HashSet::with_capacity(selected.len());
    selected.iter().all(|id| seen.insert(*id))
}

/// Head count does not exceed the limit.
#[must_use]
pub fn within_max_head(head_count: usize, limit: usize) -> bool {
    head_count <= limit
}

/// Tail count meets the minimum.
#[must_use]
pub fn meets_min_tail(tail_count: usize, limit: usize) -> bool {
    tail_count >= limit
}

/// Distinct genre count meets the minimum.
#[must_use]
pub fn meets_min_genres(unique_genres: usize, limit: usize) -> bool {
    unique_genres >= limit
}
