//! Deterministic constrained greedy repair.
//!
//! A single forward pass over the score-ordered window that guarantees
//! termination and, whenever the feasibility analysis held, a slate that
//! verifies clean. No generative dependency anywhere.
//!
//! The pass reserves slots for the tail minimum: once the remaining slots
//! are all needed for tail items, only tail items are accepted. Head items
//! are skipped once the head limit is reached. Everything else is taken in
//! score order.
//!
//! The pass does **not** actively optimize genre diversity; a
//! `min_unique_genres_in_slate` constraint is met only through incidental
//! variety. This is a documented limitation shared with the feasibility
//! analyzer's genre lower bound.

use accord_slate::{Catalog, CandidateWindow, ConstraintSpec, ItemId};

/// Build a slate of up to `slate_size` items from the window.
///
/// O(W), fully deterministic: the window's score order (stable for ties)
/// decides everything. Candidates without catalog metadata are skipped.
///
/// When the window is infeasible the result is best-effort and may be short
/// or non-compliant; callers report it as a fallback, never as a verified
/// success.
#[must_use]
pub fn repair_slate(
    window: &CandidateWindow,
    catalog: &Catalog,
    spec: &ConstraintSpec,
    slate_size: usize,
) -> Vec<ItemId> {
    let max_head = spec.popularity.max_head_in_slate.unwrap_or(slate_size);
    let min_tail = spec.popularity.min_tail_in_slate.unwrap_or(0);

    let mut selected = Vec::with_capacity(slate_size);
    let mut head_count = 0usize;
    let mut tail_count = 0usize;

    for candidate in window {
        if selected.len() >= slate_size {
            break;
        }
        let Some(meta) = catalog.get(candidate.item_id) else {
            continue;
        };

        let slots_rem = slate_size - selected.len();
        let tail_needed = min_tail.saturating_sub(tail_count);

        // Every remaining slot is spoken for by the tail minimum: only tail
        // items may enter.
        if slots_rem <= tail_needed {
            if meta.tier.is_tail() {
                selected.push(candidate.item_id);
                tail_count += 1;
            }
            continue;
        }

        if meta.tier.is_head() && head_count >= max_head {
            continue;
        }

        selected.push(candidate.item_id);
        if meta.tier.is_head() {
            head_count += 1;
        }
        if meta.tier.is_tail() {
            tail_count += 1;
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use accord_slate::{
        ItemMeta, PopularityTier, ProofCertificate, ScoredCandidate, SlateStats,
        CERTIFICATE_VERSION,
    };
    use proptest::prelude::*;

    use crate::feasibility::analyze_window;
    use crate::verifier::verify_certificate;

    use super::*;

    fn fixture(tiers: &[(u64, PopularityTier, f64)]) -> (CandidateWindow, Catalog) {
        let catalog: Catalog = tiers
            .iter()
            .map(|&(id, tier, _)| (ItemId(id), ItemMeta::new(tier, ["G"])))
            .collect();
        let window = CandidateWindow::new(
            tiers
                .iter()
                .map(|&(id, _, score)| ScoredCandidate::new(ItemId(id), score))
                .collect(),
        );
        (window, catalog)
    }

    #[test]
    fn worked_trace_tail_reservation() {
        // Window desc by score: (1 tail .9) (2 head .8) (3 head .7)
        // (4 tail .6), N=2, min_tail=1, max_head=1.
        //
        // item1 (tail): slots_rem=2, tail_needed=1, no reservation -> accept.
        // item2 (head): slots_rem=1, tail_needed=0, head_count 0 < 1 ->
        // accept. Result [1, 2].
        let (window, catalog) = fixture(&[
            (1, PopularityTier::Tail, 0.9),
            (2, PopularityTier::Head, 0.8),
            (3, PopularityTier::Head, 0.7),
            (4, PopularityTier::Tail, 0.6),
        ]);
        let spec = ConstraintSpec::unconstrained().with_min_tail(1).with_max_head(1);
        let selected = repair_slate(&window, &catalog, &spec, 2);
        assert_eq!(selected, vec![ItemId(1), ItemId(2)]);
    }

    #[test]
    fn reserves_final_slots_for_tail() {
        // Tail items rank last; the pass must skip better-scored non-tail
        // items once the reservation kicks in.
        let (window, catalog) = fixture(&[
            (1, PopularityTier::Head, 0.9),
            (2, PopularityTier::Torso, 0.8),
            (3, PopularityTier::Torso, 0.7),
            (4, PopularityTier::Tail, 0.6),
        ]);
        let spec = ConstraintSpec::unconstrained().with_min_tail(1);
        let selected = repair_slate(&window, &catalog, &spec, 3);
        // Slots 1-2 go to the best items, slot 3 is reserved for tail.
        assert_eq!(selected, vec![ItemId(1), ItemId(2), ItemId(4)]);
    }

    #[test]
    fn head_limit_skips_surplus_head() {
        let (window, catalog) = fixture(&[
            (1, PopularityTier::Head, 0.9),
            (2, PopularityTier::Head, 0.8),
            (3, PopularityTier::Torso, 0.7),
            (4, PopularityTier::Torso, 0.6),
        ]);
        let spec = ConstraintSpec::unconstrained().with_max_head(1);
        let selected = repair_slate(&window, &catalog, &spec, 3);
        assert_eq!(selected, vec![ItemId(1), ItemId(3), ItemId(4)]);
    }

    #[test]
    fn infeasible_window_still_returns_best_effort() {
        // min_tail=1 but no tail exists: the pass reserves the last slot for
        // a tail item that never comes and returns a short slate.
        let (window, catalog) = fixture(&[
            (1, PopularityTier::Head, 0.9),
            (2, PopularityTier::Torso, 0.8),
        ]);
        let spec = ConstraintSpec::unconstrained().with_min_tail(1);
        let selected = repair_slate(&window, &catalog, &spec, 2);
        assert_eq!(selected, vec![ItemId(1)]);
    }

    #[test]
    fn stops_at_slate_size() {
        let (window, catalog) = fixture(&[
            (1, PopularityTier::Torso, 0.9),
            (2, PopularityTier::Torso, 0.8),
            (3, PopularityTier::Torso, 0.7),
        ]);
        let selected = repair_slate(&window, &catalog, &ConstraintSpec::unconstrained(), 2);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn skips_uncataloged_candidates() {
        let (_, catalog) = fixture(&[(1, PopularityTier::Torso, 0.9)]);
        let window = CandidateWindow::from_sorted(vec![
            ScoredCandidate::new(ItemId(99), 1.0),
            ScoredCandidate::new(ItemId(1), 0.9),
        ]);
        let selected = repair_slate(&window, &catalog, &ConstraintSpec::unconstrained(), 2);
        assert_eq!(selected, vec![ItemId(1)]);
    }

    fn certificate_for(selected: Vec<ItemId>, spec: ConstraintSpec) -> ProofCertificate {
        ProofCertificate {
            version: CERTIFICATE_VERSION.to_string(),
            constraints_snapshot: spec,
            selected_item_ids: selected,
            claimed_stats: SlateStats::default(),
            negotiation_trace: Vec::new(),
            signature: String::new(),
        }
    }

    fn tier_from_index(i: usize) -> PopularityTier {
        match i % 3 {
            0 => PopularityTier::Head,
            1 => PopularityTier::Torso,
            _ => PopularityTier::Tail,
        }
    }

    proptest! {
        // For any window/spec where the feasibility analysis holds, the
        // repaired slate must independently verify pass=true. The genre
        // constraint is excluded: the solver does not structurally enforce
        // it.
        #[test]
        fn feasible_repair_verifies_clean(
            tiers in proptest::collection::vec(0usize..3, 1..40),
            slate_size in 1usize..=10,
            min_tail in 0usize..=4,
            max_head in proptest::option::of(0usize..=5),
        ) {
            let (window, catalog) = {
                let catalog: Catalog = tiers
                    .iter()
                    .enumerate()
                    .map(|(i, &t)| {
                        let tier = match t {
                            0 => PopularityTier::Head,
                            1 => PopularityTier::Torso,
                            _ => PopularityTier::Tail,
                        };
                        (ItemId(i as u64), ItemMeta::new(tier, [format!("G{}", tier_from_index(i))]))
                    })
                    .collect();
                let window = CandidateWindow::from_sorted(
                    (0..tiers.len())
                        .map(|i| ScoredCandidate::new(ItemId(i as u64), 1.0 - i as f64 * 0.001))
                        .collect(),
                );
                (window, catalog)
            };

            let mut spec = ConstraintSpec::unconstrained().with_min_tail(min_tail);
            if let Some(limit) = max_head {
                spec = spec.with_max_head(limit);
            }

            // A coherent spec never demands more tail items than the slate
            // holds; the analyzer checks the window, not the spec itself.
            prop_assume!(min_tail <= slate_size);

            let report = analyze_window(&window, &catalog, &spec, slate_size);
            prop_assume!(report.feasible);

            let selected = repair_slate(&window, &catalog, &spec, slate_size);
            let shown: HashSet<ItemId> = window.id_set();
            let verification =
                verify_certificate(&certificate_for(selected, spec), &catalog, &shown).unwrap();
            prop_assert!(
                verification.pass,
                "repair failed verification: {:?}",
                verification.reasons
            );
        }

        // Same inputs, same output: the solver is a pure function.
        #[test]
        fn repair_is_deterministic(
            tiers in proptest::collection::vec(0usize..3, 0..30),
            slate_size in 1usize..=10,
        ) {
            let catalog: Catalog = tiers
                .iter()
                .enumerate()
                .map(|(i, &t)| {
                    let tier = match t {
                        0 => PopularityTier::Head,
                        1 => PopularityTier::Torso,
                        _ => PopularityTier::Tail,
                    };
                    (ItemId(i as u64), ItemMeta::new(tier, ["G"]))
                })
                .collect();
            let window = CandidateWindow::from_sorted(
                (0..tiers.len())
                    .map(|i| ScoredCandidate::new(ItemId(i as u64), 1.0))
                    .collect(),
            );
            let spec = ConstraintSpec::unconstrained().with_min_tail(1).with_max_head(2);

            let first = repair_slate(&window, &catalog, &spec, slate_size);
            let second = repair_slate(&window, &catalog, &spec, slate_size);
            prop_assert_eq!(first, second);
        }
    }
}
