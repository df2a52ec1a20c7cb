//! Independent recomputation of slate statistics from trusted catalog
//! metadata.
//!
//! This is the only source of truth for verification. Whatever a certificate
//! claims about itself is ignored.

use std::collections::BTreeSet;

use accord_slate::{Catalog, ItemId, PopularityTier, SlateStats};

use crate::error::{Error, Result};

/// Recompute tier counts and distinct genre coverage for a selection.
///
/// Every selected item must have catalog metadata; a missing entry is a
/// programming error in the surrounding pipeline, not a verification
/// failure.
pub fn recompute_stats(selected: &[ItemId], catalog: &Catalog) -> Result<SlateStats> {
    let mut stats = SlateStats::default();
    let mut genres: BTreeSet<&str> = BTreeSet::new();

    for &id in selected {
        let meta = catalog.get(id).ok_or(Error::UnknownItem(id))?;
        match meta.tier {
            PopularityTier::Head => stats.head_count += 1,
            PopularityTier::Torso => stats.torso_count += 1,
            PopularityTier::Tail => stats.tail_count += 1,
        }
        genres.extend(meta.genres.iter().map(String::as_str));
    }

    stats.unique_genres = genres.len();
    Ok(stats)
}
