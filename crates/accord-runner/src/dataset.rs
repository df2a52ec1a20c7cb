//! JSONL input adapters for the catalog and candidate windows.
//!
//! Both inputs are produced by the upstream ranking pipeline and loaded once
//! per run: one item per line for the catalog, one entity per line for the
//! windows. Malformed lines are reported with their position rather than
//! silently skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use accord_slate::{Catalog, CandidateWindow, ItemId, ItemMeta, PopularityTier, ScoredCandidate};

use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct ItemRecord {
    item_id: ItemId,
    popularity_tier: PopularityTier,
    #[serde(default)]
    genres: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WindowRecord {
    entity_id: u64,
    candidates: Vec<ScoredCandidate>,
}

fn parse_lines<T, F>(path: &Path, mut consume: F) -> Result<()>
where
    T: serde::de::DeserializeOwned,
    F: FnMut(T),
{
    let reader = BufReader::new(File::open(path)?);
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(&line).map_err(|e| Error::MalformedRecord {
            path: path.display().to_string(),
            line: index + 1,
            detail: e.to_string(),
        })?;
        consume(record);
    }
    Ok(())
}

/// Load the item catalog from a JSONL file.
///
/// Each line: `{"item_id": 1, "popularity_tier": "tail", "genres": ["Drama"]}`.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    parse_lines(path, |record: ItemRecord| {
        catalog.insert(
            record.item_id,
            ItemMeta::new(record.popularity_tier, record.genres),
        );
    })?;
    Ok(catalog)
}

/// Load per-entity candidate windows from a JSONL file.
///
/// Each line: `{"entity_id": 7, "candidates": [{"item_id": 1, "score": 0.9}, ...]}`.
/// Candidates are re-sorted descending by score, so upstream ordering is not
/// load-bearing.
pub fn load_windows(path: &Path) -> Result<Vec<(u64, CandidateWindow)>> {
    let mut windows = Vec::new();
    parse_lines(path, |record: WindowRecord| {
        windows.push((record.entity_id, CandidateWindow::new(record.candidates)));
    })?;
    Ok(windows)
}
