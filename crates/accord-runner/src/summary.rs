//! Run summaries: outcome counts aggregated from the result log.
//!
//! Bookkeeping for quick inspection, not evaluation - ranking metrics live
//! in the downstream analysis pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::log::ResultRecord;

/// Summary file name inside the run directory.
pub const SUMMARY_FILE: &str = "summary.json";

/// Aggregate counts over one run's records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total entities recorded.
    pub total: usize,
    /// Entities with a `success` outcome.
    pub success: usize,
    /// Entities with an `infeasible` outcome.
    pub infeasible: usize,
    /// Entities with an `agent_failure` outcome.
    pub agent_failure: usize,
    /// Successes produced by the deterministic repair path.
    pub repaired: usize,
    /// Successes whose certificate verified pass=true.
    pub verified_pass: usize,
    /// Mean negotiation wall-clock per entity.
    pub mean_timing_ms: f64,
}

impl RunSummary {
    /// Aggregate a slice of records.
    #[must_use]
    pub fn from_records(records: &[ResultRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        let mut total_ms = 0u64;

        for record in records {
            match record.outcome_kind.as_str() {
                "success" => summary.success += 1,
                "infeasible" => summary.infeasible += 1,
                _ => summary.agent_failure += 1,
            }
            if record.repaired {
                summary.repaired += 1;
            }
            if record.verification.as_ref().is_some_and(|v| v.pass) {
                summary.verified_pass += 1;
            }
            total_ms += record.timing_ms;
        }

        if !records.is_empty() {
            summary.mean_timing_ms = total_ms as f64 / records.len() as f64;
        }
        summary
    }

    /// Write the summary into `dir`, replacing any previous one.
    pub fn write(&self, dir: &Path) -> Result<()> {
        std::fs::write(dir.join(SUMMARY_FILE), serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use accord_slate::ItemId;
    use accord_verify::Verification;

    use super::*;

    fn record(kind: &str, repaired: bool, pass: Option<bool>, timing_ms: u64) -> ResultRecord {
        ResultRecord {
            entity_id: 1,
            outcome_kind: kind.into(),
            selected_item_ids: vec![ItemId(1)],
            certificate: None,
            verification: pass.map(|p| Verification {
                pass: p,
                reasons: Vec::new(),
                recomputed: None,
            }),
            feasible_within_window: true,
            feasibility_reasons: Vec::new(),
            repaired,
            rounds_used: 1,
            timing_ms,
            error: None,
        }
    }

    #[test]
    fn counts_partition_by_outcome_kind() {
        let records = vec![
            record("success", false, Some(true), 10),
            record("success", true, Some(true), 20),
            record("infeasible", false, None, 30),
            record("agent_failure", false, None, 40),
        ];
        let summary = RunSummary::from_records(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.success, 2);
        assert_eq!(summary.infeasible, 1);
        assert_eq!(summary.agent_failure, 1);
        assert_eq!(summary.repaired, 1);
        assert_eq!(summary.verified_pass, 2);
        assert!((summary.mean_timing_ms - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_records_are_all_zero() {
        let summary = RunSummary::from_records(&[]);
        assert_eq!(summary, RunSummary::default());
    }

    #[test]
    fn write_produces_json() {
        let dir = tempfile::tempdir().unwrap();
        let summary = RunSummary::from_records(&[record("success", false, Some(true), 5)]);
        summary.write(dir.path()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap();
        let loaded: RunSummary = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded, summary);
    }
}
