//! The append-only result log.
//!
//! One JSON record per line in `results.jsonl`, appended and flushed the
//! moment an entity finishes. Prior bytes are never touched; resuming a run
//! reads the log back and skips every entity already present. The record
//! carries everything downstream evaluation needs, with `outcome_kind`
//! partitioning the feasible-but-failed, infeasible and agent-error
//! populations.

use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use accord_negotiate::{NegotiationOutcome, NegotiationRecord};
use accord_slate::{ItemId, ProofCertificate};
use accord_verify::{FeasibilityReason, Verification};

use crate::error::{Error, Result};

/// Log file name inside the run directory.
pub const RESULTS_FILE: &str = "results.jsonl";

/// One entity's terminal outcome, as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// The entity this record belongs to.
    pub entity_id: u64,
    /// `success`, `infeasible` or `agent_failure`.
    pub outcome_kind: String,
    /// The slate, whatever path produced it.
    pub selected_item_ids: Vec<ItemId>,
    /// The accepted certificate, present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<ProofCertificate>,
    /// Verification of the accepted certificate, present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
    /// The pre-negotiation feasibility verdict.
    pub feasible_within_window: bool,
    /// Feasibility failure tags, empty when feasible.
    #[serde(default)]
    pub feasibility_reasons: Vec<FeasibilityReason>,
    /// Whether the deterministic repair path produced the slate.
    pub repaired: bool,
    /// Mediation rounds spent.
    pub rounds_used: u32,
    /// Wall-clock time for the whole negotiation.
    pub timing_ms: u64,
    /// The terminal agent error, present only on agent failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultRecord {
    /// Flatten a negotiation record into its persisted form.
    #[must_use]
    pub fn from_negotiation(entity_id: u64, record: NegotiationRecord, timing_ms: u64) -> Self {
        let feasible_within_window = record.feasibility.feasible;
        let feasibility_reasons = record.feasibility.reasons;
        let rounds_used = record.rounds_used;

        match record.outcome {
            NegotiationOutcome::Success {
                certificate,
                verification,
                repaired,
            } => Self {
                entity_id,
                outcome_kind: "success".into(),
                selected_item_ids: certificate.selected_item_ids.clone(),
                certificate: Some(certificate),
                verification: Some(verification),
                feasible_within_window,
                feasibility_reasons,
                repaired,
                rounds_used,
                timing_ms,
                error: None,
            },
            NegotiationOutcome::Infeasible {
                fallback_selection, ..
            } => Self {
                entity_id,
                outcome_kind: "infeasible".into(),
                selected_item_ids: fallback_selection,
                certificate: None,
                verification: None,
                feasible_within_window,
                feasibility_reasons,
                repaired: false,
                rounds_used,
                timing_ms,
                error: None,
            },
            NegotiationOutcome::AgentFailure {
                fallback_selection,
                error,
            } => Self {
                entity_id,
                outcome_kind: "agent_failure".into(),
                selected_item_ids: fallback_selection,
                certificate: None,
                verification: None,
                feasible_within_window,
                feasibility_reasons,
                repaired: false,
                rounds_used,
                timing_ms,
                error: Some(error_chain(&error)),
            },
        }
    }
}

/// Render an error with its source chain, outermost first.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

/// Append-only handle on a run's `results.jsonl`.
pub struct ResultLog {
    path: PathBuf,
    file: File,
}

impl ResultLog {
    /// Open (creating if needed) the log inside `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(RESULTS_FILE);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    /// The log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record and flush it to disk.
    pub fn append(&mut self, record: &ResultRecord) -> Result<()> {
        let line = serde_json::to_string(record)?;
        writeln!(self.file, "{line}")?;
        self.file.flush()?;
        Ok(())
    }

    /// Read every record currently in the log.
    pub fn read_existing(&self) -> Result<Vec<ResultRecord>> {
        read_records(&self.path)
    }

    /// The ids of entities already present in the log.
    pub fn completed_entities(&self) -> Result<HashSet<u64>> {
        Ok(self
            .read_existing()?
            .into_iter()
            .map(|r| r.entity_id)
            .collect())
    }
}

/// Read all records from a results file; an absent file is an empty run.
pub fn read_records(path: &Path) -> Result<Vec<ResultRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| Error::MalformedRecord {
            path: path.display().to_string(),
            line: index + 1,
            detail: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}
