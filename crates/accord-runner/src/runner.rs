//! The batch driver: bounded-concurrency negotiation over many entities.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info};

use accord_negotiate::{GenerativeAgent, Negotiator};
use accord_slate::{Catalog, CandidateWindow};

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::log::{ResultLog, ResultRecord};
use crate::manifest::RunManifest;
use crate::summary::RunSummary;

/// Runs one method over a batch of entities, persisting each result as it
/// lands.
///
/// Entities negotiate concurrently up to the configured limit; rounds within
/// an entity stay sequential inside the [`Negotiator`]. Shared inputs - the
/// catalog and the constraint spec - are read-only and need no locking; the
/// result log is the only shared mutable state and is append-only.
pub struct BatchRunner<A> {
    config: RunConfig,
    catalog: Arc<Catalog>,
    agent: Arc<A>,
}

impl<A: GenerativeAgent + 'static> BatchRunner<A> {
    /// Create a runner over a validated configuration.
    pub fn new(config: RunConfig, catalog: Catalog, agent: A) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            agent: Arc::new(agent),
        })
    }

    /// The run directory for this config under `output_dir`:
    /// `<output_dir>/<run_id>/runs/<method>`.
    #[must_use]
    pub fn run_dir(&self, output_dir: &Path) -> PathBuf {
        output_dir
            .join(&self.config.run_id)
            .join("runs")
            .join(&self.config.method)
    }

    /// Negotiate every pending entity and return the aggregated summary.
    ///
    /// Entities already present in the run's result log are skipped, which
    /// makes interrupted runs resumable: call `run` again with the same
    /// inputs and only the remainder is processed. Every processed entity
    /// appends exactly one record; none are dropped.
    pub async fn run(
        &self,
        output_dir: &Path,
        windows: Vec<(u64, CandidateWindow)>,
    ) -> Result<RunSummary> {
        let run_dir = self.run_dir(output_dir);
        RunManifest::write_if_absent(&run_dir, &self.config)?;

        let log = ResultLog::open(&run_dir)?;
        let done = log.completed_entities()?;
        let total = windows.len();
        let pending: Vec<(u64, CandidateWindow)> = windows
            .into_iter()
            .filter(|(entity_id, _)| !done.contains(entity_id))
            .collect();
        info!(
            run_id = %self.config.run_id,
            method = %self.config.method,
            total,
            already_done = done.len(),
            pending = pending.len(),
            "starting batch run"
        );

        let log = Arc::new(Mutex::new(log));
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let negotiator = Arc::new(Negotiator::new(self.config.negotiation_config()));
        let run_id = Arc::new(self.config.run_id.clone());
        let spec = self.config.constraints;

        let mut tasks = JoinSet::new();
        for (entity_id, window) in pending {
            let semaphore = Arc::clone(&semaphore);
            let negotiator = Arc::clone(&negotiator);
            let catalog = Arc::clone(&self.catalog);
            let agent = Arc::clone(&self.agent);
            let log = Arc::clone(&log);
            let run_id = Arc::clone(&run_id);

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::Worker(e.to_string()))?;

                let started = Instant::now();
                let record = negotiator
                    .negotiate(entity_id, &run_id, &window, &catalog, &spec, agent.as_ref())
                    .await?;
                let timing_ms = started.elapsed().as_millis() as u64;
                debug!(
                    entity_id,
                    outcome = record.outcome.kind(),
                    timing_ms,
                    "entity finished"
                );

                let row = ResultRecord::from_negotiation(entity_id, record, timing_ms);
                log.lock().await.append(&row)?;
                Ok::<(), Error>(())
            });
        }

        while let Some(joined) = tasks.join_next().await {
            joined.map_err(|e| Error::Worker(e.to_string()))??;
        }

        let records = log.lock().await.read_existing()?;
        let summary = RunSummary::from_records(&records);
        summary.write(&run_dir)?;
        info!(
            success = summary.success,
            infeasible = summary.infeasible,
            agent_failure = summary.agent_failure,
            repaired = summary.repaired,
            "batch run complete"
        );
        Ok(summary)
    }
}
