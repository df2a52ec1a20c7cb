//! Accord Batch Runner
//!
//! Drives many independent entity negotiations against a shared catalog and
//! constraint spec, with bounded concurrency and an append-only result log.
//!
//! # Resumable Runs
//!
//! Every completed entity is appended to `results.jsonl` in the per-run
//! directory the moment it finishes. Re-running with the same run id skips
//! entities already present in the log and never rewrites prior bytes, so a
//! batch can be interrupted and resumed at any point. This idempotent-resume
//! guarantee is a contract, not an optimization: two runs over unchanged
//! inputs produce an identical log.
//!
//! # Concurrency
//!
//! Entities are embarrassingly parallel - a semaphore bounds how many
//! negotiate at once (sized to the generative backend's rate limits) - but
//! rounds within one entity are strictly sequential, because each round's
//! mediator context depends on the previous round's verification feedback.

mod config;
mod dataset;
mod error;
mod log;
mod manifest;
mod runner;
mod summary;

pub use config::RunConfig;
pub use dataset::{load_catalog, load_windows};
pub use error::{Error, Result};
pub use log::{read_records, ResultLog, ResultRecord, RESULTS_FILE};
pub use manifest::{RunManifest, MANIFEST_FILE};
pub use runner::BatchRunner;
pub use summary::{RunSummary, SUMMARY_FILE};

/// Install the default tracing subscriber, honoring `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "accord=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
