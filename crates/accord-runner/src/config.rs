//! Run configuration.
//!
//! One immutable value constructed up front - from code or a JSON file -
//! and passed by reference into every component. The ablation switches
//! (verifier bypass, single-round negotiation) are plain fields here, not
//! environment flags.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use accord_negotiate::{NegotiationConfig, RetryPolicy};
use accord_slate::ConstraintSpec;

use crate::error::{Error, Result};

/// Configuration for one batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Identifier for the run; also the output directory name.
    pub run_id: String,
    /// Method label used in the output path, separating runs of different
    /// pipeline variants over the same run id.
    #[serde(default = "default_method")]
    pub method: String,
    /// Target slate size N.
    #[serde(default = "default_slate_size")]
    pub slate_size: usize,
    /// Candidate window size W.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Mediation round budget per entity. Set to 1 for the no-negotiation
    /// ablation.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
    /// Verifier gating. Set to false for the trust-the-mediator ablation.
    #[serde(default = "default_true")]
    pub enforce_verifier: bool,
    /// How many entities negotiate concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Attempts per agent call, including the first.
    #[serde(default = "default_retry_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff base delay in milliseconds.
    #[serde(default = "default_retry_base_ms")]
    pub retry_base_delay_ms: u64,
    /// Backoff cap in milliseconds.
    #[serde(default = "default_retry_max_ms")]
    pub retry_max_delay_ms: u64,
    /// The constraint spec enforced by the verifier.
    #[serde(default)]
    pub constraints: ConstraintSpec,
}

fn default_method() -> String {
    "accord".to_string()
}
fn default_slate_size() -> usize {
    10
}
fn default_window_size() -> usize {
    100
}
fn default_max_rounds() -> u32 {
    3
}
fn default_true() -> bool {
    true
}
fn default_concurrency() -> usize {
    4
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_base_ms() -> u64 {
    2_000
}
fn default_retry_max_ms() -> u64 {
    10_000
}

impl RunConfig {
    /// A config with the given run id and defaults everywhere else.
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            method: default_method(),
            slate_size: default_slate_size(),
            window_size: default_window_size(),
            max_rounds: default_max_rounds(),
            enforce_verifier: true,
            concurrency: default_concurrency(),
            retry_max_attempts: default_retry_attempts(),
            retry_base_delay_ms: default_retry_base_ms(),
            retry_max_delay_ms: default_retry_max_ms(),
            constraints: ConstraintSpec::default(),
        }
    }

    /// Load and validate a config from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the constraint spec.
    #[must_use]
    pub fn with_constraints(mut self, constraints: ConstraintSpec) -> Self {
        self.constraints = constraints;
        self
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.run_id.is_empty() {
            return Err(Error::Config("run_id must not be empty".into()));
        }
        if self.slate_size == 0 {
            return Err(Error::Config("slate_size must be at least 1".into()));
        }
        if self.window_size < self.slate_size {
            return Err(Error::Config(
                "window_size must be at least slate_size".into(),
            ));
        }
        if self.max_rounds == 0 {
            return Err(Error::Config("max_rounds must be at least 1".into()));
        }
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".into()));
        }
        if self.retry_max_attempts == 0 {
            return Err(Error::Config(
                "retry_max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The retry policy for agent calls.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            max_delay: Duration::from_millis(self.retry_max_delay_ms),
        }
    }

    /// The per-entity negotiation configuration.
    #[must_use]
    pub fn negotiation_config(&self) -> NegotiationConfig {
        let config = NegotiationConfig::default()
            .with_slate_size(self.slate_size)
            .with_window_size(self.window_size)
            .with_max_rounds(self.max_rounds)
            .with_retry(self.retry_policy());
        if self.enforce_verifier {
            config
        } else {
            config.without_verifier_enforcement()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_fills_defaults() {
        let config: RunConfig = serde_json::from_str(r#"{"run_id": "r1"}"#).unwrap();
        assert_eq!(config.run_id, "r1");
        assert_eq!(config.method, "accord");
        assert_eq!(config.slate_size, 10);
        assert_eq!(config.window_size, 100);
        assert_eq!(config.max_rounds, 3);
        assert!(config.enforce_verifier);
        assert_eq!(config.concurrency, 4);
        config.validate().unwrap();
    }

    #[test]
    fn validation_rejects_degenerate_values() {
        let mut config = RunConfig::new("r1");
        config.concurrency = 0;
        assert!(config.validate().is_err());

        let mut config = RunConfig::new("r1");
        config.window_size = 5;
        config.slate_size = 10;
        assert!(config.validate().is_err());

        let config = RunConfig::new("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn negotiation_config_maps_fields() {
        let mut config = RunConfig::new("r1");
        config.slate_size = 5;
        config.max_rounds = 7;
        config.enforce_verifier = false;
        config.retry_max_attempts = 2;

        let negotiation = config.negotiation_config();
        assert_eq!(negotiation.slate_size, 5);
        assert_eq!(negotiation.max_rounds, 7);
        assert!(!negotiation.enforce_verifier);
        assert_eq!(negotiation.retry.max_attempts, 2);
    }

    #[test]
    fn constraints_parse_inline() {
        let config: RunConfig = serde_json::from_str(
            r#"{
                "run_id": "r1",
                "constraints": {
                    "popularity": {"max_head_in_slate": 3, "min_tail_in_slate": 2},
                    "diversity": {"min_unique_genres_in_slate": 4}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.constraints.popularity.max_head_in_slate, Some(3));
        assert_eq!(config.constraints.diversity.min_unique_genres_in_slate, Some(4));
        assert!(config.constraints.safety.no_duplicates);
    }
}
