//! Bounded retry with exponential backoff for agent calls.
//!
//! The policy is an explicit value passed into the orchestrator, not a
//! decorator hidden on the client: tests inject [`RetryPolicy::none`] and
//! get fully deterministic behavior. Every [`AgentError`] is considered
//! retryable - transient service failures and schema mismatches alike, since
//! a regenerated payload may well parse - and the final failure is rewrapped
//! as [`AgentError::Exhausted`].

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::agent::AgentError;

/// Retry policy for a single agent operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Clamped to at least 1.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt with no delays.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Set the total number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Delay before the attempt following `attempt` (1-based):
    /// `base * 2^(attempt-1)`, capped at `max_delay`.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds or the attempt budget is spent.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, AgentError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AgentError>>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < attempts => {
                    let delay = self.delay_after(attempt);
                    warn!(attempt, delay_ms = delay.as_millis() as u64, error = %error,
                        "agent call failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    return Err(AgentError::Exhausted {
                        attempts,
                        source: Box::new(error),
                    })
                }
            }
        }
    }
}
