//! Single-probe execution.
//!
//! Runs one probe under a hard timeout and folds every failure into a
//! [`ProbeOutcome`]. Nothing here returns an error to the caller.

use super::rate_limiter::RateLimiter;
use crate::error::ProbeError;
use crate::probe::{Probe, ProbeOutcome};
use crate::types::Candidate;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::debug;

/// A finished probe, tagged with the candidate's position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    /// Index of the candidate in the scan's input order.
    pub index: usize,
    pub outcome: ProbeOutcome,
    /// Wall time spent in the probe, excluding rate-limit waits.
    pub elapsed: Duration,
}

/// Executes probes with a per-probe timeout and optional rate limit.
#[derive(Debug, Clone)]
pub struct Executor {
    timeout: Duration,
    rate_limiter: Option<RateLimiter>,
}

impl Executor {
    /// Create an executor with the given per-probe timeout.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            rate_limiter: None,
        }
    }

    /// Gate probe starts on a shared rate limiter.
    pub fn with_rate_limiter(mut self, limiter: Option<RateLimiter>) -> Self {
        self.rate_limiter = limiter;
        self
    }

    /// Run `probe` against one candidate.
    pub async fn execute<P>(&self, probe: &P, index: usize, candidate: &Candidate) -> Completed
    where
        P: Probe + ?Sized,
    {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }

        let start = Instant::now();
        let result = match timeout(self.timeout, probe.probe(candidate)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout),
        };
        let elapsed = start.elapsed();

        let target = candidate.to_string();
        let outcome = match result {
            Ok(Some(hit)) => ProbeOutcome::Found(hit),
            Ok(None) => ProbeOutcome::NotFound { target },
            Err(e) => {
                debug!(probe = probe.name(), candidate = %candidate, error = %e, "probe failed");
                ProbeOutcome::Errored {
                    target,
                    error_kind: e.kind(),
                }
            }
        };

        Completed {
            index,
            outcome,
            elapsed,
        }
    }
}
