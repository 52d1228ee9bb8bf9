//! Bounded-concurrency scheduler.
//!
//! Admits candidates in input order while fewer than `limit` probes are in
//! flight, and hands each outcome to the caller as soon as it completes.
//! All probes run as futures on the calling task; they interleave only at
//! network I/O and timer waits.
//!
//! Admission stops for good once the cancel signal is raised or the optional
//! scan deadline passes. Probes already in flight are drained, or abandoned
//! after the grace period if one is configured.

use super::cancel::CancelSignal;
use super::executor::{Completed, Executor};
use super::progress::ProgressReporter;
use crate::error::{EngineError, EngineResult};
use crate::probe::Probe;
use crate::types::Candidate;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

/// Why the scan loop stopped admitting candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    /// Every candidate was admitted and none was abandoned.
    Completed,
    /// The cancel signal was raised.
    Cancelled,
    /// The scan deadline passed.
    Deadline,
}

impl StopReason {
    /// Whether the scan ended before admitting every candidate.
    pub fn is_partial(self) -> bool {
        !matches!(self, Self::Completed)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::Deadline => write!(f, "deadline reached"),
        }
    }
}

/// Counters for one run of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub admitted: usize,
    pub completed: usize,
    /// Probes still in flight when the grace period ran out.
    pub abandoned: usize,
    pub stop_reason: StopReason,
}

/// The concurrency controller.
#[derive(Debug, Clone)]
pub struct Controller {
    limit: usize,
    executor: Executor,
    grace: Option<Duration>,
    deadline: Option<Duration>,
}

impl Controller {
    /// Create a controller admitting at most `limit` probes at once.
    pub fn new(limit: usize, executor: Executor) -> EngineResult<Self> {
        if limit == 0 {
            return Err(EngineError::InvalidConcurrency(limit));
        }
        Ok(Self {
            limit,
            executor,
            grace: None,
            deadline: None,
        })
    }

    /// Abandon in-flight probes this long after admission stops.
    /// Without a grace period they are always drained.
    pub fn with_grace(mut self, grace: Option<Duration>) -> Self {
        self.grace = grace;
        self
    }

    /// Stop admitting new candidates this long after the run starts.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// The concurrency ceiling.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Probe every candidate, calling `on_outcome` once per finished probe in
    /// completion order.
    pub async fn run<P, F>(
        &self,
        candidates: &[Candidate],
        probe: &P,
        cancel: &CancelSignal,
        reporter: &dyn ProgressReporter,
        mut on_outcome: F,
    ) -> RunStats
    where
        P: Probe + ?Sized,
        F: FnMut(Completed),
    {
        let total = candidates.len();
        let semaphore = Arc::new(Semaphore::new(self.limit));
        let mut queue = candidates.iter().enumerate();
        let mut in_flight = FuturesUnordered::new();

        let deadline = self.deadline.map(|d| Instant::now() + d);
        let mut stop: Option<StopReason> = None;
        let mut abandon_at: Option<Instant> = None;
        let mut admitted = 0;
        let mut completed = 0;
        let mut abandoned = 0;

        loop {
            if stop.is_none() {
                if cancel.is_cancelled() {
                    stop = Some(StopReason::Cancelled);
                } else if deadline.is_some_and(|d| Instant::now() >= d) {
                    stop = Some(StopReason::Deadline);
                }
                if let Some(reason) = stop {
                    warn!(
                        %reason,
                        admitted,
                        in_flight = in_flight.len(),
                        "admission stopped"
                    );
                    abandon_at = self.grace.map(|g| Instant::now() + g);
                }
            } else if stop == Some(StopReason::Completed) && abandon_at.is_none() && cancel.is_cancelled() {
                // Cancelled after the last admission: the grace period still applies.
                abandon_at = self.grace.map(|g| Instant::now() + g);
            }

            // Admit while permits are free
            while stop.is_none() {
                let Ok(permit) = Arc::clone(&semaphore).try_acquire_owned() else {
                    break;
                };
                let Some((index, candidate)) = queue.next() else {
                    stop = Some(StopReason::Completed);
                    break;
                };
                admitted += 1;

                let executor = &self.executor;
                in_flight.push(async move {
                    let outcome = executor.execute(probe, index, candidate).await;
                    drop(permit);
                    outcome
                });
            }

            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                biased;

                Some(done) = in_flight.next() => {
                    completed += 1;
                    on_outcome(done);
                    reporter.on_complete(completed, total);
                }
                _ = cancel.cancelled(), if stop.is_none() || (abandon_at.is_none() && self.grace.is_some()) => {}
                _ = sleep_until_opt(deadline), if stop.is_none() && deadline.is_some() => {}
                _ = sleep_until_opt(abandon_at), if abandon_at.is_some() => {
                    abandoned = in_flight.len();
                    warn!(abandoned, "grace period elapsed, abandoning in-flight probes");
                    if stop == Some(StopReason::Completed) {
                        stop = Some(StopReason::Cancelled);
                    }
                    break;
                }
            }
        }

        reporter.finish();

        let stats = RunStats {
            total,
            admitted,
            completed,
            abandoned,
            stop_reason: stop.unwrap_or(StopReason::Completed),
        };
        debug!(?stats, "scheduler finished");
        stats
    }

    /// Run and collect every outcome, in completion order.
    pub async fn collect<P>(
        &self,
        candidates: &[Candidate],
        probe: &P,
        cancel: &CancelSignal,
        reporter: &dyn ProgressReporter,
    ) -> (Vec<Completed>, RunStats)
    where
        P: Probe + ?Sized,
    {
        let mut outcomes = Vec::with_capacity(candidates.len());
        let stats = self
            .run(candidates, probe, cancel, reporter, |c| outcomes.push(c))
            .await;
        (outcomes, stats)
    }
}

async fn sleep_until_opt(at: Option<Instant>) {
    match at {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
