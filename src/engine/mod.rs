//! Probing engine - runs one probe per candidate with bounded concurrency.
//!
//! Data flows one way:
//!
//! ```text
//! candidates ─▶ Controller ─▶ Executor (per probe, timed out) ─▶ Aggregator ─▶ ScanResult
//!                   ▲
//!             CancelSignal
//! ```
//!
//! Every scan owns its own controller state and aggregator; nothing is shared
//! between scans.

pub mod aggregator;
pub mod cancel;
pub mod controller;
pub mod executor;
pub mod progress;
pub mod rate_limiter;

use crate::error::{EngineError, EngineResult};
use crate::probe::Probe;
use crate::types::Candidate;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

pub use aggregator::{AcceptancePredicate, Aggregator, ScanResult, ScanStats, DEFAULT_VALID_STATUSES};
pub use cancel::CancelSignal;
pub use controller::{Controller, RunStats, StopReason};
pub use executor::{Completed, Executor};
pub use progress::{BarReporter, ProgressReporter, SilentReporter};
pub use rate_limiter::RateLimiter;

/// Tuning for one engine.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Maximum probes in flight.
    pub concurrency: usize,
    /// Hard limit on each probe.
    pub probe_timeout: Duration,
    /// Abandon in-flight probes this long after cancellation (`None` drains).
    pub grace: Option<Duration>,
    /// Stop admitting candidates after this long.
    pub deadline: Option<Duration>,
    /// Probe starts per second, 0 for unlimited.
    pub rate_limit: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            concurrency: 50,
            probe_timeout: Duration::from_secs(10),
            grace: None,
            deadline: None,
            rate_limit: 0,
        }
    }
}

impl EngineOptions {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_grace(mut self, grace: Option<Duration>) -> Self {
        self.grace = grace;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_rate_limit(mut self, rate: u32) -> Self {
        self.rate_limit = rate;
        self
    }
}

/// A configured engine. Cheap to reuse across scans.
#[derive(Debug, Clone)]
pub struct Engine {
    controller: Controller,
}

impl Engine {
    /// Validate options and build an engine.
    ///
    /// # Errors
    /// Fails with [`EngineError::InvalidConcurrency`] when `concurrency` is 0
    /// and [`EngineError::InvalidTimeout`] when `probe_timeout` is zero.
    pub fn new(options: EngineOptions) -> EngineResult<Self> {
        if options.probe_timeout.is_zero() {
            return Err(EngineError::InvalidTimeout);
        }

        let executor = Executor::new(options.probe_timeout)
            .with_rate_limiter(RateLimiter::per_second(options.rate_limit));
        let controller = Controller::new(options.concurrency, executor)?
            .with_grace(options.grace)
            .with_deadline(options.deadline);

        Ok(Self { controller })
    }

    /// Probe every candidate and return the accepted hits, sorted.
    ///
    /// Cancellation is not an error: a cancelled scan returns whatever
    /// completed, with [`ScanResult::stop_reason`] set accordingly.
    pub async fn scan<P>(
        &self,
        target: &str,
        candidates: &[Candidate],
        probe: &P,
        predicate: &AcceptancePredicate,
        cancel: &CancelSignal,
        reporter: &dyn ProgressReporter,
    ) -> ScanResult
    where
        P: Probe + ?Sized,
    {
        info!(
            target,
            probe = probe.name(),
            candidates = candidates.len(),
            concurrency = self.controller.limit(),
            "scan started"
        );

        let start = Instant::now();
        let mut aggregator = Aggregator::new(predicate.clone());
        let run = self
            .controller
            .run(candidates, probe, cancel, reporter, |completed| {
                if let Some(hit) = aggregator.record(completed) {
                    reporter.on_accept(&describe(hit));
                }
            })
            .await;

        let result = aggregator.finish(target, &run, start.elapsed());
        info!(
            target,
            accepted = result.accepted.len(),
            errored = result.stats.errored,
            stop_reason = %result.stop_reason,
            duration_ms = result.duration_ms,
            "scan finished"
        );
        result
    }
}

/// One-line description of a hit for progress output.
fn describe(hit: &crate::probe::Hit) -> String {
    match (hit.status_code, hit.byte_size) {
        (Some(status), Some(size)) => format!("[{}] {} ({} bytes)", status, hit.resolved_url, size),
        (Some(status), None) => format!("[{}] {}", status, hit.resolved_url),
        _ if !hit.addresses.is_empty() => {
            let addrs: Vec<String> = hit.addresses.iter().map(ToString::to_string).collect();
            format!("{} ({})", hit.resolved_url, addrs.join(", "))
        }
        _ => hit.resolved_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeResult;
    use crate::probe::subdomain::test_resolver::StaticResolver;
    use crate::probe::{Hit, SubdomainProbe};
    use crate::types::Domain;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Finds only a fixed set of names, each after a random delay.
    struct Jittered {
        present: Vec<&'static str>,
        delays: HashMap<String, Duration>,
    }

    #[async_trait]
    impl Probe for Jittered {
        fn name(&self) -> &'static str {
            "jittered"
        }

        async fn probe(&self, candidate: &Candidate) -> ProbeResult<Option<Hit>> {
            if let Some(delay) = self.delays.get(candidate.as_str()) {
                tokio::time::sleep(*delay).await;
            }
            if self.present.contains(&candidate.as_str()) {
                let url = format!("http://target/{}", candidate);
                Ok(Some(Hit::http(candidate.as_str(), url, 200, 0)))
            } else {
                Ok(None)
            }
        }
    }

    fn wordlist() -> Vec<Candidate> {
        let mut words: Vec<Candidate> = (0..98).map(|i| Candidate::new(format!("w{}", i))).collect();
        words.insert(40, Candidate::new("login"));
        words.insert(7, Candidate::new("admin"));
        words
    }

    #[test]
    fn test_rejects_invalid_options() {
        let zero = EngineOptions::default().with_concurrency(0);
        assert!(matches!(Engine::new(zero), Err(EngineError::InvalidConcurrency(0))));

        let no_timeout = EngineOptions::default().with_timeout(Duration::ZERO);
        assert!(matches!(Engine::new(no_timeout), Err(EngineError::InvalidTimeout)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_accepted_independent_of_completion_delays() {
        let candidates = wordlist();
        assert_eq!(candidates.len(), 100);
        let engine = Engine::new(EngineOptions::default().with_concurrency(10)).unwrap();

        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let probe = Jittered {
                present: vec!["admin", "login"],
                delays: candidates
                    .iter()
                    .map(|c| (c.to_string(), Duration::from_millis(rng.gen_range(0..200))))
                    .collect(),
            };

            let result = engine
                .scan(
                    "http://target/",
                    &candidates,
                    &probe,
                    &AcceptancePredicate::default(),
                    &CancelSignal::new(),
                    &SilentReporter,
                )
                .await;

            let accepted: Vec<(&str, Option<u16>)> = result
                .accepted
                .iter()
                .map(|h| (h.target.as_str(), h.status_code))
                .collect();
            assert_eq!(accepted, vec![("admin", Some(200)), ("login", Some(200))]);
            assert_eq!(result.total_candidates, 100);
            assert_eq!(result.stats.not_found, 98);
            assert_eq!(result.stop_reason, StopReason::Completed);
        }
    }

    #[tokio::test]
    async fn test_subdomain_scan_scenario() {
        let probe = SubdomainProbe::new(
            Domain::parse("example.com").unwrap(),
            Arc::new(StaticResolver::default().with("www.example.com", "93.184.216.34")),
        );
        let candidates = vec![Candidate::new("www"), Candidate::new("doesnotexist123")];
        let engine = Engine::new(EngineOptions::default()).unwrap();

        let result = engine
            .scan(
                "example.com",
                &candidates,
                &probe,
                &AcceptancePredicate::Any,
                &CancelSignal::new(),
                &SilentReporter,
            )
            .await;

        assert_eq!(result.total_candidates, 2);
        assert_eq!(result.accepted.len(), 1);
        assert_eq!(result.accepted[0].resolved_url, "www.example.com");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_scan_keeps_total_and_partial_hits() {
        let candidates = wordlist();
        let signal = CancelSignal::new();
        let probe = Jittered {
            present: vec!["admin", "login"],
            delays: HashMap::new(),
        };
        let engine = Engine::new(EngineOptions::default().with_concurrency(1)).unwrap();

        // Cancel as soon as "admin" (index 7) is accepted.
        struct CancelOnAccept(CancelSignal);
        impl ProgressReporter for CancelOnAccept {
            fn on_complete(&self, _done: usize, _total: usize) {}
            fn on_accept(&self, _description: &str) {
                self.0.cancel();
            }
        }

        let result = engine
            .scan(
                "http://target/",
                &candidates,
                &probe,
                &AcceptancePredicate::default(),
                &signal,
                &CancelOnAccept(signal.clone()),
            )
            .await;

        assert!(result.is_partial());
        assert_eq!(result.total_candidates, 100);
        assert_eq!(result.stats.admitted, 8);
        assert_eq!(result.accepted.len(), 1);
        assert_eq!(result.accepted[0].target, "admin");
    }

    #[test]
    fn test_describe_hit() {
        let hit = Hit::http("admin", "http://t/admin", 200, 12);
        assert_eq!(describe(&hit), "[200] http://t/admin (12 bytes)");

        let hit = Hit::resolved("www", "www.x.com", vec!["10.0.0.1".parse().unwrap()]);
        assert_eq!(describe(&hit), "www.x.com (10.0.0.1)");
    }
}
