//! Result aggregation.
//!
//! Outcomes arrive in completion order. The aggregator keeps the accepted
//! hits together with their input position and sorts them once at the end,
//! so the final list does not depend on which probe happened to finish first.

use super::controller::{RunStats, StopReason};
use super::executor::Completed;
use crate::error::ErrorKind;
use crate::probe::{Hit, ProbeOutcome};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Status codes accepted by default for path discovery.
pub const DEFAULT_VALID_STATUSES: [u16; 8] = [200, 201, 204, 301, 302, 307, 401, 403];

/// Decides which hits count as discoveries. Configured once per scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum AcceptancePredicate {
    /// Every hit is a discovery.
    Any,
    /// Hits whose HTTP status is in the set.
    StatusIn(BTreeSet<u16>),
    /// Hits whose HTTP status is below the ceiling.
    StatusBelow(u16),
}

impl AcceptancePredicate {
    /// Accept the given status codes.
    pub fn statuses(codes: impl IntoIterator<Item = u16>) -> Self {
        Self::StatusIn(codes.into_iter().collect())
    }

    /// Whether `hit` counts as a discovery.
    pub fn accepts(&self, hit: &Hit) -> bool {
        match self {
            Self::Any => true,
            Self::StatusIn(codes) => hit.status_code.is_some_and(|s| codes.contains(&s)),
            Self::StatusBelow(ceiling) => hit.status_code.is_some_and(|s| s < *ceiling),
        }
    }
}

impl Default for AcceptancePredicate {
    fn default() -> Self {
        Self::statuses(DEFAULT_VALID_STATUSES)
    }
}

/// Outcome counters for a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub admitted: usize,
    pub completed: usize,
    pub found: usize,
    pub not_found: usize,
    pub errored: usize,
    pub abandoned: usize,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors_by_kind: BTreeMap<ErrorKind, usize>,
}

/// The final, immutable result of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub target_description: String,
    pub total_candidates: usize,
    /// Accepted hits, by ascending status code then input order.
    pub accepted: Vec<Hit>,
    pub stats: ScanStats,
    pub stop_reason: StopReason,
    pub duration_ms: u64,
}

impl ScanResult {
    /// Whether the scan stopped before every candidate was admitted.
    pub fn is_partial(&self) -> bool {
        self.stop_reason.is_partial()
    }
}

/// Collects outcomes for one scan. Owns the result buffer exclusively.
#[derive(Debug)]
pub struct Aggregator {
    predicate: AcceptancePredicate,
    accepted: Vec<(usize, Hit)>,
    stats: ScanStats,
}

impl Aggregator {
    /// Create an aggregator applying `predicate` to every hit.
    pub fn new(predicate: AcceptancePredicate) -> Self {
        Self {
            predicate,
            accepted: Vec::new(),
            stats: ScanStats::default(),
        }
    }

    /// Record one finished probe. Returns the hit if it was accepted.
    pub fn record(&mut self, completed: Completed) -> Option<&Hit> {
        self.stats.completed += 1;
        match completed.outcome {
            ProbeOutcome::Found(hit) => {
                self.stats.found += 1;
                if self.predicate.accepts(&hit) {
                    self.accepted.push((completed.index, hit));
                    return self.accepted.last().map(|(_, hit)| hit);
                }
            }
            ProbeOutcome::NotFound { .. } => self.stats.not_found += 1,
            ProbeOutcome::Errored { error_kind, .. } => {
                self.stats.errored += 1;
                *self.stats.errors_by_kind.entry(error_kind).or_insert(0) += 1;
            }
        }
        None
    }

    /// Sort and seal the result.
    pub fn finish(mut self, target: impl Into<String>, run: &RunStats, elapsed: Duration) -> ScanResult {
        self.accepted
            .sort_by_key(|(index, hit)| (hit.status_code.is_none(), hit.status_code, *index));

        self.stats.admitted = run.admitted;
        self.stats.abandoned = run.abandoned;

        ScanResult {
            target_description: target.into(),
            total_candidates: run.total,
            accepted: self.accepted.into_iter().map(|(_, hit)| hit).collect(),
            stats: self.stats,
            stop_reason: run.stop_reason,
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn found(index: usize, target: &str, status: u16) -> Completed {
        Completed {
            index,
            outcome: ProbeOutcome::Found(Hit::http(target, format!("http://t/{}", target), status, 0)),
            elapsed: Duration::ZERO,
        }
    }

    fn run_stats(total: usize) -> RunStats {
        RunStats {
            total,
            admitted: total,
            completed: total,
            abandoned: 0,
            stop_reason: StopReason::Completed,
        }
    }

    fn aggregate(outcomes: Vec<Completed>) -> ScanResult {
        let total = outcomes.len();
        let mut aggregator = Aggregator::new(AcceptancePredicate::default());
        for outcome in outcomes {
            aggregator.record(outcome);
        }
        aggregator.finish("http://t/", &run_stats(total), Duration::ZERO)
    }

    fn sample() -> Vec<Completed> {
        vec![
            found(0, "login", 302),
            found(1, "admin", 200),
            found(2, "missing", 404),
            found(3, "secret", 403),
            found(4, "index", 200),
            Completed {
                index: 5,
                outcome: ProbeOutcome::Errored {
                    target: "slow".into(),
                    error_kind: ErrorKind::Timeout,
                },
                elapsed: Duration::ZERO,
            },
            Completed {
                index: 6,
                outcome: ProbeOutcome::NotFound {
                    target: "gone".into(),
                },
                elapsed: Duration::ZERO,
            },
        ]
    }

    #[test]
    fn test_predicate_rules() {
        let hit = Hit::http("a", "u", 403, 0);
        assert!(AcceptancePredicate::default().accepts(&hit));
        assert!(!AcceptancePredicate::statuses([200]).accepts(&hit));
        assert!(AcceptancePredicate::StatusBelow(500).accepts(&hit));
        assert!(AcceptancePredicate::Any.accepts(&Hit::resolved("www", "www.x.com", vec![])));
        assert!(!AcceptancePredicate::StatusBelow(500).accepts(&Hit::resolved("www", "www.x.com", vec![])));
    }

    #[test]
    fn test_sorted_by_status_then_input_order() {
        let result = aggregate(sample());
        let order: Vec<(&str, Option<u16>)> = result
            .accepted
            .iter()
            .map(|h| (h.target.as_str(), h.status_code))
            .collect();
        assert_eq!(
            order,
            vec![
                ("admin", Some(200)),
                ("index", Some(200)),
                ("login", Some(302)),
                ("secret", Some(403)),
            ]
        );
    }

    #[test]
    fn test_order_independent_of_arrival() {
        let expected = aggregate(sample()).accepted;

        let mut reversed = sample();
        reversed.reverse();
        assert_eq!(aggregate(reversed).accepted, expected);

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let mut shuffled = sample();
            shuffled.shuffle(&mut rng);
            assert_eq!(aggregate(shuffled).accepted, expected);
        }
    }

    #[test]
    fn test_counts_every_outcome() {
        let result = aggregate(sample());
        assert_eq!(result.total_candidates, 7);
        assert_eq!(result.stats.completed, 7);
        assert_eq!(result.stats.found, 5);
        assert_eq!(result.stats.not_found, 1);
        assert_eq!(result.stats.errored, 1);
        assert_eq!(result.stats.errors_by_kind.get(&ErrorKind::Timeout), Some(&1));
    }

    #[test]
    fn test_record_returns_accepted_hit() {
        let mut aggregator = Aggregator::new(AcceptancePredicate::default());
        assert!(aggregator.record(found(0, "admin", 200)).is_some());
        assert!(aggregator.record(found(1, "missing", 404)).is_none());
        let result = aggregator.finish("t", &run_stats(2), Duration::ZERO);
        assert_eq!(result.accepted.len(), 1);
    }

    #[test]
    fn test_dns_only_hits_sort_by_input_order() {
        let mut aggregator = Aggregator::new(AcceptancePredicate::Any);
        for (index, label) in [(2, "mail"), (0, "www"), (1, "api")] {
            aggregator.record(Completed {
                index,
                outcome: ProbeOutcome::Found(Hit::resolved(label, format!("{}.x.com", label), vec![])),
                elapsed: Duration::ZERO,
            });
        }
        let result = aggregator.finish("x.com", &run_stats(3), Duration::ZERO);
        let labels: Vec<&str> = result.accepted.iter().map(|h| h.target.as_str()).collect();
        assert_eq!(labels, vec!["www", "api", "mail"]);
    }
}
