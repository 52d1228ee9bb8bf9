//! # VOIDEX - Concurrent Directory and Subdomain Discovery
//!
//! VOIDEX probes a target with one network check per wordlist entry,
//! keeping a fixed number of checks in flight, and reports the hits in a
//! deterministic order no matter which checks finished first.
//!
//! ## Features
//!
//! - **Bounded concurrency**: a semaphore-gated scheduler admits candidates
//!   in input order and hands outcomes back as they complete
//! - **Failure isolation**: every probe has a hard timeout; timeouts,
//!   connection failures and DNS errors are recorded, never fatal
//! - **Cancellation**: Ctrl-C stops admission and still returns partial results
//! - **Pluggable probes**: HTTP path probing, DNS subdomain resolution and
//!   HTTP(S) reachability checks behind one [`probe::Probe`] trait
//! - **Result persistence**: scan history and JSON/CSV export
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use voidex::discovery::{silent, DirectoryScan};
//! use voidex::engine::CancelSignal;
//!
//! #[tokio::main]
//! async fn main() {
//!     let scan = DirectoryScan::new("http://127.0.0.1:8080/");
//!     let result = scan.run(&CancelSignal::new(), &silent).await.unwrap();
//!
//!     for hit in &result.accepted {
//!         println!("[{:?}] {}", hit.status_code, hit.resolved_url);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Candidates, validated targets and scan IDs
//! - [`probe`] - Probe strategies and the `Probe` trait
//! - [`engine`] - Scheduler, executor, aggregator and cancellation
//! - [`discovery`] - Directory and subdomain tools built on the engine
//! - [`wordlist`] - Wordlist loading with built-in fallbacks
//! - [`config`] - Settings and XDG paths
//! - [`storage`] - Scan history and result sinks
//! - [`output`] - Plain, JSON and CSV formatting
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod output;
pub mod probe;
pub mod storage;
pub mod types;
pub mod wordlist;

// Re-export commonly used types
pub use engine::{AcceptancePredicate, CancelSignal, Engine, EngineOptions, ScanResult, StopReason};
pub use error::{CliError, EngineError, ErrorKind, ProbeError};
pub use probe::{Hit, Probe, ProbeOutcome, ProbeStrategy};
pub use types::{BaseUrl, Candidate, Domain, ScanId};
