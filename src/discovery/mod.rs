//! Discovery tools built on the probing engine.
//!
//! Each tool validates its target, loads a wordlist, picks a probe strategy
//! and acceptance rule, and runs the engine. Target validation is the only
//! failure that stops a tool before probing.

pub mod directories;
pub mod subdomains;

use crate::engine::{ProgressReporter, SilentReporter};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use directories::DirectoryScan;
pub use subdomains::{SubdomainReport, SubdomainScan};

/// Which discovery tool produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanKind {
    Directory,
    Subdomain,
}

impl fmt::Display for ScanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::Subdomain => write!(f, "subdomain"),
        }
    }
}

/// Builds a progress reporter for a pass of `total` candidates labelled `phase`.
pub type ReporterFactory<'a> = &'a (dyn Fn(usize, &'static str) -> Box<dyn ProgressReporter> + Sync);

/// Factory producing [`SilentReporter`]s.
pub fn silent(_total: usize, _phase: &'static str) -> Box<dyn ProgressReporter> {
    Box::new(SilentReporter)
}
