//! Subdomain discovery: a DNS pass, then an optional HTTP verification pass.
//!
//! The verification pass only sees names the DNS pass found and runs with its
//! own, smaller concurrency budget. A name that fails verification stays in
//! the DNS result; verification never demotes a discovery. An interrupted
//! verification pass is reported through [`SubdomainReport::verification`].

use super::ReporterFactory;
use crate::config::AppSettings;
use crate::engine::{AcceptancePredicate, CancelSignal, Engine, EngineOptions, ScanResult, StopReason};
use crate::error::{EngineError, EngineResult};
use crate::probe::subdomain::DEFAULT_DNS_TIMEOUT;
use crate::probe::verify::DEFAULT_STATUS_CEILING;
use crate::probe::{
    DnsResolver, Hit, HostResolver, HttpSettings, HttpVerifyProbe, Probe, ProbeStrategy, SubdomainProbe,
};
use crate::types::{Candidate, Domain};
use crate::wordlist::{Wordlist, WordlistKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// DNS results plus the subset that answered over HTTP(S).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdomainReport {
    pub scan: ScanResult,
    /// Verified hosts, with the URL and status that answered.
    #[serde(default)]
    pub verified: Vec<Hit>,
    /// How the verification pass ended; `None` when it did not run.
    #[serde(default)]
    pub verification: Option<StopReason>,
}

/// A configured subdomain scan.
#[derive(Clone)]
pub struct SubdomainScan {
    pub domain: String,
    pub wordlist: Option<PathBuf>,
    pub bundled_dir: Option<PathBuf>,
    pub options: EngineOptions,
    pub dns_timeout: Duration,
    pub verify: bool,
    pub verify_http: HttpSettings,
    pub verify_concurrency: usize,
    pub verify_ceiling: u16,
    resolver: Option<Arc<dyn HostResolver>>,
}

impl SubdomainScan {
    /// A scan of `domain` with built-in defaults.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            wordlist: None,
            bundled_dir: None,
            options: EngineOptions::default(),
            dns_timeout: DEFAULT_DNS_TIMEOUT,
            verify: true,
            verify_http: HttpSettings {
                timeout: Duration::from_secs(5),
                ..HttpSettings::default()
            },
            verify_concurrency: 10,
            verify_ceiling: DEFAULT_STATUS_CEILING,
            resolver: None,
        }
    }

    /// A scan of `domain` configured from application settings.
    pub fn from_settings(domain: impl Into<String>, settings: &AppSettings) -> Self {
        Self {
            options: settings.engine_options(),
            dns_timeout: settings.dns_timeout(),
            verify_http: settings.verify_http(),
            verify_concurrency: settings.verify_concurrency,
            verify_ceiling: settings.verify_status_ceiling,
            ..Self::new(domain)
        }
    }

    pub fn with_wordlist(mut self, path: Option<PathBuf>) -> Self {
        self.wordlist = path;
        self
    }

    pub fn with_bundled_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.bundled_dir = dir;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Resolve through `resolver` instead of the system DNS configuration.
    pub fn with_resolver(mut self, resolver: Arc<dyn HostResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// The labels this scan will probe, in order.
    pub fn candidates(&self) -> Wordlist {
        Wordlist::load_or_default(
            self.wordlist.as_deref(),
            WordlistKind::Subdomains,
            self.bundled_dir.as_deref(),
        )
    }

    /// Validate the domain, run the DNS pass and, if enabled, verification.
    pub async fn run(&self, cancel: &CancelSignal, reporters: ReporterFactory<'_>) -> EngineResult<SubdomainReport> {
        let domain = Domain::parse(&self.domain)?;
        let engine = Engine::new(self.options.clone().with_timeout(self.dns_timeout + Duration::from_secs(1)))?;
        let wordlist = self.candidates();
        if wordlist.is_empty() {
            return Err(EngineError::EmptyWordlist);
        }
        info!(domain = %domain, labels = wordlist.len(), "subdomain scan");

        let resolver = match &self.resolver {
            Some(resolver) => Arc::clone(resolver),
            None => Arc::new(DnsResolver::new(self.dns_timeout)),
        };
        let target = domain.to_string();
        let probe = ProbeStrategy::from(SubdomainProbe::new(domain, resolver));
        let reporter = reporters(wordlist.len(), "dns");
        let scan = engine
            .scan(
                &target,
                wordlist.as_slice(),
                &probe,
                &AcceptancePredicate::Any,
                cancel,
                reporter.as_ref(),
            )
            .await;

        let mut report = SubdomainReport {
            scan,
            verified: Vec::new(),
            verification: None,
        };
        if self.verify && !report.scan.accepted.is_empty() && !report.scan.is_partial() {
            let probe = ProbeStrategy::from(HttpVerifyProbe::new(self.verify_http.clone(), self.verify_ceiling)?);
            let pass = self.verify_hosts(&report.scan.accepted, &probe, cancel, reporters).await?;
            report.verification = Some(pass.stop_reason);
            report.verified = pass.accepted;
        }

        Ok(report)
    }

    /// Check each resolved host over HTTP(S). The accepted hits are the hosts
    /// that answered.
    pub async fn verify_hosts<P>(
        &self,
        found: &[Hit],
        probe: &P,
        cancel: &CancelSignal,
        reporters: ReporterFactory<'_>,
    ) -> EngineResult<ScanResult>
    where
        P: Probe + ?Sized,
    {
        let hosts: Vec<Candidate> = found.iter().map(|h| Candidate::new(&h.resolved_url)).collect();
        // Two schemes are tried per host.
        let options = self
            .options
            .clone()
            .with_concurrency(self.verify_concurrency)
            .with_timeout(self.verify_http.timeout * 2)
            .with_deadline(None);
        let engine = Engine::new(options)?;

        info!(hosts = hosts.len(), "verifying subdomains over HTTP");
        let reporter = reporters(hosts.len(), "verify");
        Ok(engine
            .scan(
                "http verification",
                &hosts,
                probe,
                &AcceptancePredicate::StatusBelow(self.verify_ceiling),
                cancel,
                reporter.as_ref(),
            )
            .await)
    }
}
