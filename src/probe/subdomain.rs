//! Subdomain discovery probe (DNS phase).
//!
//! Resolves `{candidate}.{domain}` for A records with a short timeout and no
//! retries. A name that resolves is a hit; NXDOMAIN or an empty answer is a
//! definite miss; anything else is a DNS failure.
//!
//! HTTP reachability is checked in a separate pass, see [`super::verify`].

use super::{Hit, Probe};
use crate::error::{ProbeError, ProbeResult};
use crate::types::{Candidate, Domain};
use async_trait::async_trait;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use trust_dns_resolver::config::{LookupIpStrategy, ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::ResolveErrorKind;
use trust_dns_resolver::TokioAsyncResolver;

/// Default DNS query timeout.
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_secs(2);

/// Name resolution seam, so the probe can be tested without a network.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolve IPv4 addresses for `host`. An empty list means the name does
    /// not exist or has no A records.
    async fn lookup_ipv4(&self, host: &str) -> ProbeResult<Vec<IpAddr>>;
}

/// Resolver backed by trust-dns.
pub struct DnsResolver {
    inner: TokioAsyncResolver,
}

impl DnsResolver {
    /// Create a resolver with the given per-query timeout and no retries.
    pub fn new(timeout: Duration) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 0;
        opts.ip_strategy = LookupIpStrategy::Ipv4Only;

        Self {
            inner: TokioAsyncResolver::tokio(ResolverConfig::default(), opts),
        }
    }
}

impl Default for DnsResolver {
    fn default() -> Self {
        Self::new(DEFAULT_DNS_TIMEOUT)
    }
}

#[async_trait]
impl HostResolver for DnsResolver {
    async fn lookup_ipv4(&self, host: &str) -> ProbeResult<Vec<IpAddr>> {
        match self.inner.lookup_ip(host).await {
            Ok(lookup) => Ok(lookup.iter().filter(IpAddr::is_ipv4).collect()),
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => Ok(Vec::new()),
                ResolveErrorKind::Timeout => Err(ProbeError::Timeout),
                _ => Err(ProbeError::Dns(e.to_string())),
            },
        }
    }
}

/// Probes host labels under a fixed domain.
pub struct SubdomainProbe {
    domain: Domain,
    resolver: Arc<dyn HostResolver>,
}

impl SubdomainProbe {
    /// Create a subdomain probe using the given resolver.
    pub fn new(domain: Domain, resolver: Arc<dyn HostResolver>) -> Self {
        Self { domain, resolver }
    }
}

#[async_trait]
impl Probe for SubdomainProbe {
    fn name(&self) -> &'static str {
        "dns"
    }

    async fn probe(&self, candidate: &Candidate) -> ProbeResult<Option<Hit>> {
        let host = self.domain.subdomain(candidate.as_str());
        let addresses = self.resolver.lookup_ipv4(&host).await?;

        if addresses.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Hit::resolved(candidate.as_str(), host, addresses)))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_resolver {
    use super::*;
    use std::collections::HashMap;

    /// Resolver answering from a fixed table; unknown names are NXDOMAIN.
    #[derive(Default)]
    pub struct StaticResolver {
        pub records: HashMap<String, Vec<IpAddr>>,
        pub failing: HashMap<String, ProbeError>,
    }

    impl StaticResolver {
        pub fn with(mut self, host: &str, ip: &str) -> Self {
            self.records
                .entry(host.to_string())
                .or_default()
                .push(ip.parse().unwrap());
            self
        }

        pub fn failing(mut self, host: &str, err: ProbeError) -> Self {
            self.failing.insert(host.to_string(), err);
            self
        }
    }

    #[async_trait]
    impl HostResolver for StaticResolver {
        async fn lookup_ipv4(&self, host: &str) -> ProbeResult<Vec<IpAddr>> {
            if let Some(err) = self.failing.get(host) {
                return Err(err.clone());
            }
            Ok(self.records.get(host).cloned().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_resolver::StaticResolver;
    use super::*;

    fn probe(resolver: StaticResolver) -> SubdomainProbe {
        SubdomainProbe::new(Domain::parse("example.com").unwrap(), Arc::new(resolver))
    }

    #[tokio::test]
    async fn test_resolved_label_is_hit() {
        let probe = probe(StaticResolver::default().with("www.example.com", "93.184.216.34"));

        let hit = probe.probe(&Candidate::new("www")).await.unwrap().unwrap();
        assert_eq!(hit.target, "www");
        assert_eq!(hit.resolved_url, "www.example.com");
        assert_eq!(hit.addresses.len(), 1);
        assert!(hit.status_code.is_none());
    }

    #[tokio::test]
    async fn test_nxdomain_is_miss() {
        let probe = probe(StaticResolver::default());
        assert!(probe
            .probe(&Candidate::new("doesnotexist123"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_resolver_failure_propagates() {
        let probe = probe(
            StaticResolver::default()
                .failing("mail.example.com", ProbeError::Dns("SERVFAIL".into())),
        );
        let err = probe.probe(&Candidate::new("mail")).await.unwrap_err();
        assert_eq!(err, ProbeError::Dns("SERVFAIL".into()));
    }
}
