//! Probe strategies.
//!
//! A probe decides whether one candidate is present on the target. The
//! engine only sees the [`Probe`] trait; [`ProbeStrategy`] is the closed set
//! of strategies the discovery tools use.
//!
//! | Strategy          | Network check                    | Redirects    |
//! |-------------------|----------------------------------|--------------|
//! | `PathProbe`       | one GET against `base/candidate` | not followed |
//! | `SubdomainProbe`  | one A-record lookup              | n/a          |
//! | `HttpVerifyProbe` | GET over https, then http        | followed     |

pub mod http;
pub mod path;
pub mod subdomain;
pub mod verify;

use crate::error::{ErrorKind, ProbeResult};
use crate::types::Candidate;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

pub use http::HttpSettings;
pub use path::PathProbe;
pub use subdomain::{DnsResolver, HostResolver, SubdomainProbe};
pub use verify::HttpVerifyProbe;

/// Evidence that a candidate is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    /// The candidate that was probed.
    pub target: String,
    /// URL or host name actually reached.
    pub resolved_url: String,
    /// HTTP status, when the probe made an HTTP request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Response body size in bytes, when the probe made an HTTP request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_size: Option<u64>,
    /// Addresses returned by DNS, when the probe resolved a name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<IpAddr>,
}

impl Hit {
    /// A hit backed by an HTTP response.
    pub fn http(
        target: impl Into<String>,
        resolved_url: impl Into<String>,
        status_code: u16,
        byte_size: u64,
    ) -> Self {
        Self {
            target: target.into(),
            resolved_url: resolved_url.into(),
            status_code: Some(status_code),
            byte_size: Some(byte_size),
            addresses: Vec::new(),
        }
    }

    /// A hit backed by DNS resolution only.
    pub fn resolved(
        target: impl Into<String>,
        host: impl Into<String>,
        addresses: Vec<IpAddr>,
    ) -> Self {
        Self {
            target: target.into(),
            resolved_url: host.into(),
            status_code: None,
            byte_size: None,
            addresses,
        }
    }
}

/// Outcome of one probe. Exactly one per admitted candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Found(Hit),
    NotFound { target: String },
    Errored { target: String, error_kind: ErrorKind },
}

impl ProbeOutcome {
    /// The candidate this outcome belongs to.
    pub fn target(&self) -> &str {
        match self {
            Self::Found(hit) => &hit.target,
            Self::NotFound { target } | Self::Errored { target, .. } => target,
        }
    }
}

/// Trait for probe implementations.
///
/// `Ok(Some(hit))` means found, `Ok(None)` means a definite negative, and
/// `Err` is a failure the executor records as `Errored`. Implementations
/// must not enforce the engine's per-probe timeout themselves.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Check a single candidate.
    async fn probe(&self, candidate: &Candidate) -> ProbeResult<Option<Hit>>;
}

/// The probe strategies shipped with voidex.
pub enum ProbeStrategy {
    Path(PathProbe),
    Subdomain(SubdomainProbe),
    HttpVerify(HttpVerifyProbe),
}

#[async_trait]
impl Probe for ProbeStrategy {
    fn name(&self) -> &'static str {
        match self {
            Self::Path(p) => p.name(),
            Self::Subdomain(p) => p.name(),
            Self::HttpVerify(p) => p.name(),
        }
    }

    async fn probe(&self, candidate: &Candidate) -> ProbeResult<Option<Hit>> {
        match self {
            Self::Path(p) => p.probe(candidate).await,
            Self::Subdomain(p) => p.probe(candidate).await,
            Self::HttpVerify(p) => p.probe(candidate).await,
        }
    }
}

impl From<PathProbe> for ProbeStrategy {
    fn from(p: PathProbe) -> Self {
        Self::Path(p)
    }
}

impl From<SubdomainProbe> for ProbeStrategy {
    fn from(p: SubdomainProbe) -> Self {
        Self::Subdomain(p)
    }
}

impl From<HttpVerifyProbe> for ProbeStrategy {
    fn from(p: HttpVerifyProbe) -> Self {
        Self::HttpVerify(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_target() {
        let found = ProbeOutcome::Found(Hit::http("admin", "http://x/admin", 200, 10));
        assert_eq!(found.target(), "admin");
        assert!(matches!(found, ProbeOutcome::Found(ref hit) if hit.status_code == Some(200)));

        let errored = ProbeOutcome::Errored {
            target: "login".into(),
            error_kind: ErrorKind::Timeout,
        };
        assert_eq!(errored.target(), "login");
    }

    #[test]
    fn test_outcome_serialization_is_tagged() {
        let outcome = ProbeOutcome::NotFound { target: "x".into() };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "not_found");
        assert_eq!(json["target"], "x");
    }
}
