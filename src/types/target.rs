//! Validated scan targets.
//!
//! Provides the two target shapes the discovery tools accept:
//! - Base URLs for path discovery (`example.com/app` → `http://example.com/app/`)
//! - Domains for subdomain discovery (`Example.COM.` → `example.com`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Error type for target parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("target is empty")]
    Empty,
    #[error("invalid URL '{0}': {1}")]
    InvalidUrl(String, String),
    #[error("unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
    #[error("URL has no host: {0}")]
    MissingHost(String),
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
    #[error("candidate '{0}' does not resolve under the base URL")]
    OutsideBase(String),
}

/// A normalized base URL: http(s) scheme, a host, and a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BaseUrl(Url);

impl BaseUrl {
    /// Parse and normalize a user-supplied URL.
    ///
    /// A missing scheme defaults to `http://`. Query strings and fragments are
    /// dropped since candidates are appended to the path.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(TargetError::Empty);
        }

        let with_scheme = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        let mut url = Url::parse(&with_scheme)
            .map_err(|e| TargetError::InvalidUrl(input.to_string(), e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(TargetError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(TargetError::MissingHost(input.to_string()));
        }

        url.set_query(None);
        url.set_fragment(None);
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self(url))
    }

    /// Join a candidate path onto this base.
    ///
    /// Leading slashes on the candidate are ignored so `/admin` and `admin`
    /// both land under the base path.
    pub fn join(&self, candidate: &str) -> Result<Url, TargetError> {
        let relative = candidate.trim_start_matches('/');
        let joined = self
            .0
            .join(relative)
            .map_err(|e| TargetError::InvalidUrl(candidate.to_string(), e.to_string()))?;

        if joined.origin() != self.0.origin() {
            return Err(TargetError::OutsideBase(candidate.to_string()));
        }
        Ok(joined)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BaseUrl {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = TargetError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<BaseUrl> for String {
    fn from(url: BaseUrl) -> Self {
        url.0.into()
    }
}

/// A validated, lowercased DNS domain with at least two labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Domain(String);

impl Domain {
    /// Maximum length of a full domain name.
    pub const MAX_LEN: usize = 253;

    /// Parse and validate a domain name.
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let domain = input.trim().trim_end_matches('.').to_ascii_lowercase();
        if domain.is_empty() {
            return Err(TargetError::Empty);
        }
        if is_valid_domain(&domain) {
            Ok(Self(domain))
        } else {
            Err(TargetError::InvalidDomain(input.trim().to_string()))
        }
    }

    /// Build the fully qualified name for a host label under this domain.
    pub fn subdomain(&self, label: &str) -> String {
        format!("{}.{}", label.trim_matches('.'), self.0)
    }

    /// Borrow the domain text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Domain {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Domain {
    type Error = TargetError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.0
    }
}

/// Check a lowercased domain: labels of 1-63 alphanumerics or hyphens,
/// no leading/trailing hyphen, alphabetic TLD of two or more characters.
fn is_valid_domain(s: &str) -> bool {
    if s.len() > Domain::MAX_LEN {
        return false;
    }

    let labels: Vec<&str> = s.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    let tld = labels[labels.len() - 1];
    labels_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}
