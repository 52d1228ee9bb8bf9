//! HTTP reachability check for resolved subdomains.
//!
//! Tries `https://host` then `http://host`, following redirects, and keeps the
//! first response whose status is below the configured ceiling. A host that
//! never answers is left unverified; it is never demoted from "found".

use super::http::{body_size, HttpSettings};
use super::{Hit, Probe};
use crate::error::{EngineResult, ProbeError, ProbeResult};
use crate::types::Candidate;
use async_trait::async_trait;
use reqwest::Client;
use tokio::time::Instant;
use tracing::trace;

/// Schemes tried, in order.
const SCHEMES: [&str; 2] = ["https", "http"];

/// Default status ceiling: anything below 500 counts as reachable.
pub const DEFAULT_STATUS_CEILING: u16 = 500;

/// Verifies that a host name serves HTTP(S).
pub struct HttpVerifyProbe {
    client: Client,
    http: HttpSettings,
    status_ceiling: u16,
}

impl HttpVerifyProbe {
    /// Create a verifier. Responses with `status >= status_ceiling` do not
    /// count as verified.
    pub fn new(http: HttpSettings, status_ceiling: u16) -> EngineResult<Self> {
        let client = http.build_client(true)?;
        Ok(Self {
            client,
            http,
            status_ceiling,
        })
    }
}

#[async_trait]
impl Probe for HttpVerifyProbe {
    fn name(&self) -> &'static str {
        "http-verify"
    }

    async fn probe(&self, candidate: &Candidate) -> ProbeResult<Option<Hit>> {
        let mut last_error: Option<ProbeError> = None;
        let mut answered = false;

        for scheme in SCHEMES {
            let url = format!("{}://{}", scheme, candidate);
            let sent = Instant::now();
            let response = match self.http.decorate(self.client.get(&url)).send().await {
                Ok(response) => response,
                Err(e) => {
                    trace!(url = %url, error = %e, "verification request failed");
                    last_error = Some(e.into());
                    continue;
                }
            };

            answered = true;
            let status = response.status().as_u16();
            if status < self.status_ceiling {
                let resolved = response.url().to_string();
                let size = body_size(response, self.http.body_deadline(sent)).await;
                return Ok(Some(Hit::http(candidate.as_str(), resolved, status, size)));
            }
        }

        match last_error {
            Some(e) if !answered => Err(e),
            _ => Ok(None),
        }
    }
}
