//! Shared HTTP client construction.

use crate::error::{EngineError, EngineResult};
use rand::seq::SliceRandom;
use reqwest::{redirect, Client, RequestBuilder, Response};
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::trace;

/// Maximum redirects followed when a probe follows redirects at all.
const MAX_REDIRECTS: usize = 10;

/// Fallback when no user agents are configured.
const DEFAULT_USER_AGENT: &str = concat!("voidex/", env!("CARGO_PKG_VERSION"));

/// HTTP behaviour shared by the HTTP-based probes.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Client-level request timeout.
    pub timeout: Duration,
    /// Verify TLS certificates.
    pub verify_ssl: bool,
    /// User agents rotated per request.
    pub user_agents: Vec<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            verify_ssl: false,
            user_agents: Vec::new(),
        }
    }
}

impl HttpSettings {
    /// Build a client. Redirects are followed only when asked.
    pub fn build_client(&self, follow_redirects: bool) -> EngineResult<Client> {
        let policy = if follow_redirects {
            redirect::Policy::limited(MAX_REDIRECTS)
        } else {
            redirect::Policy::none()
        };

        Client::builder()
            .redirect(policy)
            .timeout(self.timeout)
            .danger_accept_invalid_certs(!self.verify_ssl)
            .build()
            .map_err(|e| EngineError::HttpClient(e.to_string()))
    }

    /// Pick a user agent for the next request.
    pub fn user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Attach per-request headers.
    pub fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(reqwest::header::USER_AGENT, self.user_agent())
    }

    /// When to stop reading a body for a request sent at `sent`.
    ///
    /// Three quarters of the request timeout, so a slow body is cut off
    /// before the request as a whole times out.
    pub fn body_deadline(&self, sent: Instant) -> Instant {
        sent + self.timeout * 3 / 4
    }
}

/// Size of a response body, counted chunk by chunk without buffering it.
///
/// A body that fails or is still arriving at `deadline` does not discard the
/// response: the advertised `Content-Length` is used when present, otherwise
/// the bytes received so far.
pub async fn body_size(mut response: Response, deadline: Instant) -> u64 {
    let advertised = response.content_length();
    let mut received = 0u64;

    let read = timeout_at(deadline, async {
        while let Some(chunk) = response.chunk().await? {
            received += chunk.len() as u64;
        }
        Ok::<_, reqwest::Error>(())
    })
    .await;

    match read {
        Ok(Ok(())) => received,
        Ok(Err(e)) => {
            trace!(error = %e, received, "response body failed");
            advertised.unwrap_or(received)
        }
        Err(_) => {
            trace!(received, "response body cut off");
            advertised.unwrap_or(received)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_rotation() {
        let settings = HttpSettings {
            user_agents: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        for _ in 0..20 {
            assert!(matches!(settings.user_agent(), "a" | "b"));
        }
    }

    #[test]
    fn test_user_agent_fallback() {
        let settings = HttpSettings::default();
        assert!(settings.user_agent().starts_with("voidex/"));
    }

    #[test]
    fn test_body_deadline_precedes_timeout() {
        let settings = HttpSettings {
            timeout: Duration::from_secs(4),
            ..Default::default()
        };
        let sent = Instant::now();
        assert_eq!(settings.body_deadline(sent), sent + Duration::from_secs(3));
    }

    #[test]
    fn test_build_client() {
        let settings = HttpSettings::default();
        assert!(settings.build_client(false).is_ok());
        assert!(settings.build_client(true).is_ok());
    }
}
