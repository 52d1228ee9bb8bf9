//! Path discovery probe.
//!
//! Requests `base/candidate` once with redirects disabled. Any HTTP response
//! counts as a hit; which statuses matter is the acceptance predicate's job.
//! A 301 pointing at `admin/` is itself evidence that `admin` exists.

use super::http::{body_size, HttpSettings};
use super::{Hit, Probe};
use crate::error::{EngineResult, ProbeError, ProbeResult};
use crate::types::{BaseUrl, Candidate};
use async_trait::async_trait;
use reqwest::Client;
use tokio::time::Instant;
use tracing::trace;

/// Probes URL paths under a fixed base URL.
pub struct PathProbe {
    base: BaseUrl,
    client: Client,
    http: HttpSettings,
}

impl PathProbe {
    /// Create a path probe for the given base URL.
    pub fn new(base: BaseUrl, http: HttpSettings) -> EngineResult<Self> {
        let client = http.build_client(false)?;
        Ok(Self { base, client, http })
    }
}

#[async_trait]
impl Probe for PathProbe {
    fn name(&self) -> &'static str {
        "path"
    }

    async fn probe(&self, candidate: &Candidate) -> ProbeResult<Option<Hit>> {
        let url = self
            .base
            .join(candidate.as_str())
            .map_err(|e| ProbeError::Protocol(e.to_string()))?;

        let sent = Instant::now();
        let response = self
            .http
            .decorate(self.client.get(url.clone()))
            .send()
            .await?;

        let status = response.status().as_u16();
        let resolved = response.url().to_string();
        let size = body_size(response, self.http.body_deadline(sent)).await;

        trace!(url = %url, status, bytes = size, "path response");

        Ok(Some(Hit::http(candidate.as_str(), resolved, status, size)))
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! Minimal HTTP responder for probe tests.

    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `respond(path)` for every request until the test ends.
    pub async fn spawn<F>(respond: F) -> SocketAddr
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let respond = std::sync::Arc::new(respond);

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let respond = respond.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let mut read = 0;
                    loop {
                        match stream.read(&mut buf[read..]).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => read += n,
                        }
                        // Not plain HTTP (e.g. a TLS ClientHello): hang up.
                        if !buf[0].is_ascii_uppercase() {
                            return;
                        }
                        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") || read == buf.len() {
                            break;
                        }
                    }
                    let request = String::from_utf8_lossy(&buf[..read]).to_string();
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    let response = respond(&path);
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        addr
    }

    /// Answer every connection with `head` and then keep it open without
    /// sending anything more.
    pub async fn spawn_stalling(head: &'static str) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let _ = stream.write_all(head.as_bytes()).await;
                open.push(stream);
            }
        });

        addr
    }

    /// Format a response with a body and `Connection: close`.
    pub fn response(status: &str, extra_headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
            status,
            body.len(),
            extra_headers,
            body
        )
    }
}
