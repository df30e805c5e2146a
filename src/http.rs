//! HTTP transport boundary.
//!
//! The engine consumes a deliberately narrow client contract: URL in,
//! body out, empty string on any failure. Structured transport errors
//! stay inside this module; callers only observe the empty-body case
//! and record the endpoint as inaccessible.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Narrow HTTP contract consumed by the source monitor and ingest layer.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    /// GET the URL, returning the response body. Empty string on any
    /// failure (transport error, non-2xx status, unreadable body).
    async fn get(&self, url: &str) -> String;

    /// POST a body to the URL. Same empty-string failure contract.
    async fn post(&self, url: &str, body: String) -> String;
}

/// Production client backed by `reqwest` with connect and request
/// timeouts. The request timeout is the transport-level bound on slow
/// endpoints; the monitor adds its own engine-side deadline on top.
pub struct ReqwestFetcher {
    http: Client,
}

impl ReqwestFetcher {
    pub fn new(request_timeout_ms: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(request_timeout_ms))
            .connect_timeout(Duration::from_secs(3))
            .user_agent("ARGUS/0.1.0")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get(&self, url: &str) -> String {
        match self.http.get(url).send().await {
            Ok(resp) if resp.status().is_success() => {
                resp.text().await.unwrap_or_default()
            }
            Ok(resp) => {
                debug!(url, status = %resp.status(), "GET returned error status");
                String::new()
            }
            Err(e) => {
                debug!(url, error = %e, "GET failed");
                String::new()
            }
        }
    }

    async fn post(&self, url: &str, body: String) -> String {
        match self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                resp.text().await.unwrap_or_default()
            }
            Ok(resp) => {
                debug!(url, status = %resp.status(), "POST returned error status");
                String::new()
            }
            Err(e) => {
                debug!(url, error = %e, "POST failed");
                String::new()
            }
        }
    }
}
