//! Resolution-source monitor.
//!
//! Polls every monitored endpoint concurrently — one worker task per
//! endpoint — and fans the results into a single map once all workers
//! have finished. A failure on one endpoint never aborts or delays the
//! others; it just becomes an inaccessible record. Keyword detection is
//! a case-insensitive substring scan over the lowercased body.

use chrono::Utc;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::http::HttpFetch;
use crate::sources;
use crate::text::{keyword_stance, Stance};
use crate::types::SourceData;

pub struct SourceMonitor {
    http: Arc<dyn HttpFetch>,
    /// Engine-side hard deadline per poll, over and above the
    /// transport-level request timeout.
    poll_deadline: Duration,
}

impl SourceMonitor {
    pub fn new(http: Arc<dyn HttpFetch>, poll_deadline_ms: u64) -> Self {
        Self {
            http,
            poll_deadline: Duration::from_millis(poll_deadline_ms),
        }
    }

    /// Poll all endpoints concurrently and return one `SourceData` per
    /// URL. Blocks until every worker has returned — no partial-result
    /// processing.
    pub async fn poll_all(
        &self,
        endpoints: &[String],
        keywords: &[String],
    ) -> HashMap<String, SourceData> {
        let handles: Vec<_> = endpoints
            .iter()
            .map(|url| {
                let http = Arc::clone(&self.http);
                let url = url.clone();
                let keywords = Self::keywords_for(&url, keywords);
                let deadline = self.poll_deadline;
                tokio::spawn(async move { poll_one(http, &url, &keywords, deadline).await })
            })
            .collect();

        let mut results = HashMap::with_capacity(endpoints.len());
        for (url, joined) in endpoints.iter().zip(join_all(handles).await) {
            let data = match joined {
                Ok(data) => data,
                Err(e) => {
                    warn!(url = %url, error = %e, "Poll worker failed");
                    SourceData::inaccessible(url, "poll worker failed")
                }
            };
            results.insert(data.url.clone(), data);
        }
        results
    }

    /// The scan list for one endpoint: the shared keyword list followed
    /// by the endpoint's catalog-specific keywords, deduplicated in
    /// first-seen order.
    fn keywords_for(url: &str, base: &[String]) -> Vec<String> {
        let mut merged: Vec<String> = Vec::with_capacity(base.len());
        for kw in base.iter().cloned().chain(sources::source_keywords(url)) {
            if !merged.contains(&kw) {
                merged.push(kw);
            }
        }
        merged
    }
}

/// Poll a single endpoint and scan the body for keywords.
async fn poll_one(
    http: Arc<dyn HttpFetch>,
    url: &str,
    keywords: &[String],
    deadline: Duration,
) -> SourceData {
    let start = Instant::now();

    let body = match timeout(deadline, http.get(url)).await {
        Ok(body) => body,
        Err(_) => {
            warn!(url, deadline_ms = deadline.as_millis() as u64, "Poll deadline exceeded");
            return SourceData::inaccessible(url, "poll deadline exceeded");
        }
    };

    if body.is_empty() {
        info!(url, elapsed_ms = start.elapsed().as_millis() as u64, "Source inaccessible");
        return SourceData::inaccessible(url, "Empty response");
    }

    let lower = body.to_lowercase();
    let found_keywords: Vec<String> = keywords
        .iter()
        .filter(|kw| lower.contains(&kw.to_lowercase()))
        .cloned()
        .collect();

    // Matches sitting next to a negation are still matches, but worth a trace.
    let negated: Vec<&String> = found_keywords
        .iter()
        .filter(|kw| keyword_stance(&lower, kw) == Stance::Negated)
        .collect();
    if !negated.is_empty() {
        debug!(url, keywords = ?negated, "Keywords found in negated context");
    }

    info!(
        url,
        content_length = body.len(),
        keywords = found_keywords.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Source polled"
    );

    SourceData {
        url: url.to_string(),
        accessible: true,
        content_length: body.len(),
        found_keywords,
        error: None,
        last_check: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
