// probe.rs - Single HTTP probe execution
// Purpose: Issue exactly one request for one candidate URL and normalize the
//          result. Transport failures come back as data, never as Err.

use crate::url_space::{ProbeMethod, ProbeTarget, Provider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Normalized result of one HTTP probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub url: String,
    pub method: ProbeMethod,
    pub provider: Provider,
    pub status_code: Option<u16>,
    pub accessible: bool,
    pub headers: BTreeMap<String, String>,
    pub size: usize,
    pub error: Option<String>,
    /// Seconds, zero when the exchange never completed
    pub response_time: f64,
}

impl ProbeOutcome {
    /// Completed HTTP exchange. Any status below 500 proves the hostname pattern
    /// is routed by the provider, so it counts as accessible.
    pub fn completed(
        target: &ProbeTarget,
        status_code: u16,
        headers: BTreeMap<String, String>,
        size: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            url: target.url.clone(),
            method: target.method,
            provider: target.provider,
            status_code: Some(status_code),
            accessible: status_code < 500,
            headers,
            size,
            error: None,
            response_time: elapsed.as_secs_f64(),
        }
    }

    /// Transport-level failure (DNS, connect, TLS, timeout)
    pub fn failed(target: &ProbeTarget, error: impl Into<String>) -> Self {
        Self {
            url: target.url.clone(),
            method: target.method,
            provider: target.provider,
            status_code: None,
            accessible: false,
            headers: BTreeMap::new(),
            size: 0,
            error: Some(error.into()),
            response_time: 0.0,
        }
    }

    pub fn response_time_ms(&self) -> u64 {
        (self.response_time * 1000.0) as u64
    }
}

/// Seam between the coordinator and the network
#[async_trait]
pub trait ProbeExecutor: Send + Sync {
    async fn probe(&self, target: &ProbeTarget) -> ProbeOutcome;
}

/// reqwest-backed executor. The client is built once per run and shared by
/// every probe; it carries no per-target state.
pub struct HttpProber {
    client: Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(timeout)
            .user_agent(concat!("cloudsniff/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl ProbeExecutor for HttpProber {
    async fn probe(&self, target: &ProbeTarget) -> ProbeOutcome {
        let start = Instant::now();

        let mut response = match self
            .client
            .request(target.method.as_reqwest(), &target.url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return ProbeOutcome::failed(target, describe_error(&e)),
        };

        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());

        // The body is part of the exchange: a stall here is still a transport failure.
        // Only its length is kept, so chunks are counted and dropped.
        let mut size = 0;
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => size += chunk.len(),
                Ok(None) => break,
                Err(e) => return ProbeOutcome::failed(target, describe_error(&e)),
            }
        }

        ProbeOutcome::completed(target, status, headers, size, start.elapsed())
    }
}

/// Repeated header names are folded into one comma-separated value
fn collect_headers(map: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    let mut headers: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    headers
}

fn describe_error(error: &reqwest::Error) -> String {
    let kind = if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_redirect() {
        "redirect loop"
    } else if error.is_body() || error.is_decode() {
        "body read failed"
    } else {
        "request failed"
    };

    let mut message = format!("{}: {}", kind, error);
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> ProbeTarget {
        ProbeTarget::new(Provider::Aws, "https://examplebucket.s3.amazonaws.com/".to_string())
    }

    #[test]
    fn test_accessible_boundaries() {
        let cases = [(200, true), (301, true), (403, true), (499, true), (500, false), (503, false)];
        for (status, expected) in cases {
            let outcome = ProbeOutcome::completed(
                &target(),
                status,
                BTreeMap::new(),
                0,
                Duration::from_millis(5),
            );
            assert_eq!(outcome.accessible, expected, "status {status}");
            assert_eq!(outcome.status_code, Some(status));
        }
    }

    #[test]
    fn test_failed_outcome_shape() {
        let outcome = ProbeOutcome::failed(&target(), "connection failed: dns error");
        assert_eq!(outcome.status_code, None);
        assert!(!outcome.accessible);
        assert!(outcome.headers.is_empty());
        assert_eq!(outcome.size, 0);
        assert_eq!(outcome.response_time, 0.0);
        assert_eq!(outcome.error.as_deref(), Some("connection failed: dns error"));
    }

    #[test]
    fn test_collect_headers_folds_repeats() {
        let mut map = reqwest::header::HeaderMap::new();
        map.append("x-amz-id", "a".parse().unwrap());
        map.append("x-amz-id", "b".parse().unwrap());
        map.insert("server", "AmazonS3".parse().unwrap());

        let headers = collect_headers(&map);
        assert_eq!(headers.get("x-amz-id").map(String::as_str), Some("a, b"));
        assert_eq!(headers.get("server").map(String::as_str), Some("AmazonS3"));
    }

    #[test]
    fn test_response_time_ms() {
        let outcome = ProbeOutcome::completed(
            &target(),
            200,
            BTreeMap::new(),
            10,
            Duration::from_millis(1500),
        );
        assert_eq!(outcome.response_time_ms(), 1500);
    }
}
