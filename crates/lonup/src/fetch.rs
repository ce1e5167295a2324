//! Byte-fetching capability
//!
//! The orchestrator consumes the `Fetcher` trait; production code uses
//! the reqwest-backed `HttpFetcher`, tests use in-memory fakes.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the full body at `url`
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP fetcher with a fixed user agent and per-request timeout
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!("lonup/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        if !resp.status().is_success() {
            bail!("{} returned HTTP {}", url, resp.status());
        }

        let bytes = resp
            .bytes()
            .await
            .with_context(|| format!("failed to read body from {}", url))?;
        Ok(bytes.to_vec())
    }
}
