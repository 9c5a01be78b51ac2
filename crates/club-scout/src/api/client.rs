//! HTTP transport and page fetcher.

use crate::error::{Result, ScoutError};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Status and body of a completed GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Connection-level failure (DNS, refused, reset, timeout, body read)
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError(e.to_string())
    }
}

/// Issues GET requests. Statuses are returned as-is, never turned into errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> std::result::Result<RawResponse, TransportError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport. No timeout unless one is given.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> std::result::Result<RawResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

/// Fetches pages and parses them into HTML documents
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
}

impl PageFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// GET `url` and parse the body.
    ///
    /// Transport failures and non-2xx statuses both surface as
    /// `ScoutError::Fetch`. Nothing is retried or cached.
    pub async fn get_html(&self, url: &str) -> Result<Html> {
        debug!(url = %url, "Fetching page");

        let response = self
            .transport
            .get(url)
            .await
            .map_err(|e| ScoutError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status.is_success() {
            return Err(ScoutError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP status {}", response.status.as_u16()),
            });
        }

        Ok(Html::parse_document(&response.body))
    }
}
