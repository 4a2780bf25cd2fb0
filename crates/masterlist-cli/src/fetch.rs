//! List endpoint client

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use masterlist_core::{FetchError, Snapshot};

pub struct HttpFetcher {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpFetcher {
    const TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("masterlist-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(Self::TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One fetch cycle. Every failure maps to a [`FetchError`] so the caller
    /// can keep its previous snapshot.
    pub async fn fetch(&self) -> Result<Snapshot, FetchError> {
        tracing::debug!("Fetching {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Snapshot::decode(&body, Utc::now())
    }
}
