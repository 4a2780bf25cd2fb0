//! HTTP bindings for the list endpoint
//!
//! The endpoint is relative by default, so the browser resolves it against
//! the page origin.

use chrono::Utc;
use gloo_net::http::Request;
use masterlist_core::{FetchError, Snapshot};
use web_sys::console;

/// Fetch and decode one snapshot.
pub async fn fetch_list(endpoint: &str) -> Result<Snapshot, FetchError> {
    let response = Request::get(endpoint).send().await.map_err(|e| {
        console::error_1(&format!("fetch_list: Fetch failed: {}", e).into());
        FetchError::Network(e.to_string())
    })?;

    if !response.ok() {
        console::error_1(&format!("fetch_list: Response status {}", response.status()).into());
        return Err(FetchError::Status(response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Body(e.to_string()))?;

    Snapshot::decode(&body, Utc::now())
}
