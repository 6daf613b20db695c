//! # Service Module
//!
//! This module handles all interactions with the departure board API. It
//! fetches the JSON board for the configured station and classifies the
//! outcome so the scheduler can decide what to do next.

pub mod url;

use once_cell::sync::Lazy;
use reqwest::StatusCode;

use crate::departure_board::DepartureSnapshot;
use crate::scheduler::DepartureSource;

/// A lazily initialized, shared `reqwest::Client` for making HTTP requests.
/// Using a single client instance is more efficient as it reuses connection pools.
static CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Ways a poll of the departure board can fail.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network, DNS or timeout failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 401. The board will not recover from this by retrying.
    #[error("unauthorized (HTTP 401)")]
    Unauthorized,

    /// Any other status than 200 or 401.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// A 200 response whose body is not a departure list.
    #[error("malformed departure list: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// Whether polling must stop after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchError::Unauthorized)
    }
}

/// Performs one GET request against the JSON board URL.
///
/// # Errors
///
/// Returns `FetchError::Unauthorized` on 401, `FetchError::Status` on any
/// other non-200 status, `FetchError::Transport` if the request itself fails
/// and `FetchError::Parse` if a 200 body cannot be read as departures.
pub async fn fetch_departures(
    client: &reqwest::Client,
    url: &str,
) -> Result<DepartureSnapshot, FetchError> {
    let response = client.get(url).send().await?;

    match response.status() {
        StatusCode::OK => {
            let body = response.text().await?;
            Ok(serde_json::from_str(&body)?)
        }
        StatusCode::UNAUTHORIZED => Err(FetchError::Unauthorized),
        status => Err(FetchError::Status(status.as_u16())),
    }
}

/// Polls a fixed API URL with the shared client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DepartureSource for HttpSource {
    async fn fetch(&self) -> Result<DepartureSnapshot, FetchError> {
        fetch_departures(&CLIENT, &self.url).await
    }
}
