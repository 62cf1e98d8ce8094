//! Raw HTTP client for the query backend.
//!
//! No view awareness — just makes the two API calls via reqwest.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::types::{HealthStatus, QueryRequest, QueryResult};

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Errors from backend calls. All of them count as transport failures.
///
/// `Status` is only produced when an error status comes with a body that
/// does not decode.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// HTTP client for `/api/query` and `/api/query/health`.
#[derive(Debug, Clone)]
pub struct QueryClient {
    http: Client,
    base_url: String,
}

impl QueryClient {
    /// Create a client against the default base URL (http://localhost:8000).
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL. Trailing slashes are dropped.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url),
        }
    }

    /// Create a client with a custom base URL and a per-request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/query/health`.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let url = format!("{}/api/query/health", self.base_url);
        debug!(%url, "health check");

        let response = self.http.get(&url).send().await?;
        read_json(response, "health status").await
    }

    /// `POST /api/query` with `{"query": ...}`.
    pub async fn query(&self, request: &QueryRequest) -> Result<QueryResult, ApiError> {
        let url = format!("{}/api/query", self.base_url);
        debug!(%url, len = request.query.len(), "query");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;
        read_json(response, "query result").await
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Decode the JSON body whatever the status. A backend may answer
/// `503 {"ready": false}` while warming up; only bodies that do not decode
/// are errors.
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, ApiError> {
    let status = response.status().as_u16();
    let body = response.text().await?;

    serde_json::from_str(&body).map_err(|e| {
        if status >= 400 {
            ApiError::Status {
                status,
                message: if body.is_empty() { "(no body)".into() } else { body },
            }
        } else {
            ApiError::InvalidResponse(format!("failed to parse {what}: {e}"))
        }
    })
}
