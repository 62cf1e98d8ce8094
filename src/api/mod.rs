//! Query backend access — the two-call HTTP contract.
//!
//! `QueryBackend` is the seam the turn controller talks to. `QueryClient`
//! is the real implementation; tests plug in fakes.

pub mod client;
pub mod types;

use async_trait::async_trait;

pub use client::{ApiError, QueryClient, DEFAULT_BASE_URL};
pub use types::{HealthStatus, QueryRequest, QueryResult};

/// Backend the chat turn talks to.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Readiness check.
    async fn health(&self) -> Result<HealthStatus, ApiError>;
    /// Ask a question.
    async fn query(&self, query: &str) -> Result<QueryResult, ApiError>;
}

#[async_trait]
impl QueryBackend for QueryClient {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        QueryClient::health(self).await
    }

    async fn query(&self, query: &str) -> Result<QueryResult, ApiError> {
        QueryClient::query(self, &QueryRequest::new(query)).await
    }
}
