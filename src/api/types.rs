//! Wire types for the query backend.
//!
//! Both response shapes are lenient: missing or null fields fall back to
//! their empty value instead of failing the whole response.

use serde::{Deserialize, Deserializer, Serialize};

/// Response from `GET /api/query/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// A body without `ready` counts as not ready.
    #[serde(default, deserialize_with = "null_as_default")]
    pub ready: bool,
}

/// Body of `POST /api/query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Response from `POST /api/query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<String>,
}

impl QueryResult {
    /// Create a result with an answer and sources.
    pub fn new(answer: &str, sources: &[&str]) -> Self {
        Self {
            answer: Some(answer.to_string()),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The answer text, if present and non-empty.
    pub fn answer_text(&self) -> Option<&str> {
        self.answer.as_deref().filter(|a| !a.is_empty())
    }
}

/// Treat an explicit JSON `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
