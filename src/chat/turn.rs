//! Chat turn controller — one question through health check and query.
//!
//! ```text
//! begin:    user bubble → clear input → "Thinking..." → scroll
//! complete: health ─┬─ unreachable / not ready → notice, stop
//!                   └─ ready → query ─┬─ failed → notice
//!                                     └─ answer (+ sources) → scroll
//! ```
//!
//! Every failure ends up as text in the bot bubble. Nothing propagates.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::{ApiError, HealthStatus, QueryBackend};

use super::message::{ChatMessage, MessageId};
use super::view::ChatView;

/// Health check could not be completed.
pub const HEALTH_UNREACHABLE: &str = "Error connecting to the server.";
/// Health check answered `ready: false`.
pub const NOT_READY: &str = "Server is not ready. Please try again later.";
/// Query call failed.
pub const QUERY_FAILED: &str = "Error getting response from the server.";
/// Query succeeded without an answer.
pub const NO_RESPONSE: &str = "No response from the server.";

/// Runs chat turns against a backend. Holds no per-turn state.
#[derive(Clone)]
pub struct TurnController {
    backend: Arc<dyn QueryBackend>,
}

impl TurnController {
    pub fn new(backend: Arc<dyn QueryBackend>) -> Self {
        Self { backend }
    }

    /// Run a whole turn: `begin` then `complete`. No-op for blank input.
    pub async fn submit_turn<V: ChatView + Send>(&self, view: &mut V, raw_input: &str) {
        if let Some(turn) = self.begin(view, raw_input) {
            turn.complete(view).await;
        }
    }

    /// Render the user message and the placeholder. Returns `None` (and
    /// touches nothing) when the trimmed input is empty.
    pub fn begin<V: ChatView + ?Sized>(&self, view: &mut V, raw_input: &str) -> Option<PendingTurn> {
        let query = raw_input.trim();
        if query.is_empty() {
            return None;
        }

        view.append_message(ChatMessage::user(query));
        view.clear_input();

        let placeholder = ChatMessage::placeholder();
        let reply_id = placeholder.id;
        view.append_message(placeholder);
        view.schedule_scroll();

        debug!(%reply_id, "turn started");
        Some(PendingTurn {
            backend: Arc::clone(&self.backend),
            query: query.to_string(),
            reply_id,
        })
    }
}

/// The network half of a turn, ready to run (possibly on another task).
pub struct PendingTurn {
    backend: Arc<dyn QueryBackend>,
    query: String,
    reply_id: MessageId,
}

impl PendingTurn {
    /// The bot message this turn will overwrite.
    pub fn reply_id(&self) -> MessageId {
        self.reply_id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Health check, query, and final render.
    pub async fn complete<V: ChatView + Send + ?Sized>(self, view: &mut V) {
        if let Some(notice) = health_notice(self.backend.health().await) {
            view.set_message_text(self.reply_id, notice);
            return;
        }

        match self.backend.query(&self.query).await {
            Ok(result) => {
                view.set_message_text(self.reply_id, result.answer_text().unwrap_or(NO_RESPONSE));
                if !result.sources.is_empty() {
                    view.append_sources(self.reply_id, &result.sources);
                }
                debug!(reply_id = %self.reply_id, sources = result.sources.len(), "turn answered");
            }
            Err(e) => {
                warn!(reply_id = %self.reply_id, "query failed: {e}");
                view.set_message_text(self.reply_id, QUERY_FAILED);
            }
        }

        view.schedule_scroll();
    }
}

/// Map a health-check outcome to the notice that ends the turn, if any.
fn health_notice(result: Result<HealthStatus, ApiError>) -> Option<&'static str> {
    match result {
        Ok(HealthStatus { ready: true }) => None,
        Ok(HealthStatus { ready: false }) => {
            warn!("backend reports not ready");
            Some(NOT_READY)
        }
        Err(e) => {
            warn!("health check failed: {e}");
            Some(HEALTH_UNREACHABLE)
        }
    }
}
