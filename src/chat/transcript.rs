//! In-memory conversation view.

use super::message::{format_sources, ChatMessage, MessageId};
use super::view::ChatView;

/// One rendered element of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message(ChatMessage),
    /// `Sources: ...` line attached to a bot message.
    Sources { message: MessageId, text: String },
}

/// Ordered list of rendered entries for the session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    input_clears: usize,
    scroll_requests: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Messages in render order (annotations skipped).
    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Message(m) => Some(m),
            Entry::Sources { .. } => None,
        })
    }

    pub fn message(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages().find(|m| m.id == id)
    }

    /// Text of every sources annotation, in order.
    pub fn sources_annotations(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                Entry::Sources { text, .. } => Some(text.as_str()),
                Entry::Message(_) => None,
            })
            .collect()
    }

    /// How many times the input was cleared.
    pub fn input_clears(&self) -> usize {
        self.input_clears
    }

    /// How many scroll-to-bottom requests were made.
    pub fn scroll_requests(&self) -> usize {
        self.scroll_requests
    }

    fn message_mut(&mut self, id: MessageId) -> Option<&mut ChatMessage> {
        self.entries.iter_mut().find_map(|e| match e {
            Entry::Message(m) if m.id == id => Some(m),
            _ => None,
        })
    }
}

impl ChatView for Transcript {
    fn append_message(&mut self, message: ChatMessage) {
        self.entries.push(Entry::Message(message));
    }

    fn set_message_text(&mut self, id: MessageId, text: &str) {
        match self.message_mut(id) {
            Some(m) => m.text = text.to_string(),
            None => tracing::debug!(%id, "update for unknown message dropped"),
        }
    }

    fn append_sources(&mut self, id: MessageId, sources: &[String]) {
        let Some(m) = self.message_mut(id) else {
            tracing::debug!(%id, "sources for unknown message dropped");
            return;
        };
        m.sources = sources.to_vec();
        self.entries.push(Entry::Sources {
            message: id,
            text: format_sources(sources),
        });
    }

    fn clear_input(&mut self) {
        self.input_clears += 1;
    }

    fn schedule_scroll(&mut self) {
        self.scroll_requests += 1;
    }
}
