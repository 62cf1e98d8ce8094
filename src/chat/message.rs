//! Chat messages as rendered in the conversation view.

use std::fmt;

use uuid::Uuid;

/// Placeholder text shown while a turn is in flight.
pub const THINKING: &str = "Thinking...";

/// Prefix of the sources annotation.
pub const SOURCES_PREFIX: &str = "Sources: ";

/// Stable identifier for one message, so the bot reply can be rewritten
/// from another task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "you",
            Role::Bot => "bot",
        }
    }
}

/// A single message bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    /// Citations attached to a bot answer. Empty when none.
    pub sources: Vec<String>,
}

impl ChatMessage {
    pub fn user(text: &str) -> Self {
        Self::new(Role::User, text)
    }

    /// A bot message showing the `Thinking...` placeholder.
    pub fn placeholder() -> Self {
        Self::new(Role::Bot, THINKING)
    }

    fn new(role: Role, text: &str) -> Self {
        Self {
            id: MessageId::new(),
            role,
            text: text.to_string(),
            sources: Vec::new(),
        }
    }
}

/// Render sources as `Sources: a, b`.
pub fn format_sources(sources: &[String]) -> String {
    format!("{SOURCES_PREFIX}{}", sources.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_bot_thinking() {
        let msg = ChatMessage::placeholder();
        assert_eq!(msg.role, Role::Bot);
        assert_eq!(msg.text, "Thinking...");
        assert!(msg.sources.is_empty());
    }

    #[test]
    fn message_ids_are_unique() {
        let a = ChatMessage::user("hi");
        let b = ChatMessage::user("hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn sources_joined_with_comma_space() {
        let sources = vec!["doc1.pdf".to_string(), "doc2.pdf".to_string()];
        assert_eq!(format_sources(&sources), "Sources: doc1.pdf, doc2.pdf");
    }

    #[test]
    fn single_source() {
        assert_eq!(format_sources(&["hr-handbook.pdf".into()]), "Sources: hr-handbook.pdf");
    }
}
