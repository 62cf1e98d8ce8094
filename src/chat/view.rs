//! The view contract a chat turn renders into.
//!
//! Implemented by the in-memory `Transcript`, by the TUI app, and by the
//! channel sink a spawned turn writes through. `ViewUpdate` is the data
//! form of one call, for shipping updates across a channel.

use super::message::{ChatMessage, MessageId};

/// Mutations a chat turn performs on its view.
pub trait ChatView {
    /// Append a message bubble.
    fn append_message(&mut self, message: ChatMessage);
    /// Overwrite the text of a previously appended message.
    fn set_message_text(&mut self, id: MessageId, text: &str);
    /// Attach a sources annotation after a bot message.
    fn append_sources(&mut self, id: MessageId, sources: &[String]);
    /// Clear the input field.
    fn clear_input(&mut self);
    /// Ask for a scroll to the bottom. Must return without waiting for it.
    fn schedule_scroll(&mut self);
}

/// One recorded `ChatView` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    AppendMessage(ChatMessage),
    SetMessageText { id: MessageId, text: String },
    AppendSources { id: MessageId, sources: Vec<String> },
    ClearInput,
    ScrollToBottom,
}

impl ViewUpdate {
    /// Replay this update on a view.
    pub fn apply_to<V: ChatView + ?Sized>(self, view: &mut V) {
        match self {
            ViewUpdate::AppendMessage(message) => view.append_message(message),
            ViewUpdate::SetMessageText { id, text } => view.set_message_text(id, &text),
            ViewUpdate::AppendSources { id, sources } => view.append_sources(id, &sources),
            ViewUpdate::ClearInput => view.clear_input(),
            ViewUpdate::ScrollToBottom => view.schedule_scroll(),
        }
    }
}

/// Records updates instead of applying them.
impl ChatView for Vec<ViewUpdate> {
    fn append_message(&mut self, message: ChatMessage) {
        self.push(ViewUpdate::AppendMessage(message));
    }

    fn set_message_text(&mut self, id: MessageId, text: &str) {
        self.push(ViewUpdate::SetMessageText {
            id,
            text: text.to_string(),
        });
    }

    fn append_sources(&mut self, id: MessageId, sources: &[String]) {
        self.push(ViewUpdate::AppendSources {
            id,
            sources: sources.to_vec(),
        });
    }

    fn clear_input(&mut self) {
        self.push(ViewUpdate::ClearInput);
    }

    fn schedule_scroll(&mut self) {
        self.push(ViewUpdate::ScrollToBottom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::Transcript;

    #[test]
    fn recorded_updates_replay_onto_transcript() {
        let mut recorded: Vec<ViewUpdate> = Vec::new();
        let bot = ChatMessage::placeholder();
        let bot_id = bot.id;
        recorded.append_message(ChatMessage::user("hello"));
        recorded.append_message(bot);
        recorded.set_message_text(bot_id, "hi there");
        recorded.append_sources(bot_id, &["faq.md".into()]);
        recorded.schedule_scroll();
        assert_eq!(recorded.len(), 5);

        let mut transcript = Transcript::new();
        for update in recorded {
            update.apply_to(&mut transcript);
        }
        assert_eq!(transcript.messages().count(), 2);
        assert_eq!(transcript.message(bot_id).unwrap().text, "hi there");
        assert_eq!(transcript.sources_annotations(), vec!["Sources: faq.md"]);
        assert_eq!(transcript.scroll_requests(), 1);
    }
}
