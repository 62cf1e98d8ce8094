//! TUI messages — keyboard input and updates from the running turn.
//!
//! Turn tasks write through a `ChannelView`, which turns each `ChatView`
//! call into a `TuiMessage::View` on the app's channel.

use crossterm::event::KeyEvent;
use tokio::sync::mpsc::UnboundedSender;

use crate::chat::{ChatMessage, ChatView, MessageId, ViewUpdate};

/// Messages that drive the TUI update loop.
#[derive(Debug, Clone)]
pub enum TuiMessage {
    /// Keyboard input.
    Input(KeyEvent),
    /// View update from a turn task.
    View(ViewUpdate),
    /// The in-flight turn has finished.
    TurnFinished,
    /// Quit the TUI.
    Quit,
}

/// `ChatView` that forwards every call to the app's channel.
#[derive(Debug, Clone)]
pub struct ChannelView {
    tx: UnboundedSender<TuiMessage>,
}

impl ChannelView {
    pub fn new(tx: UnboundedSender<TuiMessage>) -> Self {
        Self { tx }
    }

    /// Signal that the turn is over.
    pub fn finish(&self) {
        let _ = self.tx.send(TuiMessage::TurnFinished);
    }

    fn send(&self, update: ViewUpdate) {
        // Receiver gone means the UI is shutting down.
        let _ = self.tx.send(TuiMessage::View(update));
    }
}

impl ChatView for ChannelView {
    fn append_message(&mut self, message: ChatMessage) {
        self.send(ViewUpdate::AppendMessage(message));
    }

    fn set_message_text(&mut self, id: MessageId, text: &str) {
        self.send(ViewUpdate::SetMessageText {
            id,
            text: text.to_string(),
        });
    }

    fn append_sources(&mut self, id: MessageId, sources: &[String]) {
        self.send(ViewUpdate::AppendSources {
            id,
            sources: sources.to_vec(),
        });
    }

    fn clear_input(&mut self) {
        self.send(ViewUpdate::ClearInput);
    }

    fn schedule_scroll(&mut self) {
        self.send(ViewUpdate::ScrollToBottom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn channel_view_forwards_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut view = ChannelView::new(tx);
        let id = MessageId::new();
        view.set_message_text(id, "answer");
        view.schedule_scroll();
        view.finish();

        assert!(matches!(
            rx.try_recv().unwrap(),
            TuiMessage::View(ViewUpdate::SetMessageText { text, .. }) if text == "answer"
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            TuiMessage::View(ViewUpdate::ScrollToBottom)
        ));
        assert!(matches!(rx.try_recv().unwrap(), TuiMessage::TurnFinished));
    }

    #[test]
    fn closed_channel_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut view = ChannelView::new(tx);
        view.clear_input();
        view.finish();
    }
}
