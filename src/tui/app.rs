//! ChatApp — the TEA model.
//!
//! All state lives here. Update receives TuiMessages, mutates state.
//! View reads state to produce ratatui widgets. No side effects in view.

use tracing::debug;

use crate::chat::{ChatMessage, ChatView, MessageId, Transcript};

use super::autosize::{wrapped_rows, InputAutoResize};
use super::event::TuiMessage;
use super::input;

/// Input width assumed before the first frame is drawn.
const DEFAULT_INPUT_WIDTH: u16 = 80;

/// The main TUI application state (TEA model).
pub struct ChatApp {
    /// Backend address shown in the title bar.
    pub base_url: String,
    /// Rendered conversation.
    pub transcript: Transcript,
    /// Draft in the input box.
    pub input: String,
    /// Input box height state.
    pub autosize: InputAutoResize,
    /// Inner width of the input box from the last render.
    pub input_width: u16,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// A turn is running; new submissions are refused until it finishes.
    pub turn_in_flight: bool,
    /// Raw input pending a turn (set by Enter, consumed by runner).
    pub pending_submission: Option<String>,
    /// Scroll offset of the transcript pane (rows from top).
    pub scroll: u16,
    /// When true, keep the transcript pinned to the bottom.
    pub follow_bottom: bool,
    /// Scroll-to-bottom requested; honoured on the next frame.
    pub pending_scroll: bool,
    /// Viewport height of the transcript pane (set by renderer).
    pub viewport_height: u16,
}

impl ChatApp {
    pub fn new(base_url: &str, input_rows: u16) -> Self {
        Self {
            base_url: base_url.to_string(),
            transcript: Transcript::new(),
            input: String::new(),
            autosize: InputAutoResize::new(input_rows),
            input_width: DEFAULT_INPUT_WIDTH,
            should_quit: false,
            turn_in_flight: false,
            pending_submission: None,
            scroll: 0,
            follow_bottom: true,
            pending_scroll: false,
            viewport_height: 0,
        }
    }

    /// Process a message, updating state.
    pub fn update(&mut self, msg: TuiMessage) {
        match msg {
            TuiMessage::Input(key) => input::handle_key(self, key),
            TuiMessage::View(update) => update.apply_to(self),
            TuiMessage::TurnFinished => {
                debug!("turn finished");
                self.turn_in_flight = false;
            }
            TuiMessage::Quit => self.should_quit = true,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.input.push(c);
        self.on_input_changed();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.input.pop().is_some() {
            self.on_input_changed();
        }
    }

    /// Enter pressed. Refused while a turn is in flight; the draft stays.
    pub fn request_submit(&mut self) {
        if self.turn_in_flight {
            debug!("submit ignored: turn in flight");
            return;
        }
        self.pending_submission = Some(self.input.clone());
    }

    /// Take the pending submission, if any.
    pub fn take_submission(&mut self) -> Option<String> {
        self.pending_submission.take()
    }

    /// Re-run the auto-resize rule after an input change.
    pub fn on_input_changed(&mut self) {
        let rows = wrapped_rows(&self.input, self.input_width);
        self.autosize.on_input(rows, self.input.trim().is_empty());
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.follow_bottom = false;
        self.scroll = self.scroll.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.scroll = self.scroll.saturating_add(rows);
    }

    /// Pin the transcript to the bottom again.
    pub fn follow(&mut self) {
        self.follow_bottom = true;
        self.pending_scroll = true;
    }

    /// Clamp the scroll offset for this frame's content height and apply
    /// any pending scroll-to-bottom.
    pub fn settle_scroll(&mut self, content_rows: u16, viewport_height: u16) {
        self.viewport_height = viewport_height;
        let max_scroll = content_rows.saturating_sub(viewport_height);
        if self.pending_scroll || self.follow_bottom {
            self.scroll = max_scroll;
            self.pending_scroll = false;
        } else {
            self.scroll = self.scroll.min(max_scroll);
            if self.scroll == max_scroll {
                self.follow_bottom = true;
            }
        }
    }

    /// Short status for the status bar.
    pub fn status_label(&self) -> &'static str {
        if self.turn_in_flight {
            "waiting for reply"
        } else {
            "idle"
        }
    }
}

impl ChatView for ChatApp {
    fn append_message(&mut self, message: ChatMessage) {
        self.transcript.append_message(message);
    }

    fn set_message_text(&mut self, id: MessageId, text: &str) {
        self.transcript.set_message_text(id, text);
    }

    fn append_sources(&mut self, id: MessageId, sources: &[String]) {
        self.transcript.append_sources(id, sources);
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.on_input_changed();
    }

    fn schedule_scroll(&mut self) {
        self.follow();
    }
}
