//! TUI runner — main loop that wires everything together.
//!
//! Creates terminal, runs main TEA loop over the crossterm event stream,
//! spawns one task per turn.

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use futures::StreamExt;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::interval;
use tracing::info;

use crate::chat::TurnController;
use crate::config::ChatConfig;

use super::app::ChatApp;
use super::event::{ChannelView, TuiMessage};
use super::layout;

/// Start a turn for the pending submission, if any.
///
/// The user bubble and placeholder render synchronously into the app; the
/// network half runs on a spawned task writing back through the channel.
pub fn dispatch_submission(
    app: &mut ChatApp,
    controller: &TurnController,
    tx: &UnboundedSender<TuiMessage>,
) {
    let Some(raw) = app.take_submission() else {
        return;
    };
    let Some(turn) = controller.begin(app, &raw) else {
        return;
    };

    app.turn_in_flight = true;
    let mut sink = ChannelView::new(tx.clone());
    tokio::spawn(async move {
        turn.complete(&mut sink).await;
        sink.finish();
    });
}

/// Feed one item from the terminal event stream into the app.
/// Returns `Ok(false)` once the stream has ended.
pub fn apply_terminal_event(
    app: &mut ChatApp,
    event: Option<io::Result<Event>>,
) -> anyhow::Result<bool> {
    match event {
        Some(Ok(Event::Key(key))) => app.update(TuiMessage::Input(key)),
        Some(Ok(_)) => {}
        Some(Err(e)) => return Err(e.into()),
        None => return Ok(false),
    }
    Ok(true)
}

/// Run the TUI main loop. Blocks until quit.
pub async fn run_tui(config: &ChatConfig, controller: TurnController) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    info!(base_url = %config.base_url, "tui started");
    let result = main_loop(&mut terminal, config, &controller).await;

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result
}

async fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ChatConfig,
    controller: &TurnController,
) -> anyhow::Result<()> {
    let mut app = ChatApp::new(&config.base_url, config.input_rows);
    let (tx, mut rx) = mpsc::unbounded_channel::<TuiMessage>();

    let mut events = EventStream::new();
    let mut render_interval = interval(Duration::from_millis(33)); // ~30fps

    loop {
        tokio::select! {
            _ = render_interval.tick() => {
                terminal.draw(|f| layout::draw(f, &mut app))?;
            }
            Some(msg) = rx.recv() => {
                app.update(msg);
            }
            // EventStream buffers internally, so a losing branch drops no keys.
            maybe_event = events.next() => {
                if !apply_terminal_event(&mut app, maybe_event)? {
                    break;
                }
            }
        }

        dispatch_submission(&mut app, controller, &tx);

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::api::{ApiError, HealthStatus, QueryBackend, QueryResult};
    use crate::chat::Role;

    struct ReadyBackend;

    #[async_trait]
    impl QueryBackend for ReadyBackend {
        async fn health(&self) -> Result<HealthStatus, ApiError> {
            Ok(HealthStatus { ready: true })
        }

        async fn query(&self, query: &str) -> Result<QueryResult, ApiError> {
            Ok(QueryResult::new(&format!("echo: {query}"), &["faq.md"]))
        }
    }

    fn controller() -> TurnController {
        TurnController::new(Arc::new(ReadyBackend))
    }

    #[tokio::test]
    async fn submission_renders_then_completes_via_channel() {
        let controller = controller();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = ChatApp::new("x", 2);
        app.input = "  hello  ".into();
        app.request_submit();

        dispatch_submission(&mut app, &controller, &tx);

        // Synchronous half already rendered.
        assert!(app.turn_in_flight);
        assert!(app.input.is_empty());
        let texts: Vec<&str> = app.transcript.messages().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "Thinking..."]);

        // Drain the task's updates until it reports completion.
        while app.turn_in_flight {
            let msg = rx.recv().await.unwrap();
            app.update(msg);
        }

        let bot = app.transcript.messages().find(|m| m.role == Role::Bot).unwrap();
        assert_eq!(bot.text, "echo: hello");
        assert_eq!(app.transcript.sources_annotations(), vec!["Sources: faq.md"]);
        assert_eq!(app.transcript.messages().count(), 2);
    }

    #[tokio::test]
    async fn blank_submission_starts_nothing() {
        let controller = controller();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = ChatApp::new("x", 2);
        app.input = "   ".into();
        app.request_submit();

        dispatch_submission(&mut app, &controller, &tx);

        assert!(!app.turn_in_flight);
        assert!(app.transcript.is_empty());
        assert_eq!(app.input, "   ");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn terminal_keys_reach_the_app_in_order() {
        use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

        let mut app = ChatApp::new("x", 2);
        for c in "hi".chars() {
            let key = Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
            assert!(apply_terminal_event(&mut app, Some(Ok(key))).unwrap());
        }
        assert!(apply_terminal_event(&mut app, Some(Ok(Event::FocusGained))).unwrap());
        assert_eq!(app.input, "hi");
    }

    #[test]
    fn terminal_stream_end_and_errors_stop_the_loop() {
        let mut app = ChatApp::new("x", 2);
        assert!(!apply_terminal_event(&mut app, None).unwrap());

        let err = io::Error::new(io::ErrorKind::BrokenPipe, "tty gone");
        assert!(apply_terminal_event(&mut app, Some(Err(err))).is_err());
    }

    #[test]
    fn no_submission_is_a_no_op() {
        let controller = controller();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = ChatApp::new("x", 2);
        dispatch_submission(&mut app, &controller, &tx);
        assert!(app.transcript.is_empty());
    }
}
