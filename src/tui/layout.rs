//! Screen layout.
//!
//! ```text
//! ┌─ policychat ─ http://localhost:8000 ─────────────┐
//! │ you  What is the notice period?                  │
//! │ bot  Thirty days.                                │
//! │      Sources: hr-handbook.pdf                    │
//! ├─ Ask ────────────────────────────────────────────┤
//! │ > input (grows once on overflow)                 │
//! ├──────────────────────────────────────────────────┤
//! │ [idle] Enter:send  Shift+Enter:newline  Esc:quit │
//! └──────────────────────────────────────────────────┘
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::chat::{Entry, Role, Transcript};

use super::app::ChatApp;

/// Width of the role gutter (`you  ` / `bot  `).
const GUTTER: usize = 5;

/// Draw the full TUI layout.
pub fn draw(f: &mut Frame, app: &mut ChatApp) {
    let input_height = app.autosize.rows() + 2; // + borders
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // title bar
            Constraint::Min(3),               // transcript
            Constraint::Length(input_height), // input
            Constraint::Length(1),            // status bar
        ])
        .split(f.area());

    draw_title(f, app, outer[0]);
    draw_transcript(f, app, outer[1]);
    draw_input(f, app, outer[2]);
    draw_status(f, app, outer[3]);
}

fn draw_title(f: &mut Frame, app: &ChatApp, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " policychat ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", app.base_url), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_transcript(f: &mut Frame, app: &mut ChatApp, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);

    let lines = transcript_lines(&app.transcript, inner.width);
    let content_rows = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    app.settle_scroll(content_rows, inner.height);

    let para = Paragraph::new(lines).block(block).scroll((app.scroll, 0));
    f.render_widget(para, area);
}

/// Render transcript entries to styled lines, word-wrapped to `width`
/// so one line is one screen row.
pub fn transcript_lines(transcript: &Transcript, width: u16) -> Vec<Line<'static>> {
    let body_width = width.saturating_sub(GUTTER as u16).max(1);
    let mut lines = Vec::new();
    for entry in transcript.entries() {
        match entry {
            Entry::Message(msg) => {
                if msg.role == Role::User && !lines.is_empty() {
                    lines.push(Line::default());
                }
                let label_style = match msg.role {
                    Role::User => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    Role::Bot => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                };
                for (i, row) in wrap_words(&msg.text, body_width).into_iter().enumerate() {
                    let gutter = if i == 0 {
                        Span::styled(format!("{:<GUTTER$}", msg.role.label()), label_style)
                    } else {
                        Span::raw(" ".repeat(GUTTER))
                    };
                    lines.push(Line::from(vec![gutter, Span::raw(row)]));
                }
            }
            Entry::Sources { text, .. } => {
                let style = Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC);
                for row in wrap_words(text, body_width) {
                    lines.push(Line::from(vec![
                        Span::raw(" ".repeat(GUTTER)),
                        Span::styled(row, style),
                    ]));
                }
            }
        }
    }
    lines
}

/// Greedy word wrap at `width` characters. Words longer than a row are
/// split; runs of whitespace collapse to one space.
fn wrap_words(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let line_start = rows.len();
        let mut current = String::new();
        let mut current_len = 0;
        for word in line.split_whitespace() {
            let chars: Vec<char> = word.chars().collect();
            if current_len > 0 && current_len + 1 + chars.len() <= width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + chars.len();
                continue;
            }
            if current_len > 0 {
                rows.push(std::mem::take(&mut current));
            }
            let mut chunks = chars.chunks(width).peekable();
            while let Some(chunk) = chunks.next() {
                let piece: String = chunk.iter().collect();
                if chunks.peek().is_some() {
                    rows.push(piece);
                } else {
                    current_len = chunk.len();
                    current = piece;
                }
            }
        }
        if current_len > 0 || rows.len() == line_start {
            rows.push(current);
        }
    }
    rows
}

fn draw_input(f: &mut Frame, app: &mut ChatApp, area: Rect) {
    let border = if app.turn_in_flight {
        Color::DarkGray
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(" Ask ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    app.input_width = inner.width.max(1);

    let rows = wrap_chars(&app.input, app.input_width);
    let visible = usize::from(inner.height.max(1));
    let skip = rows.len().saturating_sub(visible);
    let cursor_x = rows.last().map(|r| r.chars().count()).unwrap_or(0) as u16;
    let cursor_y = (rows.len() - skip).saturating_sub(1) as u16;

    let lines: Vec<Line> = rows.into_iter().skip(skip).map(Line::from).collect();
    f.render_widget(Paragraph::new(lines).block(block), area);

    f.set_cursor_position(Position::new(
        inner.x + cursor_x.min(inner.width.saturating_sub(1)),
        inner.y + cursor_y,
    ));
}

/// Hard-wrap text into rows of at most `width` characters.
fn wrap_chars(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            rows.push(String::new());
            continue;
        }
        rows.extend(chars.chunks(width).map(|c| c.iter().collect::<String>()));
    }
    rows
}

fn draw_status(f: &mut Frame, app: &ChatApp, area: Rect) {
    let status_style = if app.turn_in_flight {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Green)
    };
    let turns = app
        .transcript
        .messages()
        .filter(|m| m.role == Role::User)
        .count();
    let line = Line::from(vec![
        Span::styled(format!("[{}]", app.status_label()), status_style),
        Span::styled(format!(" [turns: {turns}]"), Style::default().fg(Color::DarkGray)),
        Span::styled(
            "  Enter:send  Shift+Enter:newline  PgUp/PgDn:scroll  Esc:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatMessage, ChatView};
    use crate::tui::autosize::wrapped_rows;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn sample_transcript() -> Transcript {
        let mut t = Transcript::new();
        let bot = ChatMessage::placeholder();
        let id = bot.id;
        t.append_message(ChatMessage::user("What is the notice period?"));
        t.append_message(bot);
        t.set_message_text(id, "Thirty days.\nSee section 4.");
        t.append_sources(id, &["hr-handbook.pdf".into()]);
        t
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn transcript_renders_roles_and_sources() {
        let lines = transcript_lines(&sample_transcript(), 80);
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(
            texts,
            vec![
                "you  What is the notice period?",
                "bot  Thirty days.",
                "     See section 4.",
                "     Sources: hr-handbook.pdf",
            ]
        );
    }

    #[test]
    fn blank_line_between_turns() {
        let mut t = sample_transcript();
        t.append_message(ChatMessage::user("And for contractors?"));
        let lines = transcript_lines(&t, 80);
        assert_eq!(line_text(&lines[4]), "");
        assert_eq!(line_text(&lines[5]), "you  And for contractors?");
    }

    #[test]
    fn wrap_chars_matches_row_count() {
        for (text, width) in [("", 5), ("abcdefghij", 4), ("ab\n\ncdef", 2), ("xyz", 10)] {
            assert_eq!(wrap_chars(text, width).len(), usize::from(wrapped_rows(text, width)));
        }
        assert_eq!(wrap_chars("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_words_breaks_on_word_boundaries() {
        assert_eq!(wrap_words("the quick brown fox", 10), vec!["the quick", "brown fox"]);
        assert_eq!(wrap_words("", 10), vec![""]);
        assert_eq!(wrap_words("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(wrap_words("abcdefghijkl xy", 5), vec!["abcde", "fghij", "kl xy"]);
    }

    #[test]
    fn long_answer_wraps_to_one_line_per_row() {
        let mut t = Transcript::new();
        let bot = ChatMessage::placeholder();
        let id = bot.id;
        t.append_message(bot);
        t.set_message_text(id, "Employees accrue leave monthly and may carry over unused days");

        // 25 columns leave 20 for the body after the gutter.
        let lines = transcript_lines(&t, 25);
        let texts: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(
            texts,
            vec![
                "bot  Employees accrue",
                "     leave monthly and",
                "     may carry over",
                "     unused days",
            ]
        );
        assert!(lines.iter().all(|l| l.width() <= 25));
    }

    #[test]
    fn follow_bottom_shows_last_row_of_long_answer() {
        let backend = TestBackend::new(30, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = ChatApp::new("x", 2);
        let bot = ChatMessage::placeholder();
        let id = bot.id;
        app.transcript.append_message(ChatMessage::user("Tell me everything"));
        app.transcript.append_message(bot);
        let long = (1..=30).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ");
        app.transcript.set_message_text(id, &long);
        app.schedule_scroll();

        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("word30"));
        assert!(app.scroll > 0);
    }

    #[test]
    fn draw_renders_conversation() {
        let backend = TestBackend::new(60, 16);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = ChatApp::new("http://localhost:8000", 2);
        app.transcript = sample_transcript();

        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(screen.contains("policychat"));
        assert!(screen.contains("http://localhost:8000"));
        assert!(screen.contains("Thirty days."));
        assert!(screen.contains("Sources: hr-handbook.pdf"));
        assert!(screen.contains("[idle]"));
        assert_eq!(app.input_width, 58);
    }
}
