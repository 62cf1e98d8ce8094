//! Key binding dispatch for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::ChatApp;

/// Rows moved by PageUp/PageDown when the viewport is unknown.
const PAGE_FALLBACK: u16 = 10;

/// Handle a key event, mutating app state.
pub fn handle_key(app: &mut ChatApp, key: KeyEvent) {
    // Windows reports releases too.
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Global bindings
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Esc => {
            app.should_quit = true;
            return;
        }
        _ => {}
    }

    let page = if app.viewport_height > 1 {
        app.viewport_height - 1
    } else {
        PAGE_FALLBACK
    };

    match key.code {
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            app.insert_newline()
        }
        KeyCode::Enter => app.request_submit(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.insert_char(c),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(page),
        KeyCode::PageDown => app.scroll_down(page),
        KeyCode::End => app.follow(),
        _ => {}
    }
}
