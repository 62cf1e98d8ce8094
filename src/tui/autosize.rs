//! Input box auto-resize: grow once on overflow, shrink back when emptied.

/// Visible-height state of the input box, owned by the app instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputAutoResize {
    initial_rows: u16,
    rows: u16,
    expanded: bool,
}

impl InputAutoResize {
    pub fn new(initial_rows: u16) -> Self {
        let initial_rows = initial_rows.max(1);
        Self {
            initial_rows,
            rows: initial_rows,
            expanded: false,
        }
    }

    /// Current visible rows (excluding borders).
    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// React to an input change. `content_rows` is the wrapped height of
    /// the content at the current width.
    pub fn on_input(&mut self, content_rows: u16, content_is_blank: bool) {
        if content_rows > self.rows && !self.expanded {
            self.rows = self.rows.saturating_mul(2);
            self.expanded = true;
        } else if content_is_blank {
            self.rows = self.initial_rows;
            self.expanded = false;
        }
    }
}

/// Rows `text` occupies when wrapped at `width` columns.
pub fn wrapped_rows(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = text
        .split('\n')
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}
