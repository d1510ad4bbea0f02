//! Viewer state and key handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use duet_core::{compare, CompareOptions, DiffError, DiffResult, HighlightMode};
use unicode_width::UnicodeWidthStr;

/// One side of the comparison as loaded from disk
pub struct Document {
    pub name: String,
    pub raw: String,
}

pub struct App {
    pub left: Document,
    pub right: Document,
    pub options: CompareOptions,
    pub result: DiffResult,
    pub mode: HighlightMode,
    /// First visible row
    pub scroll: usize,
    /// Row change navigation starts from; can sit below `scroll` near the end
    pub cursor: usize,
    /// First visible column
    pub h_scroll: usize,
    /// Rows visible in the last rendered frame
    pub viewport_height: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        left: Document,
        right: Document,
        options: CompareOptions,
        mode: HighlightMode,
    ) -> Result<Self, DiffError> {
        let result = compare(&left.raw, &right.raw, &options)?;
        Ok(Self {
            left,
            right,
            options,
            result,
            mode,
            scroll: 0,
            cursor: 0,
            h_scroll: 0,
            viewport_height: 1,
            should_quit: false,
        })
    }

    fn recompute(&mut self) -> Result<(), DiffError> {
        self.result = compare(&self.left.raw, &self.right.raw, &self.options)?;
        self.scroll = self.scroll.min(self.max_scroll());
        self.cursor = self.cursor.min(self.result.len().saturating_sub(1));
        tracing::debug!(
            rows = self.result.len(),
            ignore_punctuation = self.options.ignore_punctuation,
            "recomputed diff"
        );
        Ok(())
    }

    pub fn toggle_punctuation(&mut self) -> Result<(), DiffError> {
        self.options.ignore_punctuation = !self.options.ignore_punctuation;
        self.recompute()
    }

    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
    }

    fn max_scroll(&self) -> usize {
        self.result.len().saturating_sub(self.viewport_height)
    }

    fn max_h_scroll(&self) -> usize {
        self.result
            .rows()
            .map(|(l, r)| l.text().width().max(r.text().width()))
            .max()
            .unwrap_or(0)
            .saturating_sub(1)
    }

    fn scroll_to(&mut self, row: usize) {
        self.scroll = row.min(self.max_scroll());
        self.cursor = self.scroll;
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll_to(self.scroll + n);
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll_to(self.scroll.saturating_sub(n));
    }

    pub fn scroll_right(&mut self, n: usize) {
        self.h_scroll = (self.h_scroll + n).min(self.max_h_scroll());
    }

    pub fn scroll_left(&mut self, n: usize) {
        self.h_scroll = self.h_scroll.saturating_sub(n);
    }

    /// True for the first row of a run of changed rows
    fn is_change_start(&self, row: usize) -> bool {
        self.result.is_changed_row(row) && (row == 0 || !self.result.is_changed_row(row - 1))
    }

    pub fn next_change(&mut self) {
        if let Some(row) = (self.cursor + 1..self.result.len()).find(|&r| self.is_change_start(r)) {
            self.jump_to_change(row);
        }
    }

    pub fn prev_change(&mut self) {
        if let Some(row) = (0..self.cursor).rev().find(|&r| self.is_change_start(r)) {
            self.jump_to_change(row);
        }
    }

    fn jump_to_change(&mut self, row: usize) {
        self.cursor = row;
        self.scroll = row.min(self.max_scroll());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<(), DiffError> {
        let page = self.viewport_height.max(1);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(1),
            KeyCode::Char('l') | KeyCode::Right => self.scroll_right(4),
            KeyCode::Char('h') | KeyCode::Left => self.scroll_left(4),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll_down(page),
            KeyCode::PageUp => self.scroll_up(page),
            KeyCode::Char('g') | KeyCode::Home => self.scroll_to(0),
            KeyCode::Char('G') | KeyCode::End => self.scroll_to(self.max_scroll()),
            KeyCode::Char('n') => self.next_change(),
            KeyCode::Char('N') => self.prev_change(),
            KeyCode::Char('m') => self.cycle_mode(),
            KeyCode::Char('p') => self.toggle_punctuation()?,
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(left: &str, right: &str) -> App {
        App::new(
            Document {
                name: "left".into(),
                raw: left.into(),
            },
            Document {
                name: "right".into(),
                raw: right.into(),
            },
            CompareOptions::new(),
            HighlightMode::Smart,
        )
        .unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
    }

    #[test]
    fn test_scroll_is_clamped() {
        let text = (0..10).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut app = app(&text, &text);
        app.viewport_height = 4;

        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.scroll, 6);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.scroll, 6);
        press(&mut app, KeyCode::Char('g'));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_change_navigation() {
        let left = "a\nb\nc\nd\ne\nf";
        let right = "a\nB\nc\nd\nE\nf";
        let mut app = app(left, right);
        app.viewport_height = 1;

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.scroll, 1);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.scroll, 4);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.scroll, 4);
        press(&mut app, KeyCode::Char('N'));
        assert_eq!(app.scroll, 1);
    }

    #[test]
    fn test_change_navigation_past_last_page() {
        let left = "a\nb\nc\nd\ne\nf\ng\nh";
        let right = "a\nb\nc\nd\ne\nF\ng\nH";
        let mut app = app(left, right);
        app.viewport_height = 4;

        press(&mut app, KeyCode::Char('n'));
        assert_eq!((app.scroll, app.cursor), (4, 5));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!((app.scroll, app.cursor), (4, 7));
        press(&mut app, KeyCode::Char('N'));
        assert_eq!((app.scroll, app.cursor), (4, 5));

        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.cursor, 0);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.cursor, 5);
    }

    #[test]
    fn test_toggle_punctuation_recomputes() {
        let mut app = app("你好，世界", "你好,世界");
        assert!(!app.result.is_identical());

        press(&mut app, KeyCode::Char('p'));
        assert!(app.options.ignore_punctuation);
        assert!(app.result.is_identical());
    }

    #[test]
    fn test_mode_cycles_and_quit() {
        let mut app = app("a", "a");
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.mode, HighlightMode::WholeLine);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
