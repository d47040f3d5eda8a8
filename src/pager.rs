//! Full-screen view of one blog post.
//!
//! The pager takes over the screen until it is closed with `q`, Esc or `h`.
//! The body is shown as plain text, wrapped to the terminal width. Heading
//! lines (`#`) are drawn bold, and the post header is drawn above them.

use folio_term::input::{KeyCode, KeyEvent};
use folio_term::screen::{Color, Line, Screen, Style};

use crate::blog::Post;
use crate::layout::wrap;

const MARGIN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerAction {
    Stay,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Title,
    Meta,
    Heading,
    Text,
}

#[derive(Debug)]
pub struct Pager {
    post: Post,
    rows: Vec<(Kind, String)>,
    width: usize,
    scroll: usize,
    /// Visible body rows, from the last paint.
    height: usize,
}

impl Pager {
    #[must_use]
    pub fn new(post: Post, width: usize) -> Self {
        let mut pager = Self {
            post,
            rows: Vec::new(),
            width: 0,
            scroll: 0,
            height: 1,
        };
        pager.reflow(width);
        pager
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.post.meta.title
    }

    #[cfg(test)]
    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    /// Rewrap for a new width.
    pub fn reflow(&mut self, width: usize) {
        if width == self.width && !self.rows.is_empty() {
            return;
        }
        self.width = width;
        let text_width = width.saturating_sub(2 * MARGIN).max(8);
        let meta = &self.post.meta;

        let mut rows = Vec::new();
        for line in wrap(&meta.title, text_width) {
            rows.push((Kind::Title, line));
        }
        let mut info = meta.display_date();
        if !meta.category.is_empty() {
            info.push_str(" · ");
            info.push_str(&meta.category);
        }
        rows.push((Kind::Meta, info));
        rows.push((Kind::Text, String::new()));

        for line in self.post.body.lines() {
            let kind = if line.starts_with('#') { Kind::Heading } else { Kind::Text };
            // Keep code indentation; wrapping would squeeze it.
            if line.starts_with("    ") || line.starts_with('\t') {
                rows.push((kind, line.to_string()));
                continue;
            }
            for row in wrap(line, text_width) {
                rows.push((kind, row));
            }
        }
        self.rows = rows;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(self.height)
    }

    fn scroll_to(&mut self, row: usize) {
        self.scroll = row.min(self.max_scroll());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PagerAction {
        let half = (self.height / 2).max(1);
        match key.code {
            KeyCode::Char('q' | 'h') | KeyCode::Escape | KeyCode::Left | KeyCode::Backspace => {
                return PagerAction::Close;
            }
            KeyCode::Char('c') if key.ctrl() => return PagerAction::Close,
            KeyCode::Char('d') if key.ctrl() => self.scroll_to(self.scroll + half),
            KeyCode::Char('u') if key.ctrl() => self.scroll_to(self.scroll.saturating_sub(half)),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Enter => self.scroll_to(self.scroll + 1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_to(self.scroll.saturating_sub(1)),
            KeyCode::Char(' ') | KeyCode::PageDown => self.scroll_to(self.scroll + self.height),
            KeyCode::PageUp => self.scroll_to(self.scroll.saturating_sub(self.height)),
            KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
            KeyCode::Char('G') | KeyCode::End => self.scroll = self.max_scroll(),
            _ => {}
        }
        PagerAction::Stay
    }

    /// Paint into rows `top..top + height` of `screen`.
    pub fn paint(&mut self, screen: &mut Screen, top: u16, height: u16) {
        self.reflow(usize::from(screen.width()));
        self.height = usize::from(height).max(1);
        self.scroll = self.scroll.min(self.max_scroll());

        let pad = " ".repeat(MARGIN);
        for (y, (kind, text)) in self.rows.iter().skip(self.scroll).take(self.height).enumerate() {
            let (fg, style) = match kind {
                Kind::Title => (Color::Cyan, Style::BOLD),
                Kind::Meta => (Color::Gray, Style::ITALIC),
                Kind::Heading => (Color::Yellow, Style::BOLD),
                Kind::Text => (Color::Default, Style::empty()),
            };
            let row = u16::try_from(y).unwrap_or(u16::MAX).saturating_add(top);
            screen.set(row, Line::raw(pad.clone()).span(text.clone(), fg, style));
        }
    }

    /// `42%` style position readout.
    #[must_use]
    pub fn position(&self) -> String {
        let max = self.max_scroll();
        if max == 0 {
            return "All".to_string();
        }
        if self.scroll == 0 {
            return "Top".to_string();
        }
        if self.scroll >= max {
            return "Bot".to_string();
        }
        format!("{}%", self.scroll * 100 / max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog::parse_post;
    use folio_term::input::Modifiers;
    use folio_term::terminal::Size;
    use pretty_assertions::assert_eq;

    fn pager(lines: usize) -> Pager {
        let body: String = (0..lines).map(|i| format!("line {i}\n")).collect();
        let text = format!("---\ntitle: Post\ndate: 2024-01-15\ncategory: Notes\n---\n# Heading\n{body}");
        Pager::new(parse_post("post.md", &text), 40)
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::plain(KeyCode::Char(c))
    }

    #[test]
    fn header_rows_come_first() {
        let mut p = pager(1);
        let mut screen = Screen::new(Size { cols: 40, rows: 10 });
        p.paint(&mut screen, 0, 10);
        assert_eq!(screen.row(0).unwrap().text(), "  Post");
        assert_eq!(screen.row(1).unwrap().text(), "  January 15, 2024 · Notes");
        assert_eq!(screen.row(3).unwrap().text(), "  # Heading");
        assert_eq!(screen.row(4).unwrap().text(), "  line 0");
    }

    #[test]
    fn scrolling_is_clamped() {
        // 3 header rows, heading, 20 body rows: 24 rows in a 10-row window.
        let mut p = pager(20);
        let mut screen = Screen::new(Size { cols: 40, rows: 10 });
        p.paint(&mut screen, 0, 10);

        assert_eq!(p.position(), "Top");
        p.handle_key(key('k'));
        assert_eq!(p.scroll(), 0);
        p.handle_key(key('j'));
        assert_eq!(p.scroll(), 1);
        p.handle_key(KeyEvent::with(KeyCode::Char('d'), Modifiers::CTRL));
        assert_eq!(p.scroll(), 6);
        p.handle_key(key('G'));
        assert_eq!(p.scroll(), 14);
        assert_eq!(p.position(), "Bot");
        p.handle_key(key(' '));
        assert_eq!(p.scroll(), 14);
        p.handle_key(key('g'));
        assert_eq!(p.scroll(), 0);
    }

    #[test]
    fn close_keys() {
        let mut p = pager(1);
        assert_eq!(p.handle_key(key('j')), PagerAction::Stay);
        assert_eq!(p.handle_key(key('q')), PagerAction::Close);
        assert_eq!(p.handle_key(KeyEvent::plain(KeyCode::Escape)), PagerAction::Close);
    }

    #[test]
    fn short_post_fits() {
        let mut p = pager(1);
        let mut screen = Screen::new(Size { cols: 40, rows: 10 });
        p.paint(&mut screen, 0, 10);
        assert_eq!(p.position(), "All");
        assert_eq!(p.title(), "Post");
    }
}
