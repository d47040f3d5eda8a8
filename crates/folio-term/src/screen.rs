// SPDX-License-Identifier: MIT
//
// Line screen: styled rows with row-level diffing.
//
// The portfolio UI is made of whole lines (header, content rows, message
// stack, status line, command line), so the screen works per row instead
// of per cell. Each frame the application fills rows with styled spans;
// `render` encodes every row to its final escape-sequence form and writes
// only the rows whose encoding differs from the previous frame.
//
// Widths are measured with `unicode-width`. A wide character that would
// straddle the right edge is replaced by a space.

use std::io::{self, Write};

use bitflags::bitflags;
use unicode_width::UnicodeWidthChar;

use crate::terminal::Size;

// ─── Style ──────────────────────────────────────────────────────────────────

bitflags! {
    /// SGR text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Style: u8 {
        const BOLD      = 1 << 0;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE   = 1 << 4;
    }
}

/// The 16-color palette subset the UI uses. `Default` leaves the
/// terminal's own foreground in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Color {
    #[default]
    Default,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
}

impl Color {
    const fn sgr(self) -> u8 {
        match self {
            Self::Default => 39,
            Self::Red => 31,
            Self::Green => 32,
            Self::Yellow => 33,
            Self::Blue => 34,
            Self::Magenta => 35,
            Self::Cyan => 36,
            Self::White => 37,
            Self::Gray => 90,
        }
    }
}

// ─── Line ───────────────────────────────────────────────────────────────────

/// A run of text with one color and style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub fg: Color,
    pub style: Style,
}

/// A screen row: spans painted left to right, padded to the width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    spans: Vec<Span>,
    /// Style applied to the padding after the last span (for full-width bars).
    fill: Style,
}

impl Line {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A single unstyled span.
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self::new().span(text, Color::Default, Style::empty())
    }

    /// Append a span.
    #[must_use]
    pub fn span(mut self, text: impl Into<String>, fg: Color, style: Style) -> Self {
        self.spans.push(Span {
            text: text.into(),
            fg,
            style,
        });
        self
    }

    /// Style the padding to the right edge (e.g. `INVERSE` for a status bar).
    #[must_use]
    pub const fn fill(mut self, style: Style) -> Self {
        self.fill = style;
        self
    }

    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Concatenated text of all spans.
    #[must_use]
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Display width in columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.spans
            .iter()
            .flat_map(|s| s.text.chars())
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    /// Encode the row for a terminal `width` columns wide.
    fn encode(&self, width: usize) -> String {
        let mut out = String::with_capacity(width + 16);
        let mut col = 0;

        'spans: for span in &self.spans {
            push_sgr(&mut out, span.fg, span.style);
            for ch in span.text.chars() {
                let w = ch.width().unwrap_or(0);
                if w == 0 {
                    continue;
                }
                if col + w > width {
                    if col < width {
                        out.push(' ');
                        col += 1;
                    }
                    break 'spans;
                }
                out.push(ch);
                col += w;
            }
        }

        push_sgr(&mut out, Color::Default, self.fill);
        out.extend(std::iter::repeat_n(' ', width.saturating_sub(col)));
        out.push_str("\x1b[0m");
        out
    }
}

fn push_sgr(out: &mut String, fg: Color, style: Style) {
    use std::fmt::Write as _;

    out.push_str("\x1b[0");
    for (flag, code) in [
        (Style::BOLD, 1),
        (Style::DIM, 2),
        (Style::ITALIC, 3),
        (Style::UNDERLINE, 4),
        (Style::INVERSE, 7),
    ] {
        if style.contains(flag) {
            let _ = write!(out, ";{code}");
        }
    }
    let _ = write!(out, ";{}m", fg.sgr());
}

// ─── Screen ─────────────────────────────────────────────────────────────────

/// A frame of rows plus the encoding of the last frame written.
#[derive(Debug)]
pub struct Screen {
    size: Size,
    rows: Vec<Line>,
    written: Vec<Option<String>>,
}

impl Screen {
    #[must_use]
    pub fn new(size: Size) -> Self {
        let height = usize::from(size.rows);
        Self {
            size,
            rows: vec![Line::new(); height],
            written: vec![None; height],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.size.cols
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.size.rows
    }

    /// Resize and force a full redraw.
    pub fn resize(&mut self, size: Size) {
        let height = usize::from(size.rows);
        self.size = size;
        self.rows = vec![Line::new(); height];
        self.written = vec![None; height];
    }

    /// Blank every row for the next frame (the last write is kept for diffing).
    pub fn clear(&mut self) {
        self.rows.iter_mut().for_each(|row| *row = Line::new());
    }

    /// Set row `y`. Rows past the bottom are ignored.
    pub fn set(&mut self, y: u16, line: Line) {
        if let Some(row) = self.rows.get_mut(usize::from(y)) {
            *row = line;
        }
    }

    #[must_use]
    pub fn row(&self, y: u16) -> Option<&Line> {
        self.rows.get(usize::from(y))
    }

    /// Forget what was written so the next render repaints everything.
    pub fn invalidate(&mut self) {
        self.written.iter_mut().for_each(|w| *w = None);
    }

    /// Write changed rows to `out`. Returns how many rows were written.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `out`.
    pub fn render(&mut self, out: &mut impl Write) -> io::Result<usize> {
        let width = usize::from(self.size.cols);
        let mut changed = 0;

        for (y, (row, written)) in self.rows.iter().zip(self.written.iter_mut()).enumerate() {
            let encoded = row.encode(width);
            if written.as_deref() == Some(encoded.as_str()) {
                continue;
            }
            write!(out, "\x1b[{};1H{encoded}", y + 1)?;
            *written = Some(encoded);
            changed += 1;
        }

        Ok(changed)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strip(encoded: &str) -> String {
        let mut out = String::new();
        let mut chars = encoded.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn encode_pads_to_width() {
        let line = Line::raw("ls");
        assert_eq!(strip(&line.encode(5)), "ls   ");
    }

    #[test]
    fn encode_truncates_long_text() {
        let line = Line::raw("projects");
        assert_eq!(strip(&line.encode(4)), "proj");
    }

    #[test]
    fn wide_char_at_edge_becomes_space() {
        let line = Line::raw("ab日");
        assert_eq!(strip(&line.encode(3)), "ab ");
    }

    #[test]
    fn line_width_counts_wide_chars() {
        assert_eq!(Line::raw("日本").width(), 4);
        assert_eq!(Line::raw("menu").width(), 4);
    }

    #[test]
    fn spans_concatenate() {
        let line = Line::new()
            .span("-- NORMAL --", Color::Green, Style::BOLD)
            .span(" about", Color::Default, Style::empty());
        assert_eq!(line.text(), "-- NORMAL -- about");
        assert_eq!(line.spans().len(), 2);
    }

    #[test]
    fn sgr_includes_style_and_color() {
        let mut out = String::new();
        push_sgr(&mut out, Color::Cyan, Style::BOLD | Style::INVERSE);
        assert_eq!(out, "\x1b[0;1;7;36m");
    }

    #[test]
    fn render_writes_only_changed_rows() {
        let mut screen = Screen::new(Size { cols: 10, rows: 3 });
        screen.set(0, Line::raw("menu"));
        let mut out = Vec::new();
        assert_eq!(screen.render(&mut out).unwrap(), 3);

        screen.clear();
        screen.set(0, Line::raw("menu"));
        screen.set(2, Line::raw(":ls"));
        let mut out = Vec::new();
        assert_eq!(screen.render(&mut out).unwrap(), 1);
        assert!(String::from_utf8(out).unwrap().starts_with("\x1b[3;1H"));
    }

    #[test]
    fn invalidate_forces_full_repaint() {
        let mut screen = Screen::new(Size { cols: 4, rows: 2 });
        screen.render(&mut Vec::new()).unwrap();
        screen.invalidate();
        assert_eq!(screen.render(&mut Vec::new()).unwrap(), 2);
    }

    #[test]
    fn set_past_bottom_is_ignored() {
        let mut screen = Screen::new(Size { cols: 4, rows: 1 });
        screen.set(5, Line::raw("x"));
        assert!(screen.row(5).is_none());
    }
}
