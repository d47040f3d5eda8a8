//! Section layout: blocks flowed into terminal rows.
//!
//! Each block becomes its title row (if it has a title), its body wrapped
//! to the content width, and one blank separator row. Selectable blocks
//! remember where they start so the host can report item geometry.
//!
//! Geometry goes to the navigator in host units of [`ROW_UNITS`] per row,
//! which puts the 50-unit scroll deadband at about three rows.

use unicode_width::UnicodeWidthChar;

use crate::site::SectionDef;

/// Host units per terminal row.
pub const ROW_UNITS: i32 = 16;

/// Columns reserved left of the text for the selection marker and gutter.
pub const INDENT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Title,
    Body,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub text: String,
    pub kind: RowKind,
    /// Index of the selectable item this row belongs to.
    pub item: Option<usize>,
}

/// Start row and height (without the separator) of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub top: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub rows: Vec<Row>,
    pub items: Vec<Span>,
}

impl Layout {
    /// Lay out `def` for a terminal `width` columns wide.
    #[must_use]
    pub fn build(def: &SectionDef, width: usize) -> Self {
        let text_width = width.saturating_sub(INDENT + 1).max(8);
        let mut layout = Self::default();

        for block in &def.blocks {
            let item = block.matches(&def.section.selector).then_some(layout.items.len());
            let top = layout.rows.len();

            if let Some(title) = block.title.as_deref().filter(|t| !t.trim().is_empty()) {
                for text in wrap(title, text_width) {
                    layout.push(text, RowKind::Title, item);
                }
            }
            for line in block.body.lines() {
                for text in wrap(line, text_width) {
                    layout.push(text, RowKind::Body, item);
                }
            }
            // An item needs at least one row to be selectable on screen.
            if layout.rows.len() == top && item.is_some() {
                layout.push(String::new(), RowKind::Body, item);
            }
            if item.is_some() {
                layout.items.push(Span {
                    top,
                    height: layout.rows.len() - top,
                });
            }
            layout.push(String::new(), RowKind::Blank, None);
        }
        layout
    }

    fn push(&mut self, text: String, kind: RowKind, item: Option<usize>) {
        self.rows.push(Row { text, kind, item });
    }

    /// The item drawn on `row`, if any.
    #[must_use]
    pub fn item_at(&self, row: usize) -> Option<usize> {
        self.rows.get(row).and_then(|r| r.item)
    }
}

/// Word-wrap one line to `width` columns. Words longer than a line are
/// split. An empty line stays one empty row.
#[must_use]
pub fn wrap(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut col = 0;

    for word in line.split_whitespace() {
        let word_width: usize = word.chars().map(|c| c.width().unwrap_or(0)).sum();
        let gap = usize::from(col > 0);
        if col + gap + word_width <= width {
            if gap == 1 {
                current.push(' ');
            }
            current.push_str(word);
            col += gap + word_width;
            continue;
        }
        if col > 0 {
            rows.push(std::mem::take(&mut current));
            col = 0;
        }
        for ch in word.chars() {
            let w = ch.width().unwrap_or(0);
            if col + w > width {
                rows.push(std::mem::take(&mut current));
                col = 0;
            }
            current.push(ch);
            col += w;
        }
    }
    if col > 0 || rows.is_empty() {
        rows.push(current);
    }
    rows
}
