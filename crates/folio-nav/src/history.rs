//! Command history: previously submitted command lines.
//!
//! Entries are kept most-recent-first. A separate browse cursor walks them
//! with Up (`older`) and Down (`newer`); `None` means "not browsing", i.e.
//! the command line shows whatever is being typed.
//!
//! The live buffer is not stashed when browsing starts: stepping back past
//! the newest entry gives an empty line.

use std::collections::VecDeque;

/// Default number of lines kept.
pub const DEFAULT_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    /// Index into `entries` of the line on display, `None` at the live edge.
    cursor: Option<usize>,
    limit: usize,
}

impl CommandHistory {
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            limit,
        }
    }

    /// Record a submitted line. Blank lines are ignored; the browse cursor
    /// goes back to the live edge either way.
    pub fn push(&mut self, line: &str) {
        self.cursor = None;
        if line.trim().is_empty() || self.limit == 0 {
            return;
        }
        self.entries.push_front(line.to_string());
        self.entries.truncate(self.limit);
    }

    /// Step to the next older entry. `None` (and no movement) when already
    /// at the oldest one or when there is no history.
    pub fn older(&mut self) -> Option<&str> {
        let next = self.cursor.map_or(0, |i| i + 1);
        if next >= self.entries.len() {
            return None;
        }
        self.cursor = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    /// Step to the next newer entry. Stepping past the newest entry returns
    /// to the live edge and yields an empty line.
    pub fn newer(&mut self) -> &str {
        match self.cursor {
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                self.entries.get(i - 1).map_or("", String::as_str)
            }
            _ => {
                self.cursor = None;
                ""
            }
        }
    }

    /// Leave browse mode without changing the entries.
    pub const fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}
