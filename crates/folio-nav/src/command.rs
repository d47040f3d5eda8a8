//! Command-line mode: the `:` prompt at the bottom of the screen.
//!
//! When the user presses `:` in normal mode, the navigator enters command
//! mode and keys edit a [`CommandLine`]. Enter submits it, Escape cancels.
//!
//! # Built-in commands
//!
//! | Command         | Action                                          |
//! |-----------------|-------------------------------------------------|
//! | `help`          | Show keys and commands                          |
//! | `ls`            | List the items of the current section           |
//! | `pwd`           | Print the path of the current section           |
//! | `cd <name>`     | Go to `<name>-section`; `cd`, `cd ..`, `cd ~` go home |
//! | `menu`          | Go back to the menu                             |
//! | `clear`         | Remove all messages                             |
//! | `exit`          | Ask for confirmation, then close                |
//! | `vim`           | Toggle the vim display flag                     |
//! | `theme`         | Theme switching (not implemented)               |
//! | `time`          | Show the current local time                     |
//! | `refresh`       | Reload blog posts (posts section only)          |
//!
//! Any other word `w` for which a section `w-section` exists navigates to
//! it. Built-ins win when names collide.
//!
//! # Architecture
//!
//! The command line is a string buffer with a cursor counted in grapheme
//! clusters. On Enter the text goes through [`parse_line`] into an
//! [`Invocation`], whose name is looked up in the [`BUILTINS`] dispatch
//! table. Executing the resulting [`Builtin`] is the navigator's job.

use unicode_segmentation::UnicodeSegmentation;

// ---------------------------------------------------------------------------
// Builtin
// ---------------------------------------------------------------------------

/// A built-in command, the action side of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Help,
    Ls,
    Pwd,
    Cd,
    Menu,
    Clear,
    Exit,
    Vim,
    Theme,
    Time,
    Refresh,
}

/// Name → action. Order is the order shown by `help` and autocomplete.
pub const BUILTINS: &[(&str, Builtin)] = &[
    ("help", Builtin::Help),
    ("ls", Builtin::Ls),
    ("pwd", Builtin::Pwd),
    ("cd", Builtin::Cd),
    ("menu", Builtin::Menu),
    ("clear", Builtin::Clear),
    ("exit", Builtin::Exit),
    ("vim", Builtin::Vim),
    ("theme", Builtin::Theme),
    ("time", Builtin::Time),
    ("refresh", Builtin::Refresh),
];

impl Builtin {
    /// Look up a lower-case command name.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        BUILTINS.iter().find(|(n, _)| *n == name).map(|&(_, b)| b)
    }

    /// One-line description for `help`.
    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::Help => "show this help",
            Self::Ls => "list items in this section",
            Self::Pwd => "print current location",
            Self::Cd => "change section (cd .. for menu)",
            Self::Menu => "back to the menu",
            Self::Clear => "clear messages",
            Self::Exit => "leave",
            Self::Vim => "toggle vim mode display",
            Self::Theme => "switch theme",
            Self::Time => "show the time",
            Self::Refresh => "reload blog posts",
        }
    }
}

/// Built-in names starting with `partial` (compared lower-cased).
#[must_use]
pub fn completions(partial: &str) -> Vec<&'static str> {
    let partial = partial.trim_start().to_lowercase();
    BUILTINS
        .iter()
        .map(|&(name, _)| name)
        .filter(|name| name.starts_with(&partial))
        .collect()
}

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// A parsed command line: lower-cased name plus raw argument words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub name: String,
    pub args: Vec<String>,
}

/// Trim and split `line` on whitespace. `None` for a blank line.
#[must_use]
pub fn parse_line(line: &str) -> Option<Invocation> {
    let mut words = line.split_whitespace();
    let name = words.next()?.to_lowercase();
    Some(Invocation {
        name,
        args: words.map(str::to_string).collect(),
    })
}

// ---------------------------------------------------------------------------
// CommandLine
// ---------------------------------------------------------------------------

/// The command-line input buffer.
///
/// The leading `:` is not stored, it is drawn by the host.
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    input: String,
    /// Cursor position in grapheme clusters.
    cursor: usize,
}

impl CommandLine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text left of the cursor, for placing the terminal cursor.
    #[must_use]
    pub fn before_cursor(&self) -> &str {
        &self.input[..self.byte_offset(self.cursor)]
    }

    fn len(&self) -> usize {
        self.input.graphemes(true).count()
    }

    fn byte_offset(&self, grapheme: usize) -> usize {
        self.input
            .grapheme_indices(true)
            .nth(grapheme)
            .map_or(self.input.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        let before = self.len();
        self.input.insert(at, ch);
        // A combining mark merges into the previous cluster.
        if self.len() > before {
            self.cursor += 1;
        }
    }

    /// Insert pasted text; newlines and other control characters are dropped.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars().filter(|c| !c.is_control()) {
            self.insert_char(ch);
        }
    }

    /// Delete the grapheme before the cursor. `false` at the start.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.input.replace_range(start..end, "");
        true
    }

    /// Delete the grapheme under the cursor. `false` at the end.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.input.replace_range(start..end, "");
        true
    }

    pub const fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    /// Replace the contents and put the cursor at the end.
    pub fn set(&mut self, text: &str) {
        self.input.clear();
        self.input.push_str(text);
        self.cursor = self.len();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Take the contents, leaving the line empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }
}
