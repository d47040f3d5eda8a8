//! Input modes.
//!
//! The navigator is always in exactly one [`Mode`]:
//!
//! | Mode    | Cursor | Keys mean                                   |
//! |---------|--------|---------------------------------------------|
//! | Normal  | hidden | single-key navigation and actions           |
//! | Command | bar    | text for the `:` command line               |
//!
//! The enum is pure data. Transitions and their side effects live in
//! [`Navigator::set_mode`](crate::navigator::Navigator::set_mode).

use std::fmt;

/// The active input mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Keys are navigation commands.
    #[default]
    Normal,
    /// Keys are appended to the command line until Enter or Esc.
    Command,
}

impl Mode {
    /// Name shown in the status readout.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Command => "COMMAND",
        }
    }

    /// True if keys are treated as text input.
    #[inline]
    #[must_use]
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Command)
    }

    /// Whether the host should show a text cursor.
    #[inline]
    #[must_use]
    pub const fn shows_cursor(self) -> bool {
        self.is_input()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
