//! The status readout: mode, section and position.

use std::fmt;

use crate::mode::Mode;

/// Snapshot handed to [`Host::on_status`](crate::host::Host::on_status)
/// after every state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub mode: Mode,
    /// Display name of the current section.
    pub section: String,
    pub item_count: usize,
    pub selected: Option<usize>,
}

impl Status {
    /// `3/7`, or `0/0` for an empty section.
    #[must_use]
    pub fn position(&self) -> String {
        match self.selected {
            Some(i) if self.item_count > 0 => format!("{}/{}", i + 1, self.item_count),
            _ => "0/0".to_string(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-- {} -- │ {} │ {}", self.mode, self.section, self.position())
    }
}
