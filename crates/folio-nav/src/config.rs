//! Navigator timing and behavior settings.
//!
//! Read from the `[navigator]` table of the site file; every field is
//! optional and falls back to [`NavigatorConfig::default`].

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigatorConfig {
    /// How long a message stays up without interaction.
    pub message_ms: u64,
    /// Delay before a key or click may dismiss a fresh message.
    pub dismiss_arm_ms: u64,
    /// Window for the `gg` double press.
    pub double_press_ms: u64,
    /// Length of the section switch transition.
    pub transition_ms: u64,
    /// Items moved by page up / page down.
    pub page_size: usize,
    /// Scroll corrections up to this many host units are skipped.
    pub scroll_deadband: i32,
    /// Command lines remembered.
    pub history_limit: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            message_ms: 4000,
            dismiss_arm_ms: 100,
            double_press_ms: 500,
            transition_ms: 300,
            page_size: 5,
            scroll_deadband: 50,
            history_limit: crate::history::DEFAULT_LIMIT,
        }
    }
}

impl NavigatorConfig {
    #[must_use]
    pub const fn message_lifetime(&self) -> Duration {
        Duration::from_millis(self.message_ms)
    }

    #[must_use]
    pub const fn dismiss_arm_delay(&self) -> Duration {
        Duration::from_millis(self.dismiss_arm_ms)
    }

    #[must_use]
    pub const fn double_press_window(&self) -> Duration {
        Duration::from_millis(self.double_press_ms)
    }

    #[must_use]
    pub const fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Page size, at least one item.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page_size.max(1)
    }
}
