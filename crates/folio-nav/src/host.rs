//! The [`Host`] trait: everything the navigator asks of its display.
//!
//! The navigator owns no rendering. It tells the host which section is
//! active, which item is selected, when to scroll and when a transition
//! starts or ends, and asks it for the items of a section and their
//! geometry. Only [`Host::items`] is required; every other method has a
//! neutral default so test doubles stay small.

use chrono::{DateTime, Local};

use crate::section::{Item, Section, SectionId};
pub use crate::selection::{Bounds, Viewport};
use crate::status::Status;

pub trait Host {
    /// The selectable items of `section`, in display order. Called on every
    /// section switch and refresh, never cached by the navigator.
    fn items(&mut self, section: &Section) -> Vec<Item>;

    /// Show (`true`) or hide (`false`) a section.
    fn set_section_active(&mut self, _section: &SectionId, _active: bool) {}

    /// The highlighted item changed.
    fn on_selection(&mut self, _section: &SectionId, _index: Option<usize>) {}

    /// Vertical extent of item `index` of `section`, if it is laid out.
    fn item_bounds(&self, _section: &SectionId, _index: usize) -> Option<Bounds> {
        None
    }

    /// The visible window over the content.
    fn viewport(&self) -> Option<Viewport> {
        None
    }

    /// Scroll the content by `delta` units (positive is down).
    fn scroll_by(&mut self, _delta: i32) {}

    /// Give input focus to the command line, or take it away.
    fn focus_command_line(&mut self, _focused: bool) {}

    fn on_status(&mut self, _status: &Status) {}

    fn start_transition(&mut self, _section: &SectionId) {}

    fn end_transition(&mut self, _section: &SectionId) {}

    /// Open a link target of a non-menu item.
    fn activate(&mut self, _link: &str) {}

    /// Re-read the blog posts and rebuild the posts section.
    fn load_posts(&mut self) {}

    fn set_vim_flag(&mut self, _on: bool) {}

    /// Shut the application down.
    fn close(&mut self) {}

    /// Wall-clock time for `time` and the clock readout.
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    /// Called about once a second with the current time.
    fn on_clock(&mut self, _now: DateTime<Local>) {}
}
