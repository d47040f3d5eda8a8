//! Selection engine: the highlighted item of the current section.
//!
//! [`Selection`] holds an index into a list of `count` items. Movement is
//! clamped, never wrapped: `move_up` at 0 and `move_down` at the last item
//! do nothing. Every operation is a no-op on an empty list. Each mutator
//! returns `true` when the index actually changed, which is what decides
//! whether the host is asked to scroll.
//!
//! Also here: the [`DoublePress`] detector behind `gg`, and
//! [`reveal_offset`], the centering calculation with its deadband.

use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Index of the selected item. Invariant: `index < count` when `count > 0`,
/// `index == 0` otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    index: usize,
    count: usize,
}

impl Selection {
    #[must_use]
    pub const fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    /// Replace the item count and go back to the first item.
    pub const fn reset(&mut self, count: usize) {
        self.index = 0;
        self.count = count;
    }

    #[inline]
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The selected index, `None` for an empty list.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        if self.count == 0 { None } else { Some(self.index) }
    }

    const fn last(&self) -> usize {
        self.count.saturating_sub(1)
    }

    const fn set(&mut self, index: usize) -> bool {
        if self.count == 0 || index == self.index {
            return false;
        }
        self.index = index;
        true
    }

    pub const fn move_up(&mut self) -> bool {
        self.set(self.index.saturating_sub(1))
    }

    pub fn move_down(&mut self) -> bool {
        self.set((self.index + 1).min(self.last()))
    }

    /// Move up by `min(page, distance to the top)`.
    pub const fn page_up(&mut self, page: usize) -> bool {
        self.set(self.index.saturating_sub(page))
    }

    /// Move down by `min(page, distance to the bottom)`.
    pub fn page_down(&mut self, page: usize) -> bool {
        self.set(self.index.saturating_add(page).min(self.last()))
    }

    pub const fn jump_to_top(&mut self) -> bool {
        self.set(0)
    }

    pub const fn jump_to_bottom(&mut self) -> bool {
        self.set(self.last())
    }

    /// Select a 0-based index if it is in range.
    pub const fn select_index(&mut self, index: usize) -> bool {
        if index >= self.count {
            return false;
        }
        self.set(index)
    }
}

// ---------------------------------------------------------------------------
// DoublePress
// ---------------------------------------------------------------------------

/// Detects two presses of the same key within a window (`gg`).
///
/// The first press arms the gesture. A second press inside the window
/// fires it and disarms; a second press at or after the window only
/// re-arms.
#[derive(Debug, Clone, Copy)]
pub struct DoublePress {
    window: Duration,
    last: Option<Instant>,
}

impl DoublePress {
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// Register a press at `now`; `true` when it completes the gesture.
    pub fn press(&mut self, now: Instant) -> bool {
        match self.last {
            Some(prev) if now.saturating_duration_since(prev) < self.window => {
                self.last = None;
                true
            }
            _ => {
                self.last = Some(now);
                false
            }
        }
    }

    /// Drop an armed first press (another key interrupted the sequence).
    pub const fn disarm(&mut self) {
        self.last = None;
    }

}

// ---------------------------------------------------------------------------
// Reveal
// ---------------------------------------------------------------------------

/// Vertical extent of an item in host units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub top: i32,
    pub height: i32,
}

/// The visible part of the scrollable content, in the same units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top: i32,
    pub height: i32,
}

/// Scroll delta that centers `item` in `viewport`, or `None` when the
/// correction is within `deadband`.
#[must_use]
pub fn reveal_offset(item: Bounds, viewport: Viewport, deadband: i32) -> Option<i32> {
    let item_center = item.top + item.height / 2;
    let view_center = viewport.top + viewport.height / 2;
    let offset = item_center - view_center;
    (offset.abs() > deadband).then_some(offset)
}
