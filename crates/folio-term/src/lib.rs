// SPDX-License-Identifier: MIT
//
// folio-term: terminal layer for termfolio.
//
// Raw mode and the alternate screen, an input parser that understands keys,
// mouse clicks, focus changes and bracketed paste, a background stdin reader,
// a row-diffing line screen, and the event loop that ties them together.
//
// No TUI framework underneath: escape sequences and termios are driven
// directly, and only the features the navigator needs are enabled.

pub mod event_loop;
pub mod input;
pub mod reader;
pub mod screen;
pub mod terminal;
