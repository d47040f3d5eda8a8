// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: one thread, one loop.
//
// Stdin chunks arrive from the background reader; the loop blocks on the
// channel with a tick timeout. Every iteration:
//
//   1. parse received bytes into events and hand each to the app
//      (on an idle timeout, flush a pending lone ESC instead)
//   2. pick up a SIGWINCH resize
//   3. tick the app (clock, message expiry, transition end)
//   4. repaint changed rows if anything is dirty
//
// All application state changes therefore happen synchronously on this
// thread; nothing the app does can block input for longer than one
// handler call.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::input::{Event, Parser};
use crate::reader::StdinReader;
use crate::screen::Screen;
use crate::terminal::{self, Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the app wants after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Application driven by [`EventLoop`]. Only [`paint`](App::paint) is
/// required.
pub trait App {
    /// Handle one input event.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The terminal was resized; the screen already has the new size.
    fn on_resize(&mut self, _size: Size) {}

    /// Called every iteration. Return `true` to request a repaint.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Fill the screen rows for this frame. The screen is blank on entry.
    fn paint(&mut self, screen: &mut Screen);

    /// Where the hardware cursor goes after painting, `None` to hide it.
    fn cursor(&self) -> Option<(u16, u16)> {
        None
    }
}

// ─── Config ──────────────────────────────────────────────────────────────────

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Channel wait per iteration. Also the lone-ESC timeout.
    pub tick_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(25),
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    config: LoopConfig,
}

impl EventLoop {
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn with_config(config: LoopConfig) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            parser: Parser::new(),
            config,
        })
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the app returns [`Action::Quit`] or stdin closes. The
    /// terminal is restored on every exit path.
    ///
    /// # Errors
    ///
    /// Returns an error if entering, rendering, or leaving fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = StdinReader::spawn().and_then(|(mut reader, rx)| {
            let result = self.run_inner(app, &rx);
            reader.stop();
            result
        });

        self.terminal.leave()?;
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<()> {
        let mut screen = Screen::new(self.terminal.size());
        let mut dirty = true;

        loop {
            let events = match rx.recv_timeout(self.config.tick_interval) {
                Ok(bytes) => self.parser.advance(&bytes),
                Err(RecvTimeoutError::Timeout) if self.parser.has_pending() => self.parser.flush(),
                Err(RecvTimeoutError::Timeout) => Vec::new(),
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("stdin closed, leaving event loop");
                    return Ok(());
                }
            };

            for event in &events {
                if app.on_event(event) == Action::Quit {
                    return Ok(());
                }
            }
            dirty |= !events.is_empty();

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                screen.resize(size);
                app.on_resize(size);
                dirty = true;
            }

            dirty |= app.on_tick();

            if dirty {
                screen.clear();
                app.paint(&mut screen);

                let mut out = io::stdout().lock();
                screen.render(&mut out)?;
                match app.cursor() {
                    Some((x, y)) => write!(out, "\x1b[{};{}H{}", y + 1, x + 1, terminal::CURSOR_SHOW)?,
                    None => write!(out, "{}", terminal::CURSOR_HIDE)?,
                }
                out.flush()?;
                dirty = false;
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    struct Blank;

    impl App for Blank {
        fn paint(&mut self, _screen: &mut Screen) {}
    }

    #[test]
    fn default_tick_is_25ms() {
        assert_eq!(LoopConfig::default().tick_interval, Duration::from_millis(25));
    }

    #[test]
    fn app_defaults() {
        let mut app = Blank;
        assert_eq!(app.on_event(&Event::FocusGained), Action::Continue);
        assert!(!app.on_tick());
        assert!(app.cursor().is_none());
        app.on_resize(Size { cols: 100, rows: 40 });
    }

    #[test]
    fn event_loop_reports_size() {
        let event_loop = EventLoop::with_config(LoopConfig::default()).unwrap();
        assert!(event_loop.size().cols > 0);
    }

    #[test]
    fn sigwinch_flag_swap() {
        SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
        assert!(SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed));
        assert!(!SIGWINCH_RECEIVED.load(Ordering::Relaxed));
    }
}
