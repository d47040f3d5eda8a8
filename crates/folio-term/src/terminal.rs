// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, alternate screen, and RAII cleanup.
//
// Raw mode goes through termios directly (tcgetattr / tcsetattr) and the
// size query through ioctl(TIOCGWINSZ). Each unsafe block wraps exactly
// one libc call.
#![allow(unsafe_code)]
//
// Entering TUI mode switches to the alternate screen and enables SGR mouse
// clicks, focus reporting, and bracketed paste. Focus reporting matters
// here: losing focus cancels the command line.
//
// Cleanup runs on drop and from a panic hook that writes the restore
// sequence straight to fd 1, so a panic never leaves the shell in raw mode.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

// ─── Escape Sequences ───────────────────────────────────────────────────────

pub(crate) const ALT_SCREEN_ON: &str = "\x1b[?1049h";
pub(crate) const ALT_SCREEN_OFF: &str = "\x1b[?1049l";
pub(crate) const CURSOR_HIDE: &str = "\x1b[?25l";
pub(crate) const CURSOR_SHOW: &str = "\x1b[?25h";
pub(crate) const CLEAR_SCREEN: &str = "\x1b[2J";
/// Button-press mouse tracking with SGR coordinates.
const MOUSE_ON: &str = "\x1b[?1000h\x1b[?1006h";
const MOUSE_OFF: &str = "\x1b[?1006l\x1b[?1000l";
const FOCUS_ON: &str = "\x1b[?1004h";
const FOCUS_OFF: &str = "\x1b[?1004l";
const PASTE_ON: &str = "\x1b[?2004h";
const PASTE_OFF: &str = "\x1b[?2004l";

/// Everything [`Terminal::leave`] undoes, as one write for the panic hook.
const EMERGENCY_RESTORE: &[u8] =
    b"\x1b[?1006l\x1b[?1000l\x1b[?1004l\x1b[?2004l\x1b[0m\x1b[0 q\x1b[?25h\x1b[?1049l";

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Default for Size {
    fn default() -> Self {
        Self { cols: 80, rows: 24 }
    }
}

/// Query the terminal size. `None` when stdout is not a terminal.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };
    (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// True when stdin is a TTY.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Restore ─────────────────────────────────────────────────────

#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();
            original(info);
        }));
    });
}

fn emergency_restore() {
    #[cfg(unix)]
    {
        unsafe {
            let _ = libc::write(
                libc::STDOUT_FILENO,
                EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
                EMERGENCY_RESTORE.len(),
            );
        }
        if let Ok(guard) = TERMIOS_BACKUP.lock() {
            if let Some(ref original) = *guard {
                unsafe {
                    let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
                }
            }
        }
    }

    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(EMERGENCY_RESTORE);
        let _ = out.flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle. [`enter`](Self::enter) switches to TUI mode; dropping
/// the handle restores the terminal.
pub struct Terminal {
    #[cfg(unix)]
    original: Option<libc::termios>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// Create a handle and query the size (80×24 when unknown).
    ///
    /// # Errors
    ///
    /// Infallible today; kept fallible for platforms that need setup.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            original: None,
            size: get_size().unwrap_or_default(),
            active: false,
        })
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the size after SIGWINCH.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = get_size() {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter TUI mode. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if termios or the terminal write fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.enable_raw_mode()?;

        let mut out = io::stdout().lock();
        write!(
            out,
            "{ALT_SCREEN_ON}{CURSOR_HIDE}{CLEAR_SCREEN}{MOUSE_ON}{FOCUS_ON}{PASTE_ON}"
        )?;
        out.flush()?;

        self.active = true;
        tracing::debug!(cols = self.size.cols, rows = self.size.rows, "terminal entered");
        Ok(())
    }

    /// Leave TUI mode. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal write or termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        write!(
            out,
            "{PASTE_OFF}{FOCUS_OFF}{MOUSE_OFF}\x1b[0m{CURSOR_SHOW}{ALT_SCREEN_OFF}"
        )?;
        out.flush()?;
        drop(out);

        self.disable_raw_mode()?;
        self.active = false;
        tracing::debug!("terminal restored");
        Ok(())
    }

    // ── Raw Mode ────────────────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        if !is_tty() {
            return Ok(());
        }
        let fd = libc::STDIN_FILENO;
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        self.original = Some(termios);
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some(termios);
        }

        unsafe { libc::cfmakeraw(&raw mut termios) };
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const original) } != 0 {
            return Err(io::Error::last_os_error());
        }
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_size_is_80_by_24() {
        assert_eq!(Size::default(), Size { cols: 80, rows: 24 });
    }

    #[test]
    fn new_terminal_is_inactive() {
        let term = Terminal::new().unwrap();
        assert!(!term.is_active());
        assert!(term.size().cols > 0);
        assert!(term.size().rows > 0);
    }

    #[test]
    fn leave_without_enter_is_noop() {
        let mut term = Terminal::new().unwrap();
        term.leave().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn restore_sequence_ends_with_alt_screen_exit() {
        assert!(EMERGENCY_RESTORE.ends_with(ALT_SCREEN_OFF.as_bytes()));
    }
}
