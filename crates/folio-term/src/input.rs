// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into the events the navigator cares about: keys,
// mouse presses (used to dismiss messages), focus changes (losing focus
// cancels the command line), and bracketed paste (inserted into the
// command line verbatim).
//
// Supported encodings:
//
// - C0 control bytes (Ctrl+letter, Enter, Tab, Backspace)
// - UTF-8 text, one event per scalar value
// - Legacy CSI sequences with xterm modifier parameters
// - SS3 arrows / Home / End (application cursor mode)
// - SGR mouse reports
// - Focus reports (`CSI I` / `CSI O`)
// - Bracketed paste (`CSI 200~` ... `CSI 201~`)
// - Alt+key as ESC-prefixed printable
//
// A lone ESC is ambiguous until the next read. The parser keeps it
// pending; the event loop calls [`Parser::flush`] on an idle tick.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A parsed terminal input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// A mouse button or wheel action.
    Mouse(MouseEvent),
    /// Text delivered through bracketed paste.
    Paste(String),
    /// The terminal window gained focus.
    FocusGained,
    /// The terminal window lost focus.
    FocusLost,
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key press with the given modifiers.
    #[must_use]
    pub const fn with(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// True if Ctrl is held.
    #[inline]
    #[must_use]
    pub const fn ctrl(self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}

/// Identity of a key.
///
/// Printable input arrives as [`Char`](KeyCode::Char) with shift already
/// applied by the terminal (`G`, not `g` + SHIFT).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    BackTab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Keyboard modifier flags, xterm encoding (`param = 1 + bits`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

/// A mouse action at a 0-indexed cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseKind,
    pub x: u16,
    pub y: u16,
}

/// What the mouse did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Press(MouseButton),
    Release(MouseButton),
    ScrollUp,
    ScrollDown,
}

impl MouseKind {
    /// True for button presses, the only mouse action that counts as a click.
    #[must_use]
    pub const fn is_press(self) -> bool {
        matches!(self, Self::Press(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

// ─── Parser ─────────────────────────────────────────────────────────────────

const PASTE_START: &[u8] = b"\x1b[200~";
const PASTE_END: &[u8] = b"\x1b[201~";

/// Incremental byte-to-event parser.
///
/// Incomplete sequences stay buffered across [`advance`](Parser::advance)
/// calls.
#[derive(Debug, Default)]
pub struct Parser {
    buf: Vec<u8>,
    in_paste: bool,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
            in_paste: false,
        }
    }

    /// Feed bytes and return every complete event.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            let rest = &self.buf[pos..];

            if self.in_paste {
                let Some(end) = find(rest, PASTE_END) else {
                    break;
                };
                events.push(Event::Paste(String::from_utf8_lossy(&rest[..end]).into_owned()));
                pos += end + PASTE_END.len();
                self.in_paste = false;
                continue;
            }

            if rest.starts_with(PASTE_START) {
                self.in_paste = true;
                pos += PASTE_START.len();
                continue;
            }
            // A strict prefix of the paste opener: wait for the rest.
            if rest.len() < PASTE_START.len() && rest.len() > 2 && PASTE_START.starts_with(rest) {
                break;
            }

            match scan(rest) {
                Scan::Event(event, used) => {
                    events.push(event);
                    pos += used;
                }
                Scan::Skip(used) => pos += used,
                Scan::Incomplete => break,
            }
        }

        self.buf.drain(..pos);
        events
    }

    /// True when bytes are buffered waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Resolve buffered bytes as literal keys (a lone ESC becomes Escape).
    pub fn flush(&mut self) -> Vec<Event> {
        if self.in_paste {
            return Vec::new();
        }
        let events = self
            .buf
            .iter()
            .filter_map(|&b| match b {
                0x1B => Some(KeyEvent::plain(KeyCode::Escape)),
                0x20..=0x7E => Some(KeyEvent::plain(KeyCode::Char(b as char))),
                _ => None,
            })
            .map(Event::Key)
            .collect();
        self.buf.clear();
        events
    }
}

// ─── Scanning ───────────────────────────────────────────────────────────────

enum Scan {
    Event(Event, usize),
    Skip(usize),
    Incomplete,
}

fn key(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent::with(code, modifiers))
}

fn scan(buf: &[u8]) -> Scan {
    match buf[0] {
        0x1B => scan_escape(buf),
        0x09 => Scan::Event(key(KeyCode::Tab, Modifiers::empty()), 1),
        0x0A | 0x0D => Scan::Event(key(KeyCode::Enter, Modifiers::empty()), 1),
        0x08 | 0x7F => Scan::Event(key(KeyCode::Backspace, Modifiers::empty()), 1),
        b @ 0x01..=0x1A => Scan::Event(key(KeyCode::Char(ctrl_letter(b)), Modifiers::CTRL), 1),
        b @ 0x20..=0x7E => Scan::Event(key(KeyCode::Char(b as char), Modifiers::empty()), 1),
        0xC0..=0xF7 => scan_utf8(buf),
        _ => Scan::Skip(1),
    }
}

const fn ctrl_letter(b: u8) -> char {
    (b + b'a' - 1) as char
}

fn scan_escape(buf: &[u8]) -> Scan {
    let Some(&second) = buf.get(1) else {
        return Scan::Incomplete;
    };
    match second {
        b'[' => scan_csi(buf),
        b'O' => scan_ss3(buf),
        0x1B => Scan::Event(key(KeyCode::Escape, Modifiers::ALT), 2),
        b @ 0x20..=0x7E => Scan::Event(key(KeyCode::Char(b as char), Modifiers::ALT), 2),
        _ => Scan::Event(key(KeyCode::Escape, Modifiers::empty()), 1),
    }
}

fn scan_csi(buf: &[u8]) -> Scan {
    let Some(&third) = buf.get(2) else {
        return Scan::Incomplete;
    };
    match third {
        b'<' => return scan_sgr_mouse(buf),
        b'I' => return Scan::Event(Event::FocusGained, 3),
        b'O' => return Scan::Event(Event::FocusLost, 3),
        _ => {}
    }

    // Parameter bytes (0x20..=0x3F) run until a final byte (0x40..=0x7E).
    let Some(offset) = buf[2..].iter().position(|b| !(0x20..=0x3F).contains(b)) else {
        return Scan::Incomplete;
    };
    let end = 2 + offset;
    if !(0x40..=0x7E).contains(&buf[end]) {
        return Scan::Skip(end);
    }
    let used = end + 1;
    let params = params(&buf[2..end]);
    let modifiers = params.get(1).copied().map_or(Modifiers::empty(), decode_modifiers);

    let code = match buf[end] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => KeyCode::BackTab,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            15 => KeyCode::F(5),
            n @ 17..=21 => KeyCode::F(fkey(n - 11)),
            n @ 23..=24 => KeyCode::F(fkey(n - 12)),
            _ => return Scan::Skip(used),
        },
        _ => return Scan::Skip(used),
    };
    Scan::Event(key(code, modifiers), used)
}

fn scan_ss3(buf: &[u8]) -> Scan {
    let Some(&third) = buf.get(2) else {
        return Scan::Incomplete;
    };
    let code = match third {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return Scan::Skip(3),
    };
    Scan::Event(key(code, Modifiers::empty()), 3)
}

/// `ESC [ < button ; x ; y (M|m)`, coordinates 1-indexed.
fn scan_sgr_mouse(buf: &[u8]) -> Scan {
    let body = &buf[3..];
    let Some(end) = body.iter().position(|&b| b == b'M' || b == b'm') else {
        return if body.iter().all(|b| b.is_ascii_digit() || *b == b';') {
            Scan::Incomplete
        } else {
            Scan::Skip(buf.len())
        };
    };
    let used = 3 + end + 1;
    let fields = params(&body[..end]);
    let [button, x, y] = fields[..] else {
        return Scan::Skip(used);
    };
    let release = body[end] == b'm';

    let kind = if button & 64 != 0 {
        if button & 1 == 0 {
            MouseKind::ScrollUp
        } else {
            MouseKind::ScrollDown
        }
    } else if button & 32 != 0 {
        // Motion reports are not needed.
        return Scan::Skip(used);
    } else {
        let which = match button & 3 {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            _ => MouseButton::Right,
        };
        if release {
            MouseKind::Release(which)
        } else {
            MouseKind::Press(which)
        }
    };

    Scan::Event(
        Event::Mouse(MouseEvent {
            kind,
            x: x.saturating_sub(1),
            y: y.saturating_sub(1),
        }),
        used,
    )
}

fn scan_utf8(buf: &[u8]) -> Scan {
    let len = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    };
    if buf.len() < len {
        return Scan::Incomplete;
    }
    std::str::from_utf8(&buf[..len])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Scan::Skip(1), |ch| {
            Scan::Event(key(KeyCode::Char(ch), Modifiers::empty()), len)
        })
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// Semicolon-separated decimal parameters; empty fields read as 0.
fn params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, b| acc.saturating_mul(10).saturating_add(u16::from(b - b'0')))
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation)]
const fn fkey(n: u16) -> u8 {
    n as u8
}

#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    Modifiers::from_bits_truncate(param.saturating_sub(1) as u8)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
