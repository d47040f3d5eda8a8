//! Event and key dispatch.
//!
//! # Normal mode
//!
//! | Key                          | Action                     |
//! |------------------------------|----------------------------|
//! | `j` / Down, `k` / Up         | Next / previous item       |
//! | `Ctrl-d` / PageDown          | Page down                  |
//! | `Ctrl-u` / PageUp            | Page up                    |
//! | `gg` / Home                  | First item                 |
//! | `G` / End                    | Last item                  |
//! | Enter / `l` / Right          | Activate item              |
//! | `h` / Left / Backspace / Esc | Back to the menu           |
//! | `1`-`9`                      | Open menu entry N          |
//! | `:`                          | Command line               |
//! | `?`                          | Help                       |
//! | `Ctrl-c`, `Ctrl-q`           | Quit                       |
//!
//! # Command mode
//!
//! Printable keys edit the line. Enter runs it, Esc and `Ctrl-c` cancel,
//! Backspace on an empty line cancels too. Up/Down walk the history, Tab
//! completes. `Ctrl-q` asks before quitting.

use std::time::Instant;

use folio_term::input::{Event, KeyCode, KeyEvent, Modifiers, MouseKind};

use super::Navigator;
use crate::command::Builtin;
use crate::host::Host;
use crate::mode::Mode;

impl<H: Host> Navigator<H> {
    /// Feed one input event at time `now`.
    pub fn handle_event(&mut self, event: &Event, now: Instant) {
        self.now = now;
        match event {
            Event::Key(key) => {
                self.messages.dismiss_interaction(now);
                self.handle_key(*key);
            }
            Event::Mouse(mouse) => {
                if mouse.kind.is_press() {
                    self.messages.dismiss_interaction(now);
                }
                if self.mode == Mode::Normal && self.prompt.is_none() {
                    match mouse.kind {
                        MouseKind::ScrollUp => {
                            self.move_up();
                        }
                        MouseKind::ScrollDown => {
                            self.move_down();
                        }
                        _ => {}
                    }
                }
            }
            Event::Paste(text) => {
                if self.mode.is_input() && self.prompt.is_none() {
                    self.command_line.insert_str(text);
                }
            }
            Event::FocusLost => self.focus_lost(),
            Event::FocusGained => {}
        }
    }

    /// Dispatch a key press. A pending prompt takes it first.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.prompt.is_some() {
            self.answer_prompt(key);
            return;
        }
        if key.ctrl() && key.code == KeyCode::Char('q') {
            self.request_close();
            return;
        }
        match self.mode {
            Mode::Normal => self.handle_normal(key),
            Mode::Command => self.handle_command(key),
        }
    }

    fn answer_prompt(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        if !key.ctrl() && matches!(key.code, KeyCode::Char('y' | 'Y')) {
            self.close();
        } else {
            tracing::debug!(question = %prompt.question, "declined");
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        let ctrl = key.ctrl();
        if ctrl || key.code != KeyCode::Char('g') {
            self.gg.disarm();
        }

        if ctrl {
            match key.code {
                KeyCode::Char('c') => self.request_close(),
                KeyCode::Char('d') => {
                    self.page_down();
                }
                KeyCode::Char('u') => {
                    self.page_up();
                }
                _ => {}
            }
            return;
        }
        if key.modifiers.contains(Modifiers::ALT) {
            return;
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_down();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_up();
            }
            KeyCode::PageDown => {
                self.page_down();
            }
            KeyCode::PageUp => {
                self.page_up();
            }
            KeyCode::Char('g') => {
                if self.gg.press(self.now) {
                    self.jump_to_top();
                }
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.jump_to_bottom();
            }
            KeyCode::Home => {
                self.jump_to_top();
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => self.select(),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace | KeyCode::Escape => {
                self.go_back();
            }
            KeyCode::Char(ch @ '1'..='9') => {
                if let Some(k) = ch.to_digit(10) {
                    self.quick_jump(k as usize);
                }
            }
            KeyCode::Char(':') => self.set_mode(Mode::Command),
            KeyCode::Char('?') => {
                let outcome = self.run_builtin(Builtin::Help, &[]);
                self.report(outcome);
            }
            _ => {}
        }
    }

    fn handle_command(&mut self, key: KeyEvent) {
        if key.ctrl() {
            if key.code == KeyCode::Char('c') {
                self.set_mode(Mode::Normal);
            }
            return;
        }

        match key.code {
            KeyCode::Escape => self.set_mode(Mode::Normal),
            KeyCode::Enter => self.submit(),
            KeyCode::Tab => self.autocomplete(),
            KeyCode::Up => self.history_older(),
            KeyCode::Down => self.history_newer(),
            KeyCode::Backspace => {
                // Backspace on an empty line leaves command mode, like Vim.
                if self.command_line.is_empty() {
                    self.set_mode(Mode::Normal);
                } else {
                    self.command_line.backspace();
                }
            }
            KeyCode::Delete => {
                self.command_line.delete();
            }
            KeyCode::Left => self.command_line.move_left(),
            KeyCode::Right => self.command_line.move_right(),
            KeyCode::Home => self.command_line.move_home(),
            KeyCode::End => self.command_line.move_end(),
            KeyCode::Char(ch) => self.command_line.insert_char(ch),
            _ => {}
        }
    }
}
