//! Built-in command execution.

use std::fmt::Write as _;

use tracing::debug;

use super::{Navigator, PromptKind};
use crate::command::{BUILTINS, Builtin};
use crate::host::Host;
use crate::section::SectionId;

/// What a built-in wants shown afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Outcome {
    Silent,
    Info(String),
    Error(String),
}

const KEYS_HELP: &str = "\
keys: j/k move  ^d/^u page  gg/G top/bottom  enter open  h back  1-9 jump  : command  ? help";

impl<H: Host> Navigator<H> {
    pub(super) fn run_builtin(&mut self, builtin: Builtin, args: &[String]) -> Outcome {
        match builtin {
            Builtin::Help => Outcome::Info(self.help_text()),
            Builtin::Ls => Outcome::Info(self.listing()),
            Builtin::Pwd => Outcome::Info(self.pwd()),
            Builtin::Cd => self.cd(args.first().map(String::as_str)),
            Builtin::Menu => {
                self.go_back();
                Outcome::Silent
            }
            Builtin::Clear => {
                self.messages.clear();
                Outcome::Silent
            }
            Builtin::Exit => {
                self.ask(PromptKind::Exit, "Are you sure you want to exit? (y/n)");
                Outcome::Silent
            }
            Builtin::Vim => {
                self.vim_flag = !self.vim_flag;
                self.host.set_vim_flag(self.vim_flag);
                let state = if self.vim_flag { "enabled" } else { "disabled" };
                Outcome::Info(format!("vim mode {state}"))
            }
            Builtin::Theme => Outcome::Info("theme switching is not implemented yet".to_string()),
            Builtin::Time => Outcome::Info(self.host.now().format("%c").to_string()),
            Builtin::Refresh => self.refresh(),
        }
    }

    pub(super) fn report(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Silent => {}
            Outcome::Info(text) => self.info(text),
            Outcome::Error(text) => self.error(text),
        }
    }

    fn help_text(&self) -> String {
        let mut text = String::from(KEYS_HELP);
        text.push_str("\ncommands:");
        for &(name, builtin) in BUILTINS {
            let _ = write!(text, "\n  {name:<8} {}", builtin.summary());
        }
        let sections: Vec<&str> = self.registry.iter().filter_map(|s| s.id.base_name()).collect();
        if !sections.is_empty() {
            let _ = write!(text, "\nsections: {}", sections.join(" "));
        }
        text
    }

    fn listing(&self) -> String {
        if self.items.is_empty() {
            return "(no items)".to_string();
        }
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item.label(i)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `~` for the menu, `~/<slug of the display name>` elsewhere.
    fn pwd(&self) -> String {
        if self.registry.is_root(&self.current) {
            return "~".to_string();
        }
        let slug = self
            .current_section()
            .name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-");
        format!("~/{slug}")
    }

    fn cd(&mut self, target: Option<&str>) -> Outcome {
        match target {
            None | Some(".." | "~" | "/") => {
                self.go_back();
                Outcome::Silent
            }
            Some(name) => {
                let lower = name.to_lowercase();
                let id = self
                    .registry
                    .shortcut(&lower)
                    .or_else(|| self.registry.get(&SectionId::new(lower.as_str())))
                    .map(|s| s.id.clone());
                match id {
                    Some(id) => {
                        self.navigate_to(&id);
                        Outcome::Silent
                    }
                    None => Outcome::Error(format!("cd: no such section: {name}")),
                }
            }
        }
    }

    fn refresh(&mut self) -> Outcome {
        if self.current != self.posts_section {
            return Outcome::Info("nothing to refresh here".to_string());
        }
        self.host.load_posts();
        self.reload_items(true);
        self.publish_status();
        debug!(posts = self.items.len(), "posts reloaded");
        Outcome::Info(format!("{} posts loaded", self.items.len()))
    }
}
