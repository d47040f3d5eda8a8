//! The navigator: modal keyboard control over a set of sections.
//!
//! A [`Navigator`] owns all navigation state (mode, current section, item
//! list, selection, command line, history, messages) and drives a [`Host`]
//! that does the displaying. It is constructed explicitly and handed around
//! by reference; nothing about it is global.
//!
//! All mutation happens synchronously inside [`handle_event`] and [`tick`].
//! Both take the current [`Instant`], which is also used for anything
//! scheduled (message expiry, the end of a transition, the `gg` window) so
//! the whole state machine runs on a clock the caller controls.
//!
//! Key dispatch lives in `keys`, built-in commands in `builtins`.
//!
//! [`handle_event`]: Navigator::handle_event
//! [`tick`]: Navigator::tick

mod builtins;
mod keys;

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::command::{Builtin, CommandLine, completions, parse_line};
use crate::config::NavigatorConfig;
use crate::history::CommandHistory;
use crate::host::Host;
use crate::message::{MessageBoard, MessageKind};
use crate::mode::Mode;
use crate::section::{Item, Section, SectionId, SectionRegistry, Target};
use crate::selection::{DoublePress, Selection, reveal_offset};
use crate::status::Status;

/// Section whose items are rebuilt by `refresh`, unless configured otherwise.
pub const DEFAULT_POSTS_SECTION: &str = "blog-section";

const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Why a [`Prompt`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// The `exit` command.
    Exit,
    /// A close request while a command was being typed. Stale once the
    /// command line is gone.
    LeaveCommand,
}

/// A yes/no question that captures the next key. Confirming closes the
/// application; any other answer drops the question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub question: String,
}

pub struct Navigator<H> {
    host: H,
    registry: SectionRegistry,
    config: NavigatorConfig,
    posts_section: SectionId,

    mode: Mode,
    current: SectionId,
    items: Vec<Item>,
    selection: Selection,
    gg: DoublePress,

    command_line: CommandLine,
    history: CommandHistory,
    messages: MessageBoard,
    prompt: Option<Prompt>,

    vim_flag: bool,
    closed: bool,
    transition: Option<(SectionId, Instant)>,
    last_clock: Option<Instant>,
    now: Instant,
}

impl<H: Host> Navigator<H> {
    /// Build a navigator showing the root section.
    pub fn new(registry: SectionRegistry, config: NavigatorConfig, host: H) -> Self {
        let root = registry.root().id.clone();
        let mut nav = Self {
            host,
            posts_section: SectionId::new(DEFAULT_POSTS_SECTION),
            mode: Mode::Normal,
            current: root.clone(),
            items: Vec::new(),
            selection: Selection::default(),
            gg: DoublePress::new(config.double_press_window()),
            command_line: CommandLine::new(),
            history: CommandHistory::new(config.history_limit),
            messages: MessageBoard::new(config.message_lifetime(), config.dismiss_arm_delay()),
            prompt: None,
            vim_flag: false,
            closed: false,
            transition: None,
            last_clock: None,
            now: Instant::now(),
            registry,
            config,
        };
        nav.host.set_section_active(&root, true);
        nav.reload_items(false);
        nav.publish_status();
        nav
    }

    /// Use a different section for `refresh`.
    #[must_use]
    pub fn with_posts_section(mut self, id: SectionId) -> Self {
        self.posts_section = id;
        self
    }

    // -- Accessors ----------------------------------------------------------

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn current_id(&self) -> &SectionId {
        &self.current
    }

    /// The current section. Falls back to the root, which always exists.
    #[must_use]
    pub fn current_section(&self) -> &Section {
        self.registry.get(&self.current).unwrap_or_else(|| self.registry.root())
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub const fn command_line(&self) -> &CommandLine {
        &self.command_line
    }

    #[must_use]
    pub const fn history(&self) -> &CommandHistory {
        &self.history
    }

    #[must_use]
    pub const fn messages(&self) -> &MessageBoard {
        &self.messages
    }

    #[must_use]
    pub const fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    #[must_use]
    pub const fn vim_flag(&self) -> bool {
        self.vim_flag
    }

    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub const fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            mode: self.mode,
            section: self.current_section().name.clone(),
            item_count: self.items.len(),
            selected: self.selection.current(),
        }
    }

    fn publish_status(&mut self) {
        let status = self.status();
        self.host.on_status(&status);
    }

    // -- Mode ---------------------------------------------------------------

    /// Switch modes. Entering the current mode again changes nothing.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        match mode {
            Mode::Command => self.host.focus_command_line(true),
            Mode::Normal => {
                self.command_line.clear();
                self.history.reset_cursor();
                self.host.focus_command_line(false);
                if self.prompt.take_if(|p| p.kind == PromptKind::LeaveCommand).is_some() {
                    debug!("close question dropped with the command line");
                }
            }
        }
        debug!(%mode, "mode changed");
        self.publish_status();
    }

    /// Input focus went elsewhere: an open command line is cancelled.
    pub fn focus_lost(&mut self) {
        if self.mode == Mode::Command {
            debug!("focus lost, cancelling command line");
            self.set_mode(Mode::Normal);
        }
    }

    // -- Sections -----------------------------------------------------------

    /// Show section `id`. Unknown ids are ignored; returns whether the
    /// switch happened.
    pub fn navigate_to(&mut self, id: &SectionId) -> bool {
        if !self.registry.contains(id) {
            debug!(%id, "ignoring unknown section");
            return false;
        }
        let prev = std::mem::replace(&mut self.current, id.clone());
        self.host.set_section_active(&prev, false);
        self.host.set_section_active(id, true);
        self.reload_items(false);
        self.begin_transition(id.clone());
        debug!(from = %prev, to = %id, items = self.items.len(), "navigated");
        self.publish_status();
        true
    }

    /// Back to the root section. No-op when already there.
    pub fn go_back(&mut self) -> bool {
        if self.registry.is_root(&self.current) {
            return false;
        }
        let root = self.registry.root().id.clone();
        self.navigate_to(&root)
    }

    fn begin_transition(&mut self, id: SectionId) {
        let until = self.now + self.config.transition();
        if let Some((old, _)) = self.transition.replace((id.clone(), until)) {
            self.host.end_transition(&old);
        }
        self.host.start_transition(&id);
    }

    /// Ask the host for the current section's items again. The selection
    /// goes back to the first item unless `keep_index` is set and the
    /// number of items did not change.
    fn reload_items(&mut self, keep_index: bool) {
        let items = match self.registry.get(&self.current) {
            Some(section) => self.host.items(section),
            None => Vec::new(),
        };
        let index = self.selection.index();
        let same_count = items.len() == self.items.len();
        self.items = items;
        self.selection.reset(self.items.len());
        if keep_index && same_count {
            self.selection.select_index(index);
        }
        self.selection_changed();
    }

    // -- Selection ----------------------------------------------------------

    fn selection_changed(&mut self) {
        let index = self.selection.current();
        self.host.on_selection(&self.current, index);
        let Some(index) = index else { return };
        let (Some(item), Some(view)) = (self.host.item_bounds(&self.current, index), self.host.viewport())
        else {
            return;
        };
        if let Some(delta) = reveal_offset(item, view, self.config.scroll_deadband) {
            self.host.scroll_by(delta);
        }
    }

    fn apply(&mut self, op: impl FnOnce(&mut Selection) -> bool) -> bool {
        let changed = op(&mut self.selection);
        if changed {
            self.selection_changed();
            self.publish_status();
        }
        changed
    }

    pub fn move_up(&mut self) -> bool {
        self.apply(Selection::move_up)
    }

    pub fn move_down(&mut self) -> bool {
        self.apply(Selection::move_down)
    }

    pub fn page_up(&mut self) -> bool {
        let page = self.config.page();
        self.apply(|s| s.page_up(page))
    }

    pub fn page_down(&mut self) -> bool {
        let page = self.config.page();
        self.apply(|s| s.page_down(page))
    }

    pub fn jump_to_top(&mut self) -> bool {
        self.apply(Selection::jump_to_top)
    }

    pub fn jump_to_bottom(&mut self) -> bool {
        self.apply(Selection::jump_to_bottom)
    }

    /// Highlight item `index` (0-based), e.g. for a click.
    pub fn select_index(&mut self, index: usize) -> bool {
        self.apply(|s| s.select_index(index))
    }

    /// Activate the selected item: menu entries open their section, other
    /// items open their link. Items without a target do nothing.
    pub fn select(&mut self) {
        let Some(item) = self.selection.current().and_then(|i| self.items.get(i)) else {
            return;
        };
        match item.target.clone() {
            Some(Target::Section(id)) => {
                self.navigate_to(&id);
            }
            Some(Target::Link(link)) => {
                info!(%link, "activating link");
                self.host.activate(&link);
            }
            None => debug!("selected item has no target"),
        }
    }

    /// Select menu entry `k` (1-based) and activate it. Only in the root
    /// section.
    pub fn quick_jump(&mut self, k: usize) -> bool {
        if !self.registry.is_root(&self.current) || k == 0 || k > self.items.len() {
            return false;
        }
        self.select_index(k - 1);
        self.select();
        true
    }

    // -- Command line -------------------------------------------------------

    /// Run a command line. Blank lines do nothing and are not recorded.
    pub fn execute(&mut self, line: &str) {
        let Some(invocation) = parse_line(line) else {
            return;
        };
        self.history.push(line);
        info!(command = %invocation.name, args = ?invocation.args, "executing");

        if let Some(builtin) = Builtin::lookup(&invocation.name) {
            let outcome = self.run_builtin(builtin, &invocation.args);
            self.report(outcome);
        } else if let Some(id) = self.registry.shortcut(&invocation.name).map(|s| s.id.clone()) {
            self.navigate_to(&id);
        } else {
            self.error(format!("command not found: {}", invocation.name));
        }
    }

    /// Enter on the command line: back to normal mode, then run it.
    pub fn submit(&mut self) {
        let line = self.command_line.take();
        self.set_mode(Mode::Normal);
        self.execute(&line);
    }

    /// Complete the command line against the built-in names.
    pub fn autocomplete(&mut self) {
        match completions(self.command_line.input()).as_slice() {
            [] => {}
            [only] => self.command_line.set(only),
            many => self.info(many.join("  ")),
        }
    }

    pub fn history_older(&mut self) {
        if let Some(line) = self.history.older() {
            self.command_line.set(line);
        }
    }

    pub fn history_newer(&mut self) {
        let line = self.history.newer();
        self.command_line.set(line);
    }

    // -- Messages -----------------------------------------------------------

    pub fn info(&mut self, text: impl Into<String>) {
        self.messages.push(text, MessageKind::Info, self.now);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!(%text, "error message");
        self.messages.push(text, MessageKind::Error, self.now);
    }

    // -- Closing ------------------------------------------------------------

    /// True when leaving now would lose an unfinished command.
    #[must_use]
    pub fn before_unload(&self) -> bool {
        self.mode != Mode::Normal
    }

    /// Close, asking first if [`before_unload`](Self::before_unload) says so.
    pub fn request_close(&mut self) {
        if self.before_unload() {
            self.ask(PromptKind::LeaveCommand, "Leave with an unfinished command? (y/n)");
        } else {
            self.close();
        }
    }

    fn ask(&mut self, kind: PromptKind, question: &str) {
        self.prompt = Some(Prompt {
            kind,
            question: question.to_string(),
        });
    }

    fn close(&mut self) {
        info!("closing");
        self.closed = true;
        self.host.close();
    }

    // -- Timers -------------------------------------------------------------

    /// Advance time: expire messages, end a finished transition, and
    /// update the clock once a second. Returns whether anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.now = now;
        let mut changed = self.messages.expire(now) > 0;

        if let Some((id, _)) = self.transition.take_if(|(_, until)| now >= *until) {
            self.host.end_transition(&id);
            changed = true;
        }

        if self.last_clock.is_none_or(|t| now.saturating_duration_since(t) >= CLOCK_PERIOD) {
            self.last_clock = Some(now);
            let wall = self.host.now();
            self.host.on_clock(wall);
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Menu {
        closed: bool,
        focused: bool,
        transitions: Vec<(String, bool)>,
        activated: Vec<String>,
    }

    impl Host for Menu {
        fn items(&mut self, section: &Section) -> Vec<Item> {
            match section.id.as_str() {
                "menu-section" => vec![
                    Item::titled("About").with_target(Target::Section("about-section".into())),
                    Item::titled("Projects").with_target(Target::Section("projects-section".into())),
                ],
                "projects-section" => vec![
                    Item::titled("termfolio").with_target(Target::Link("https://example.com".into())),
                    Item::default(),
                ],
                _ => vec![Item::default(); 3],
            }
        }

        fn focus_command_line(&mut self, focused: bool) {
            self.focused = focused;
        }

        fn start_transition(&mut self, section: &SectionId) {
            self.transitions.push((section.to_string(), true));
        }

        fn end_transition(&mut self, section: &SectionId) {
            self.transitions.push((section.to_string(), false));
        }

        fn activate(&mut self, link: &str) {
            self.activated.push(link.to_string());
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    fn nav() -> Navigator<Menu> {
        let registry = SectionRegistry::new(
            &"menu-section".into(),
            vec![
                Section::new("menu-section", "Menu", ".menu-item"),
                Section::new("about-section", "About Me", ".paragraph"),
                Section::new("projects-section", "Projects", ".project-card"),
            ],
        )
        .unwrap();
        Navigator::new(registry, NavigatorConfig::default(), Menu::default())
    }

    #[test]
    fn starts_on_root_in_normal() {
        let n = nav();
        assert_eq!(n.mode(), Mode::Normal);
        assert_eq!(n.current_id().as_str(), "menu-section");
        assert_eq!(n.items().len(), 2);
        assert_eq!(n.selection().current(), Some(0));
    }

    #[test]
    fn set_mode_focuses_and_clears() {
        let mut n = nav();
        n.set_mode(Mode::Command);
        assert!(n.host().focused);
        n.command_line.set("ab");
        n.set_mode(Mode::Command);
        assert_eq!(n.command_line().input(), "ab");
        n.set_mode(Mode::Normal);
        assert!(!n.host().focused);
        assert!(n.command_line().is_empty());
    }

    #[test]
    fn select_on_menu_navigates() {
        let mut n = nav();
        n.move_down();
        n.select();
        assert_eq!(n.current_id().as_str(), "projects-section");
        assert_eq!(n.selection().index(), 0);
        n.select();
        assert_eq!(n.host().activated, ["https://example.com"]);
        n.move_down();
        n.select();
        assert_eq!(n.host().activated.len(), 1);
    }

    #[test]
    fn quick_jump_only_on_root() {
        let mut n = nav();
        assert!(!n.quick_jump(3));
        assert!(n.quick_jump(1));
        assert_eq!(n.current_id().as_str(), "about-section");
        assert!(!n.quick_jump(1));
        assert_eq!(n.current_id().as_str(), "about-section");
    }

    #[test]
    fn go_back_is_noop_on_root() {
        let mut n = nav();
        assert!(!n.go_back());
        n.navigate_to(&"about-section".into());
        assert!(n.go_back());
        assert_eq!(n.current_id().as_str(), "menu-section");
    }

    #[test]
    fn unknown_section_ignored() {
        let mut n = nav();
        n.move_down();
        assert!(!n.navigate_to(&"nowhere-section".into()));
        assert_eq!(n.current_id().as_str(), "menu-section");
        assert_eq!(n.selection().index(), 1);
    }

    #[test]
    fn transition_ends_on_tick() {
        let mut n = nav();
        let t0 = Instant::now();
        n.now = t0;
        n.navigate_to(&"about-section".into());
        n.tick(t0 + Duration::from_millis(100));
        assert_eq!(n.host().transitions, [("about-section".to_string(), true)]);
        n.tick(t0 + Duration::from_millis(300));
        assert_eq!(n.host().transitions.last(), Some(&("about-section".to_string(), false)));
    }

    #[test]
    fn newer_transition_replaces_older() {
        let mut n = nav();
        n.navigate_to(&"about-section".into());
        n.navigate_to(&"projects-section".into());
        assert_eq!(
            n.host().transitions,
            [
                ("about-section".to_string(), true),
                ("about-section".to_string(), false),
                ("projects-section".to_string(), true),
            ]
        );
    }

    #[test]
    fn close_guard() {
        let mut n = nav();
        assert!(!n.before_unload());
        n.set_mode(Mode::Command);
        assert!(n.before_unload());
        n.request_close();
        assert!(!n.is_closed());
        assert_eq!(n.prompt().map(|p| p.kind), Some(PromptKind::LeaveCommand));
    }

    #[test]
    fn leaving_command_mode_drops_the_close_question() {
        let mut n = nav();
        n.set_mode(Mode::Command);
        n.request_close();
        n.set_mode(Mode::Normal);
        assert_eq!(n.prompt(), None);
        assert!(!n.is_closed());
    }

    #[test]
    fn unguarded_close_is_immediate() {
        let mut n = nav();
        n.request_close();
        assert!(n.is_closed());
        assert!(n.host().closed);
    }
}
