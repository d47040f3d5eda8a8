//! End-to-end behavior of the navigator against a recording host.

use std::time::{Duration, Instant};

use folio_nav::host::{Bounds, Viewport};
use folio_nav::message::MessageKind;
use folio_nav::status::Status;
use folio_nav::{Host, Item, Mode, Navigator, NavigatorConfig, Section, SectionId, SectionRegistry, Target};
use folio_term::input::{Event, KeyCode, KeyEvent};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Everything the navigator asked of the host, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Active(String, bool),
    Selected(String, Option<usize>),
    Scroll(i32),
    Focus(bool),
    Status(String),
    Activate(String),
}

struct Recorder {
    counts: Vec<(&'static str, usize)>,
    calls: Vec<Call>,
    row: i32,
    view: Viewport,
}

impl Recorder {
    fn new(counts: Vec<(&'static str, usize)>) -> Self {
        Self {
            counts,
            calls: Vec::new(),
            row: 20,
            view: Viewport { top: 0, height: 40 },
        }
    }

    fn scrolls(&self) -> Vec<i32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Scroll(d) => Some(*d),
                _ => None,
            })
            .collect()
    }
}

impl Host for Recorder {
    fn items(&mut self, section: &Section) -> Vec<Item> {
        if section.id.as_str() == "menu-section" {
            return ["about", "projects", "blog"]
                .iter()
                .map(|base| Item::titled(*base).with_target(Target::Section(SectionId::from_base(base))))
                .collect();
        }
        let n = self
            .counts
            .iter()
            .find(|(id, _)| *id == section.id.as_str())
            .map_or(0, |&(_, n)| n);
        (0..n).map(|i| Item::titled(format!("{} {i}", section.name))).collect()
    }

    fn set_section_active(&mut self, section: &SectionId, active: bool) {
        self.calls.push(Call::Active(section.to_string(), active));
    }

    fn on_selection(&mut self, section: &SectionId, index: Option<usize>) {
        self.calls.push(Call::Selected(section.to_string(), index));
    }

    fn item_bounds(&self, _section: &SectionId, index: usize) -> Option<Bounds> {
        let index = i32::try_from(index).ok()?;
        Some(Bounds {
            top: index * self.row,
            height: self.row,
        })
    }

    fn viewport(&self) -> Option<Viewport> {
        Some(self.view)
    }

    fn scroll_by(&mut self, delta: i32) {
        self.view.top += delta;
        self.calls.push(Call::Scroll(delta));
    }

    fn focus_command_line(&mut self, focused: bool) {
        self.calls.push(Call::Focus(focused));
    }

    fn on_status(&mut self, status: &Status) {
        self.calls.push(Call::Status(status.to_string()));
    }

    fn activate(&mut self, link: &str) {
        self.calls.push(Call::Activate(link.to_string()));
    }
}

fn registry() -> SectionRegistry {
    SectionRegistry::new(
        &"menu-section".into(),
        vec![
            Section::new("menu-section", "Menu", ".menu-item"),
            Section::new("about-section", "About", ".paragraph"),
            Section::new("projects-section", "Projects", ".project-card"),
            Section::new("blog-section", "Blog", ".blog-post"),
        ],
    )
    .unwrap()
}

fn navigator(counts: Vec<(&'static str, usize)>) -> Navigator<Recorder> {
    Navigator::new(registry(), NavigatorConfig::default(), Recorder::new(counts))
}

fn key(c: char) -> Event {
    Event::Key(KeyEvent::plain(KeyCode::Char(c)))
}

fn type_line(nav: &mut Navigator<Recorder>, line: &str, now: Instant) {
    nav.handle_event(&key(':'), now);
    for c in line.chars() {
        nav.handle_event(&key(c), now);
    }
    nav.handle_event(&Event::Key(KeyEvent::plain(KeyCode::Enter)), now);
}

// -- Selection ---------------------------------------------------------------

proptest! {
    #[test]
    fn move_down_is_clamped(n in 1usize..60, presses in 0usize..120) {
        let mut nav = navigator(vec![("about-section", n)]);
        nav.navigate_to(&"about-section".into());
        for _ in 0..presses {
            nav.move_down();
            prop_assert!(nav.selection().index() <= n - 1);
        }
        prop_assert_eq!(nav.selection().index(), presses.min(n - 1));
    }

    #[test]
    fn move_up_is_clamped(n in 1usize..60, presses in 0usize..120) {
        let mut nav = navigator(vec![("about-section", n)]);
        nav.navigate_to(&"about-section".into());
        nav.jump_to_bottom();
        for _ in 0..presses {
            nav.move_up();
        }
        prop_assert_eq!(nav.selection().index(), (n - 1).saturating_sub(presses));
    }
}

#[test]
fn top_and_bottom_of_seven() {
    let mut nav = navigator(vec![("projects-section", 7)]);
    nav.navigate_to(&"projects-section".into());
    nav.move_down();
    nav.jump_to_top();
    assert_eq!(nav.selection().index(), 0);
    nav.jump_to_bottom();
    assert_eq!(nav.selection().index(), 6);
}

#[test]
fn page_down_near_end_lands_on_last() {
    let n = 11;
    let mut nav = navigator(vec![("blog-section", n)]);
    nav.navigate_to(&"blog-section".into());
    nav.jump_to_bottom();
    nav.move_up();
    nav.move_up();
    assert_eq!(nav.selection().index(), n - 3);
    nav.page_down();
    assert_eq!(nav.selection().index(), n - 1);
}

#[test]
fn empty_section_ignores_movement() {
    let mut nav = navigator(Vec::new());
    nav.navigate_to(&"about-section".into());
    let calls = nav.host().calls.len();
    assert!(!nav.move_down());
    assert!(!nav.page_up());
    assert!(!nav.jump_to_bottom());
    nav.select();
    assert_eq!(nav.host().calls.len(), calls);
    assert_eq!(nav.status().to_string(), "-- NORMAL -- │ About │ 0/0");
}

#[test]
fn gg_within_window_jumps_to_top() {
    let mut nav = navigator(vec![("about-section", 9)]);
    nav.navigate_to(&"about-section".into());
    nav.jump_to_bottom();
    let t0 = Instant::now();
    nav.handle_event(&key('g'), t0);
    nav.handle_event(&key('g'), t0 + Duration::from_millis(300));
    assert_eq!(nav.selection().index(), 0);
}

#[test]
fn gg_too_slow_only_arms() {
    let mut nav = navigator(vec![("about-section", 9)]);
    nav.navigate_to(&"about-section".into());
    nav.jump_to_bottom();
    let t0 = Instant::now();
    nav.handle_event(&key('g'), t0);
    nav.handle_event(&key('g'), t0 + Duration::from_millis(600));
    assert_eq!(nav.selection().index(), 8);
}

#[test]
fn far_items_are_scrolled_to_center() {
    let mut nav = navigator(vec![("about-section", 30)]);
    nav.navigate_to(&"about-section".into());
    nav.move_down();
    assert!(nav.host().scrolls().is_empty());
    nav.jump_to_bottom();
    // Item 29 centers at 590, the view at 20.
    assert_eq!(nav.host().scrolls(), [570]);
    nav.move_up();
    assert_eq!(nav.host().scrolls(), [570]);
}

// -- Sections ----------------------------------------------------------------

#[test]
fn about_command_switches_section() {
    let mut nav = navigator(vec![("about-section", 4)]);
    nav.move_down();
    type_line(&mut nav, "about", Instant::now());
    assert_eq!(nav.current_id().as_str(), "about-section");
    assert_eq!(nav.selection().index(), 0);
    assert_eq!(nav.items().len(), 4);

    let calls = &nav.host().calls;
    let deactivated = calls.iter().position(|c| *c == Call::Active("menu-section".into(), false));
    let activated = calls.iter().position(|c| *c == Call::Active("about-section".into(), true));
    assert!(deactivated.is_some() && deactivated < activated);
    assert_eq!(
        calls.last(),
        Some(&Call::Status("-- NORMAL -- │ About │ 1/4".into()))
    );
}

#[test]
fn item_list_is_rebuilt_on_every_switch() {
    let mut nav = navigator(vec![("about-section", 2)]);
    nav.navigate_to(&"about-section".into());
    nav.go_back();
    nav.host_mut().counts = vec![("about-section", 5)];
    nav.navigate_to(&"about-section".into());
    assert_eq!(nav.items().len(), 5);
}

#[test]
fn menu_selection_and_quick_jump() {
    let mut nav = navigator(vec![("projects-section", 3)]);
    nav.handle_event(&key('2'), Instant::now());
    assert_eq!(nav.current_id().as_str(), "projects-section");
    assert_eq!(nav.host().calls.iter().filter(|c| matches!(c, Call::Activate(_))).count(), 0);
}

// -- Commands ----------------------------------------------------------------

#[test]
fn empty_submission_leaves_history_alone() {
    let mut nav = navigator(Vec::new());
    type_line(&mut nav, "help", Instant::now());
    assert_eq!(nav.history().len(), 1);
    type_line(&mut nav, "", Instant::now());
    type_line(&mut nav, "   ", Instant::now());
    assert_eq!(nav.history().len(), 1);
    assert_eq!(nav.history().cursor(), None);
}

#[test]
fn unknown_command_reports_once() {
    let mut nav = navigator(vec![("about-section", 3)]);
    nav.navigate_to(&"about-section".into());
    nav.move_down();
    let t = Instant::now();
    type_line(&mut nav, "xyz123", t);

    assert_eq!(nav.mode(), Mode::Normal);
    assert_eq!(nav.current_id().as_str(), "about-section");
    assert_eq!(nav.selection().index(), 1);
    let texts: Vec<_> = nav.messages().iter().map(|m| (m.text.as_str(), m.kind)).collect();
    assert_eq!(texts, [("command not found: xyz123", MessageKind::Error)]);
}

#[test]
fn autocomplete_single_and_multiple() {
    let mut nav = navigator(Vec::new());
    let t = Instant::now();
    nav.handle_event(&key(':'), t);
    nav.handle_event(&key('h'), t);
    nav.handle_event(&Event::Key(KeyEvent::plain(KeyCode::Tab)), t);
    assert_eq!(nav.command_line().input(), "help");
    assert!(nav.messages().is_empty());

    nav.handle_event(&Event::Key(KeyEvent::plain(KeyCode::Escape)), t);
    nav.handle_event(&key(':'), t);
    nav.handle_event(&key('t'), t);
    nav.handle_event(&Event::Key(KeyEvent::plain(KeyCode::Tab)), t);
    assert_eq!(nav.command_line().input(), "t");
    assert_eq!(nav.messages().iter().next().map(|m| m.text.as_str()), Some("theme  time"));
}

#[test]
fn focus_loss_returns_to_normal() {
    let mut nav = navigator(Vec::new());
    let t = Instant::now();
    nav.handle_event(&key(':'), t);
    nav.handle_event(&key('l'), t);
    assert_eq!(nav.mode(), Mode::Command);
    nav.handle_event(&Event::FocusLost, t);
    assert_eq!(nav.mode(), Mode::Normal);
    assert!(nav.history().is_empty());
    assert!(nav.messages().is_empty());
    assert_eq!(
        nav.host().calls.iter().filter(|c| matches!(c, Call::Focus(_))).cloned().collect::<Vec<_>>(),
        [Call::Focus(true), Call::Focus(false)]
    );
}

// -- Messages ----------------------------------------------------------------

#[test]
fn message_survives_its_own_enter() {
    let mut nav = navigator(Vec::new());
    let t0 = Instant::now();
    type_line(&mut nav, "pwd", t0);
    assert_eq!(nav.messages().len(), 1);

    // Within the arm delay a key does not dismiss it.
    nav.handle_event(&key('j'), t0 + Duration::from_millis(50));
    assert_eq!(nav.messages().len(), 1);
    nav.handle_event(&key('j'), t0 + Duration::from_millis(150));
    assert!(nav.messages().is_empty());

    // The timeout arriving later finds nothing to remove.
    nav.tick(t0 + Duration::from_secs(5));
    assert!(nav.messages().is_empty());
}

#[test]
fn message_times_out_without_interaction() {
    let mut nav = navigator(Vec::new());
    let t0 = Instant::now();
    nav.tick(t0);
    type_line(&mut nav, "pwd", t0);
    nav.tick(t0 + Duration::from_millis(3900));
    assert_eq!(nav.messages().len(), 1);
    nav.tick(t0 + Duration::from_millis(4000));
    assert!(nav.messages().is_empty());
}
