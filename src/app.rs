//! The portfolio application: the navigator over a [`TerminalHost`], the
//! post pager, and the frame painter.
//!
//! Screen layout, top to bottom:
//!
//! ```text
//! ~/portfolio  Menu                                         14:02:11   header
//!   ▌ About                                                            content
//!     Who I am and what I work on
//!   ...
//!  command not found: xyz                                              messages
//! -- NORMAL -- │ Menu │ 1/5                                            status
//! :about                                                               command line
//! ```

use std::ops::Range;
use std::time::Instant;

use folio_nav::message::MessageKind;
use folio_nav::{Mode, Navigator};
use folio_term::event_loop::{Action, App};
use folio_term::input::{Event, KeyCode, KeyEvent, MouseButton, MouseKind};
use folio_term::screen::{Color, Line, Screen, Style};
use folio_term::terminal::Size;
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;

use crate::blog;
use crate::host::{CHROME_ROWS, POST_LINK_PREFIX, TerminalHost};
use crate::layout::RowKind;
use crate::pager::{Pager, PagerAction};
use crate::site::{Site, SiteError};

const POST_LOAD_FAILED: &str = "Failed to load blog post. Please try again later.";
const NORMAL_HINT: &str = "j/k move  enter open  h back  : command  ? help";
const PAGER_HINT: &str = "j/k scroll  space page  g/G top/bottom  q close";

pub struct Portfolio {
    nav: Navigator<TerminalHost>,
    pager: Option<Pager>,
}

impl Portfolio {
    /// # Errors
    ///
    /// Fails if the site's sections do not form a valid registry.
    pub fn new(site: Site, size: Size) -> Result<Self, SiteError> {
        let registry = site.registry()?;
        let config = site.navigator;
        let posts_section = site.posts_section.clone();
        let host = TerminalHost::new(site, size);
        let nav = Navigator::new(registry, config, host).with_posts_section(posts_section);
        Ok(Self { nav, pager: None })
    }

    #[cfg(test)]
    pub const fn navigator(&self) -> &Navigator<TerminalHost> {
        &self.nav
    }

    #[cfg(test)]
    pub const fn pager(&self) -> Option<&Pager> {
        self.pager.as_ref()
    }

    fn host(&self) -> &TerminalHost {
        self.nav.host()
    }

    // -- Input --------------------------------------------------------------

    fn pager_event(&mut self, event: &Event) {
        let Some(pager) = &mut self.pager else {
            return;
        };
        let action = match event {
            Event::Key(key) => pager.handle_key(*key),
            Event::Mouse(mouse) => match mouse.kind {
                MouseKind::ScrollUp => pager.handle_key(KeyEvent::plain(KeyCode::Up)),
                MouseKind::ScrollDown => pager.handle_key(KeyEvent::plain(KeyCode::Down)),
                _ => PagerAction::Stay,
            },
            _ => PagerAction::Stay,
        };
        if action == PagerAction::Close {
            info!(title = pager.title(), "post closed");
            self.pager = None;
        }
    }

    /// A left click on an item selects it; clicking the selected item
    /// opens it. `covered` holds the screen rows messages were drawn over
    /// when the click landed.
    fn click(&mut self, y: u16, covered: &Range<usize>) {
        if self.nav.mode() != Mode::Normal || self.nav.prompt().is_some() || y == 0 {
            return;
        }
        if covered.contains(&usize::from(y)) {
            return;
        }
        let Some(index) = self.host().item_at_screen_row(usize::from(y - 1)) else {
            return;
        };
        if self.nav.selection().current() == Some(index) {
            self.nav.select();
        } else {
            self.nav.select_index(index);
        }
    }

    fn open(&mut self, link: &str) {
        let Some(filename) = link.strip_prefix(POST_LINK_PREFIX) else {
            self.nav.info(format!("open {link}"));
            return;
        };
        match blog::read_post(&self.host().site().posts_dir, filename) {
            Ok(post) => {
                info!(filename, "post opened");
                let width = usize::from(self.host().size().cols);
                self.pager = Some(Pager::new(post, width));
            }
            Err(err) => {
                warn!(%err, "failed to open post");
                self.nav.error(POST_LOAD_FAILED);
            }
        }
    }

    // -- Painting -----------------------------------------------------------

    fn header(&self, width: usize) -> Line {
        let host = self.host();
        let site = host.site();
        let left = if site.owner.is_empty() {
            format!(" {}  {}", site.title, self.nav.current_section().name)
        } else {
            format!(" {}  {}  {}", site.title, self.nav.current_section().name, site.owner)
        };
        let clock = format!("{} ", host.clock());
        let gap = width.saturating_sub(left.width() + clock.width());
        Line::new()
            .span(left, Color::Default, Style::INVERSE | Style::BOLD)
            .span(" ".repeat(gap), Color::Default, Style::INVERSE)
            .span(clock, Color::Default, Style::INVERSE)
            .fill(Style::INVERSE)
    }

    fn paint_content(&self, screen: &mut Screen, rows: usize) {
        let host = self.host();
        let layout = host.layout();
        let selected = host.selected();
        let dim = if host.is_transitioning() { Style::DIM } else { Style::empty() };

        for (y, row) in layout.rows.iter().skip(host.scroll()).take(rows).enumerate() {
            let index = host.scroll() + y;
            let is_selected = row.item.is_some() && row.item == selected;
            let first_row = row.item.and_then(|i| layout.items.get(i)).is_some_and(|span| span.top == index);

            let gutter = match (host.vim(), row.item, selected) {
                (true, Some(i), Some(s)) if first_row => {
                    let n = if i == s { i + 1 } else { i.abs_diff(s) };
                    format!("{:>2}", n.min(99))
                }
                _ => "  ".to_string(),
            };
            let marker = if is_selected && first_row { "▌ " } else { "  " };
            let (fg, style) = match row.kind {
                RowKind::Title if is_selected => (Color::Cyan, Style::BOLD),
                RowKind::Title => (Color::Default, Style::BOLD),
                _ if is_selected => (Color::Default, Style::empty()),
                _ if row.item.is_some() => (Color::Gray, Style::empty()),
                _ => (Color::Default, Style::ITALIC),
            };

            let line = Line::new()
                .span(gutter, Color::Gray, dim)
                .span(marker, Color::Cyan, Style::BOLD | dim)
                .span(row.text.clone(), fg, style | dim);
            screen.set(u16::try_from(y + 1).unwrap_or(u16::MAX), line);
        }
    }

    fn message_line_count(&self) -> usize {
        self.nav.messages().iter().map(|m| m.text.lines().count()).sum()
    }

    /// Screen rows the message stack covers in a content area of `rows`.
    fn message_rows(&self, rows: usize) -> Range<usize> {
        let shown = self.message_line_count().min(rows);
        rows + 1 - shown..rows + 1
    }

    /// Messages stack upward from just above the status line, newest at
    /// the bottom.
    fn paint_messages(&self, screen: &mut Screen, rows: usize) {
        let covered = self.message_rows(rows);
        let mut lines: Vec<Line> = Vec::new();
        for message in self.nav.messages().iter() {
            let fg = match message.kind {
                MessageKind::Info => Color::Green,
                MessageKind::Error => Color::Red,
            };
            for text in message.text.lines() {
                lines.push(Line::new().span(format!(" {text}"), fg, Style::empty()));
            }
        }
        let first = lines.len() - covered.len();
        for (y, line) in covered.zip(lines.into_iter().skip(first)) {
            screen.set(u16::try_from(y).unwrap_or(u16::MAX), line);
        }
    }

    fn status(&self) -> Line {
        if let Some(pager) = &self.pager {
            return Line::new()
                .span(format!(" {} │ {}", pager.title(), pager.position()), Color::Default, Style::INVERSE)
                .fill(Style::INVERSE);
        }
        let mode_color = match self.nav.mode() {
            Mode::Normal => Color::Green,
            Mode::Command => Color::Yellow,
        };
        let mut line = Line::new().span(
            format!(" {}", self.host().status_line()),
            mode_color,
            Style::INVERSE | Style::BOLD,
        );
        if self.nav.vim_flag() {
            line = line.span(" [vim]", Color::Default, Style::INVERSE);
        }
        line.fill(Style::INVERSE)
    }

    fn command_row(&self) -> Line {
        if self.pager.is_some() {
            return Line::new().span(PAGER_HINT, Color::Gray, Style::empty());
        }
        if let Some(prompt) = self.nav.prompt() {
            return Line::new().span(prompt.question.clone(), Color::Yellow, Style::BOLD);
        }
        match self.nav.mode() {
            Mode::Command => Line::raw(format!(":{}", self.nav.command_line().input())),
            Mode::Normal => Line::new().span(NORMAL_HINT, Color::Gray, Style::empty()),
        }
    }
}

impl App for Portfolio {
    fn on_event(&mut self, event: &Event) -> Action {
        let now = Instant::now();
        if self.pager.is_some() {
            self.pager_event(event);
            return Action::Continue;
        }

        // Measured before the click can dismiss them.
        let covered = self.message_rows(self.host().content_rows());
        self.nav.handle_event(event, now);
        if let Event::Mouse(mouse) = event {
            if mouse.kind == MouseKind::Press(MouseButton::Left) {
                self.click(mouse.y, &covered);
            }
        }
        while let Some(link) = self.nav.host_mut().take_activation() {
            self.open(&link);
        }

        if self.nav.is_closed() { Action::Quit } else { Action::Continue }
    }

    fn on_resize(&mut self, size: Size) {
        self.nav.host_mut().resize(size);
    }

    fn on_tick(&mut self) -> bool {
        self.nav.tick(Instant::now())
    }

    fn paint(&mut self, screen: &mut Screen) {
        let height = screen.height();
        if height < CHROME_ROWS {
            screen.set(0, Line::raw("terminal too small"));
            return;
        }
        let rows = usize::from(height - CHROME_ROWS);

        screen.set(0, self.header(usize::from(screen.width())));
        match &mut self.pager {
            Some(pager) => pager.paint(screen, 1, height - CHROME_ROWS),
            None => {
                self.paint_content(screen, rows);
                self.paint_messages(screen, rows);
            }
        }
        screen.set(height - 2, self.status());
        screen.set(height - 1, self.command_row());
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        if self.pager.is_some() || self.nav.prompt().is_some() || !self.nav.mode().shows_cursor() {
            return None;
        }
        let x = 1 + self.nav.command_line().before_cursor().width();
        let y = self.host().size().rows.checked_sub(1)?;
        Some((u16::try_from(x).unwrap_or(u16::MAX), y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_term::input::{Modifiers, MouseEvent};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;

    const SIZE: Size = Size { cols: 60, rows: 20 };

    fn portfolio(posts: &Path) -> Portfolio {
        let mut site = Site::parse(crate::site::BUNDLED).unwrap();
        site.posts_dir = posts.to_path_buf();
        Portfolio::new(site, SIZE).unwrap()
    }

    fn with_post() -> (tempfile::TempDir, Portfolio) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("first-post.md"),
            "---\ntitle: Hello World\ndate: 2024-01-15\ncategory: Research\n---\n# Hello\nFirst post.",
        )
        .unwrap();
        let app = portfolio(dir.path());
        (dir, app)
    }

    fn key(app: &mut Portfolio, code: KeyCode) -> Action {
        app.on_event(&Event::Key(KeyEvent::plain(code)))
    }

    fn typed(app: &mut Portfolio, text: &str) {
        for c in text.chars() {
            key(app, KeyCode::Char(c));
        }
    }

    fn frame(app: &mut Portfolio) -> Screen {
        let mut screen = Screen::new(SIZE);
        app.paint(&mut screen);
        screen
    }

    fn row(screen: &Screen, y: u16) -> String {
        screen.row(y).map(Line::text).unwrap_or_default()
    }

    #[test]
    fn first_frame() {
        let (_dir, mut app) = with_post();
        let screen = frame(&mut app);
        assert!(row(&screen, 0).starts_with(" ~/portfolio  Menu  Your Name"));
        assert_eq!(row(&screen, 18), " -- NORMAL -- │ Menu │ 1/5");
        assert_eq!(row(&screen, 19), NORMAL_HINT);
        assert!((1..18).any(|y| row(&screen, y).contains("▌ About")));
    }

    #[test]
    fn command_line_navigates() {
        let (_dir, mut app) = with_post();
        typed(&mut app, ":abo");
        assert_eq!(app.cursor(), Some((4, 19)));
        assert_eq!(row(&frame(&mut app), 19), ":abo");

        typed(&mut app, "ut");
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.navigator().current_id().as_str(), "about-section");
        assert_eq!(app.cursor(), None);
    }

    #[test]
    fn unknown_command_shows_error() {
        let (_dir, mut app) = with_post();
        typed(&mut app, ":xyz123");
        key(&mut app, KeyCode::Enter);
        let screen = frame(&mut app);
        assert_eq!(row(&screen, 17), " command not found: xyz123");
    }

    #[test]
    fn opening_a_post() {
        let (_dir, mut app) = with_post();
        typed(&mut app, ":blog");
        key(&mut app, KeyCode::Enter);
        key(&mut app, KeyCode::Enter);

        assert_eq!(app.pager().map(Pager::title), Some("Hello World"));
        let screen = frame(&mut app);
        assert_eq!(row(&screen, 1), "  Hello World");
        assert_eq!(row(&screen, 19), PAGER_HINT);

        // Keys go to the pager, not the navigator.
        key(&mut app, KeyCode::Char('j'));
        assert_eq!(app.navigator().current_id().as_str(), "blog-section");
        key(&mut app, KeyCode::Char('q'));
        assert!(app.pager().is_none());
    }

    #[test]
    fn missing_post_is_reported() {
        let (dir, mut app) = with_post();
        fs::remove_file(dir.path().join("first-post.md")).unwrap();
        typed(&mut app, ":blog");
        key(&mut app, KeyCode::Enter);
        key(&mut app, KeyCode::Enter);

        assert!(app.pager().is_none());
        let texts: Vec<_> = app.navigator().messages().iter().map(|m| m.text.clone()).collect();
        assert_eq!(texts, [POST_LOAD_FAILED]);
    }

    #[test]
    fn external_links_are_announced() {
        let (_dir, mut app) = with_post();
        typed(&mut app, ":contact");
        key(&mut app, KeyCode::Enter);
        key(&mut app, KeyCode::Enter);
        let texts: Vec<_> = app.navigator().messages().iter().map(|m| m.text.clone()).collect();
        assert_eq!(texts, ["open mailto:you@example.com"]);
    }

    #[test]
    fn click_selects_then_opens() {
        let (_dir, mut app) = with_post();
        let screen = frame(&mut app);
        let y = (1..18).find(|&y| row(&screen, y).contains("Projects")).unwrap();
        let click = Event::Mouse(MouseEvent {
            kind: MouseKind::Press(MouseButton::Left),
            x: 5,
            y,
        });

        app.on_event(&click);
        assert_eq!(app.navigator().selection().current(), Some(1));
        assert_eq!(app.navigator().current_id().as_str(), "menu-section");
        app.on_event(&click);
        assert_eq!(app.navigator().current_id().as_str(), "projects-section");
    }

    #[test]
    fn click_on_a_message_leaves_the_selection() {
        let (_dir, mut app) = with_post();
        typed(&mut app, ":help");
        key(&mut app, KeyCode::Enter);
        std::thread::sleep(std::time::Duration::from_millis(150));

        let screen = frame(&mut app);
        let covered = app.message_rows(17);
        assert!(covered.contains(&10));
        assert!(row(&screen, 10).contains("back to the menu"));
        app.on_event(&Event::Mouse(MouseEvent {
            kind: MouseKind::Press(MouseButton::Left),
            x: 5,
            y: 10,
        }));
        assert_eq!(app.navigator().selection().current(), Some(0));
        assert!(app.navigator().messages().is_empty());
    }

    #[test]
    fn ctrl_c_quits_from_normal_mode() {
        let (_dir, mut app) = with_post();
        let action = app.on_event(&Event::Key(KeyEvent::with(KeyCode::Char('c'), Modifiers::CTRL)));
        assert_eq!(action, Action::Quit);
    }

    #[test]
    fn vim_flag_numbers_items() {
        let (_dir, mut app) = with_post();
        typed(&mut app, ":vim");
        key(&mut app, KeyCode::Enter);
        let screen = frame(&mut app);
        assert!((1..18).any(|y| row(&screen, y).starts_with(" 1▌ About")));
        assert!((1..18).any(|y| row(&screen, y).starts_with(" 1  Projects")));
        assert!(row(&screen, 18).ends_with("[vim]"));
    }
}
