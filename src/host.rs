//! The terminal side of the navigator: section content, scroll position and
//! the readouts painted around it.

use chrono::{DateTime, Local};
use folio_nav::host::{Bounds, Viewport};
use folio_nav::status::Status;
use folio_nav::{Host, Item, Section, SectionId};
use folio_term::terminal::Size;
use tracing::{debug, info, warn};

use crate::blog::{self, PostMeta};
use crate::layout::{Layout, ROW_UNITS};
use crate::site::{Block, Site};

/// Block class of generated post cards.
pub const POST_CLASS: &str = "blog-post";

/// Link prefix of post cards; the rest is the post file name.
pub const POST_LINK_PREFIX: &str = "posts/";

/// Rows taken by the header, status line and command line.
pub const CHROME_ROWS: u16 = 3;

pub struct TerminalHost {
    site: Site,

    active: SectionId,
    layout: Layout,
    selected: Option<usize>,
    /// First content row on screen.
    scroll: usize,
    size: Size,

    transitioning: bool,
    vim: bool,
    clock: String,
    status: String,
    activation: Option<String>,
}

impl TerminalHost {
    /// A host for `site` on a terminal of `size`. Posts are read right away
    /// so the posts section is populated before the first frame.
    pub fn new(site: Site, size: Size) -> Self {
        let active = site.root.clone();
        let mut host = Self {
            site,
            active,
            layout: Layout::default(),
            selected: None,
            scroll: 0,
            size,
            transitioning: false,
            vim: false,
            clock: String::new(),
            status: String::new(),
            activation: None,
        };
        host.load_posts();
        host
    }

    // -- Readouts -----------------------------------------------------------

    #[must_use]
    pub const fn site(&self) -> &Site {
        &self.site
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    #[must_use]
    pub const fn vim(&self) -> bool {
        self.vim
    }

    #[must_use]
    pub fn clock(&self) -> &str {
        &self.clock
    }

    #[must_use]
    pub fn status_line(&self) -> &str {
        &self.status
    }

    /// The link activated since the last call, if any.
    pub const fn take_activation(&mut self) -> Option<String> {
        self.activation.take()
    }

    // -- Geometry -----------------------------------------------------------

    /// Rows available for section content.
    #[must_use]
    pub fn content_rows(&self) -> usize {
        usize::from(self.size.rows.saturating_sub(CHROME_ROWS))
    }

    fn max_scroll(&self) -> usize {
        self.layout.rows.len().saturating_sub(self.content_rows())
    }

    /// The item drawn on screen row `y` of the content area.
    #[must_use]
    pub fn item_at_screen_row(&self, y: usize) -> Option<usize> {
        if y >= self.content_rows() {
            return None;
        }
        self.layout.item_at(self.scroll + y)
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.relayout();
    }

    fn relayout(&mut self) {
        let Some(def) = self.site.section(&self.active) else {
            self.layout = Layout::default();
            return;
        };
        self.layout = Layout::build(def, usize::from(self.size.cols));
        self.scroll = self.scroll.min(self.max_scroll());
        self.keep_selection_visible();
    }

    /// After a relayout the centering offset the navigator computed may be
    /// stale; keep at least the top of the selected item on screen.
    fn keep_selection_visible(&mut self) {
        let Some(span) = self.selected.and_then(|i| self.layout.items.get(i)) else {
            return;
        };
        let rows = self.content_rows().max(1);
        if span.top < self.scroll {
            self.scroll = span.top;
        } else if span.top >= self.scroll + rows {
            self.scroll = (span.top + span.height).saturating_sub(rows).min(span.top);
        }
        self.scroll = self.scroll.min(self.max_scroll());
    }

    fn post_block(post: &PostMeta) -> Block {
        let mut meta = post.display_date();
        if !post.category.is_empty() {
            meta.push_str(" · ");
            meta.push_str(&post.category);
        }
        Block {
            class: POST_CLASS.to_string(),
            title: Some(post.title.clone()),
            body: format!("{meta}\n{}", post.excerpt),
            target: None,
            link: Some(format!("{POST_LINK_PREFIX}{}", post.filename)),
        }
    }
}

fn to_units(rows: usize) -> i32 {
    i32::try_from(rows).unwrap_or(i32::MAX).saturating_mul(ROW_UNITS)
}

impl Host for TerminalHost {
    fn items(&mut self, section: &Section) -> Vec<Item> {
        self.site
            .section(&section.id)
            .map(|def| def.selectable().map(Block::to_item).collect())
            .unwrap_or_default()
    }

    fn set_section_active(&mut self, section: &SectionId, active: bool) {
        if !active {
            return;
        }
        debug!(%section, "section shown");
        self.active = section.clone();
        self.selected = None;
        self.scroll = 0;
        self.relayout();
    }

    fn on_selection(&mut self, section: &SectionId, index: Option<usize>) {
        if section == &self.active {
            self.selected = index;
        }
    }

    fn item_bounds(&self, section: &SectionId, index: usize) -> Option<Bounds> {
        if section != &self.active {
            return None;
        }
        let span = self.layout.items.get(index)?;
        Some(Bounds {
            top: to_units(span.top),
            height: to_units(span.height),
        })
    }

    fn viewport(&self) -> Option<Viewport> {
        Some(Viewport {
            top: to_units(self.scroll),
            height: to_units(self.content_rows()),
        })
    }

    fn scroll_by(&mut self, delta: i32) {
        // Round to the nearest whole row.
        let rows = delta.saturating_add(delta.signum() * ROW_UNITS / 2) / ROW_UNITS;
        let target = i64::try_from(self.scroll).unwrap_or(i64::MAX) + i64::from(rows);
        let max = i64::try_from(self.max_scroll()).unwrap_or(i64::MAX);
        self.scroll = usize::try_from(target.clamp(0, max)).unwrap_or(0);
    }

    fn on_status(&mut self, status: &Status) {
        self.status = status.to_string();
    }

    fn start_transition(&mut self, _section: &SectionId) {
        self.transitioning = true;
    }

    fn end_transition(&mut self, _section: &SectionId) {
        self.transitioning = false;
    }

    fn activate(&mut self, link: &str) {
        debug!(link, "item activated");
        self.activation = Some(link.to_string());
    }

    fn load_posts(&mut self) {
        let posts = match blog::load_catalog(&self.site.posts_dir) {
            Ok(posts) => posts,
            Err(err) => {
                warn!(%err, "failed to load posts");
                Vec::new()
            }
        };
        let posts_section = self.site.posts_section.clone();
        let cards: Vec<Block> = posts.iter().map(Self::post_block).collect();
        let Some(def) = self.site.section_mut(&posts_section) else {
            warn!(section = %posts_section, "posts section is not defined");
            return;
        };
        def.blocks.retain(|b| b.class != POST_CLASS);
        def.blocks.extend(cards);
        info!(count = posts.len(), "posts loaded");
        if self.active == posts_section {
            self.relayout();
        }
    }

    fn set_vim_flag(&mut self, on: bool) {
        self.vim = on;
    }

    fn on_clock(&mut self, now: DateTime<Local>) {
        self.clock = now.format("%H:%M:%S").to_string();
    }
}
