//! termfolio: a portfolio in the terminal, driven like vim.
//!
//! The binary wires the crates together:
//!
//!   folio-term → raw mode, input parsing, line screen, event loop
//!   folio-nav  → modes, sections, selection, commands, messages
//!
//! [`app::Portfolio`] implements folio-term's `App` trait over a
//! `folio_nav::Navigator` whose host is [`host::TerminalHost`]. Each
//! keypress flows through:
//!
//!   stdin → parser → on_event → navigator → host callbacks
//!   paint → layout rows + readouts → screen → diff renderer → terminal

mod app;
mod blog;
mod host;
mod layout;
mod pager;
mod site;

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use folio_term::event_loop::{EventLoop, LoopConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::app::Portfolio;
use crate::site::Site;

#[derive(Debug, Parser)]
#[command(name = "termfolio", version, about = "A terminal portfolio you drive like vim")]
struct Cli {
    /// Site description to show instead of the bundled one.
    #[arg(short, long, env = "TERMFOLIO_SITE")]
    site: Option<PathBuf>,

    /// Directory of markdown posts, overriding the site's `posts_dir`.
    #[arg(short, long)]
    posts: Option<PathBuf>,

    /// Write logs to this file. Filter with `TERMFOLIO_LOG`.
    #[arg(long)]
    log: Option<PathBuf>,

    /// Input poll interval in milliseconds. Also how long a lone Esc waits
    /// for the rest of an escape sequence.
    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u64).range(1..=1000))]
    tick_ms: u64,

    /// Validate the site and print a summary instead of starting the UI.
    #[arg(long)]
    check: bool,
}

impl Cli {
    const fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            tick_interval: Duration::from_millis(self.tick_ms),
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("TERMFOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn load_site(cli: &Cli) -> Result<Site> {
    let mut site = match &cli.site {
        Some(path) => Site::load(path).with_context(|| format!("cannot load site {}", path.display()))?,
        None => Site::parse(site::BUNDLED).context("bundled site is invalid")?,
    };
    if let Some(posts) = &cli.posts {
        site.posts_dir.clone_from(posts);
    }
    Ok(site)
}

/// What `--check` prints.
fn summary(site: &Site) -> Result<String> {
    let registry = site.registry()?;
    let posts = blog::load_catalog(&site.posts_dir)?;
    let mut out = String::new();

    writeln!(out, "{} ({} sections, root {})", site.title, registry.len(), site.root)?;
    for def in &site.sections {
        writeln!(
            out,
            "  {:<20} {:<12} {} items",
            def.section.id,
            def.section.name,
            def.selectable().count()
        )?;
    }
    writeln!(out, "{} posts in {}", posts.len(), site.posts_dir.display())?;

    let dangling = site.dangling_targets();
    if !dangling.is_empty() {
        for (from, to) in &dangling {
            writeln!(out, "  {from} points at missing {to}")?;
        }
        anyhow::bail!("{out}{} dangling targets", dangling.len());
    }
    Ok(out)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log {
        init_logging(path)?;
    }

    let site = load_site(&cli)?;
    if cli.check {
        print!("{}", summary(&site)?);
        return Ok(());
    }

    let mut event_loop = EventLoop::with_config(cli.loop_config()).context("failed to initialize terminal")?;
    let mut app = Portfolio::new(site, event_loop.size())?;
    info!(size = ?event_loop.size(), "starting");
    event_loop.run(&mut app).context("terminal error")?;
    Ok(())
}
