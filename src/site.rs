//! The site description: sections, their content blocks and settings.
//!
//! Loaded from TOML:
//!
//! ```toml
//! title = "~/portfolio"
//! owner = "Ada"
//! root = "menu-section"
//!
//! [navigator]
//! page_size = 5
//!
//! [[sections]]
//! id = "menu-section"
//! name = "Menu"
//! selector = ".menu-item"
//!
//! [[sections.blocks]]
//! class = "menu-item"
//! title = "About"
//! target = "about-section"
//! ```
//!
//! A block is one piece of content. Blocks whose class matches the section
//! selector are its selectable items; the rest are decoration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use folio_nav::section::RegistryError;
use folio_nav::{Item, NavigatorConfig, Section, SectionId, SectionRegistry, Target};
use serde::Deserialize;
use thiserror::Error;

/// The site that ships with the binary.
pub const BUNDLED: &str = include_str!("../assets/site.toml");

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid site file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn default_title() -> String {
    "~/portfolio".to_string()
}

fn default_root() -> SectionId {
    SectionId::new("menu-section")
}

fn default_posts_section() -> SectionId {
    SectionId::new(folio_nav::navigator::DEFAULT_POSTS_SECTION)
}

fn default_posts_dir() -> PathBuf {
    PathBuf::from("posts")
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Site {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default = "default_root")]
    pub root: SectionId,
    #[serde(default = "default_posts_section")]
    pub posts_section: SectionId,
    #[serde(default = "default_posts_dir")]
    pub posts_dir: PathBuf,
    #[serde(default)]
    pub navigator: NavigatorConfig,
    pub sections: Vec<SectionDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionDef {
    #[serde(flatten)]
    pub section: Section,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Block {
    #[serde(default)]
    pub class: String,
    pub title: Option<String>,
    #[serde(default)]
    pub body: String,
    /// Section opened when the block is activated.
    pub target: Option<SectionId>,
    /// Link opened when the block is activated.
    pub link: Option<String>,
}

impl Block {
    /// Whether `selector` (comma-separated `.class` tokens) picks this block.
    #[must_use]
    pub fn matches(&self, selector: &str) -> bool {
        !self.class.is_empty()
            && selector
                .split(',')
                .filter_map(|token| token.trim().strip_prefix('.'))
                .any(|class| class == self.class)
    }

    #[must_use]
    pub fn to_item(&self) -> Item {
        let target = match (&self.target, &self.link) {
            (Some(id), _) => Some(Target::Section(id.clone())),
            (None, Some(link)) => Some(Target::Link(link.clone())),
            (None, None) => None,
        };
        Item {
            title: self.title.clone(),
            target,
        }
    }
}

impl Site {
    /// Parse a site description. Relative `posts_dir` paths stay relative
    /// to the working directory.
    ///
    /// # Errors
    ///
    /// Fails on invalid TOML.
    pub fn parse(text: &str) -> Result<Self, SiteError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a site file. A relative `posts_dir` is taken relative to the
    /// file's directory.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let text = fs::read_to_string(path).map_err(|source| SiteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut site = Self::parse(&text)?;
        if site.posts_dir.is_relative() {
            if let Some(dir) = path.parent() {
                site.posts_dir = dir.join(&site.posts_dir);
            }
        }
        Ok(site)
    }

    /// # Errors
    ///
    /// Fails on an empty section list, a duplicate id or an unknown root.
    pub fn registry(&self) -> Result<SectionRegistry, SiteError> {
        let sections = self.sections.iter().map(|def| def.section.clone()).collect();
        Ok(SectionRegistry::new(&self.root, sections)?)
    }

    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&SectionDef> {
        self.sections.iter().find(|def| &def.section.id == id)
    }

    pub fn section_mut(&mut self, id: &SectionId) -> Option<&mut SectionDef> {
        self.sections.iter_mut().find(|def| &def.section.id == id)
    }

    /// Targets pointing at sections that do not exist.
    #[must_use]
    pub fn dangling_targets(&self) -> Vec<(SectionId, SectionId)> {
        self.sections
            .iter()
            .flat_map(|def| {
                def.blocks
                    .iter()
                    .filter_map(|b| b.target.clone())
                    .filter(|t| self.section(t).is_none())
                    .map(|t| (def.section.id.clone(), t))
            })
            .collect()
    }
}

impl SectionDef {
    /// The blocks that are selectable items, in order.
    pub fn selectable(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.matches(&self.section.selector))
    }
}
