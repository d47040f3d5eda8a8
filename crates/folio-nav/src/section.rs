//! Sections and the section registry.
//!
//! A [`Section`] is a named content region of the portfolio. The
//! [`SectionRegistry`] is built once at startup and never changes; one of
//! its sections is the root (the menu), which is both the initial section
//! and the target of "go back".
//!
//! Section ids follow the `<base>-section` convention so that typing the
//! base name on the command line (`about`) reaches `about-section`.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Suffix every shortcut-addressable section id carries.
pub const SECTION_SUFFIX: &str = "-section";

// ---------------------------------------------------------------------------
// SectionId
// ---------------------------------------------------------------------------

/// Stable identifier of a section, e.g. `about-section`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id a command-line shortcut `base` refers to (`about` →
    /// `about-section`).
    #[must_use]
    pub fn from_base(base: &str) -> Self {
        Self(format!("{base}{SECTION_SUFFIX}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id without the `-section` suffix, if it has one.
    #[must_use]
    pub fn base_name(&self) -> Option<&str> {
        self.0.strip_suffix(SECTION_SUFFIX)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// A content region with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Section {
    pub id: SectionId,
    /// Human-readable name for the status readout and `pwd`.
    pub name: String,
    /// Which child elements count as selectable items. Interpreted by the
    /// host (a comma-separated list of `.class` tokens in the terminal host).
    #[serde(default)]
    pub selector: String,
}

impl Section {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            id: SectionId::new(id),
            name: name.into(),
            selector: selector.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// What activating an item does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Show another section (menu entries).
    Section(SectionId),
    /// Open a link or host-defined action (project URL, blog post file).
    Link(String),
}

/// One selectable element of the current section, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub title: Option<String>,
    pub target: Option<Target>,
}

impl Item {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            target: None,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    /// Title for listings, `Item N` (1-based) when the item has none.
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("Item {}", index + 1),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no sections defined")]
    Empty,
    #[error("root section `{0}` is not registered")]
    UnknownRoot(SectionId),
    #[error("section `{0}` is defined twice")]
    Duplicate(SectionId),
}

/// The static set of sections, in registration order.
#[derive(Debug, Clone)]
pub struct SectionRegistry {
    sections: Vec<Section>,
    root: usize,
}

impl SectionRegistry {
    /// Build the registry.
    ///
    /// # Errors
    ///
    /// Fails if `sections` is empty, an id repeats, or `root` is missing.
    pub fn new(root: &SectionId, sections: Vec<Section>) -> Result<Self, RegistryError> {
        if sections.is_empty() {
            return Err(RegistryError::Empty);
        }
        for (i, section) in sections.iter().enumerate() {
            if sections[..i].iter().any(|s| s.id == section.id) {
                return Err(RegistryError::Duplicate(section.id.clone()));
            }
        }
        let root = sections
            .iter()
            .position(|s| &s.id == root)
            .ok_or_else(|| RegistryError::UnknownRoot(root.clone()))?;
        Ok(Self { sections, root })
    }

    #[must_use]
    pub fn root(&self) -> &Section {
        &self.sections[self.root]
    }

    #[must_use]
    pub fn is_root(&self, id: &SectionId) -> bool {
        &self.root().id == id
    }

    #[must_use]
    pub fn get(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: &SectionId) -> bool {
        self.get(id).is_some()
    }

    /// Resolve a command-line shortcut: `base` names `base-section`.
    #[must_use]
    pub fn shortcut(&self, base: &str) -> Option<&Section> {
        if base.is_empty() {
            return None;
        }
        self.get(&SectionId::from_base(base))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false; a registry holds at least the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry() -> SectionRegistry {
        SectionRegistry::new(
            &SectionId::new("menu-section"),
            vec![
                Section::new("menu-section", "Menu", ".menu-item"),
                Section::new("about-section", "About", ".paragraph"),
                Section::new("projects-section", "Projects", ".project-card"),
                Section::new("contact", "Contact", ".link"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn root_is_designated() {
        let reg = registry();
        assert_eq!(reg.root().name, "Menu");
        assert!(reg.is_root(&"menu-section".into()));
        assert!(!reg.is_root(&"about-section".into()));
    }

    #[test]
    fn shortcut_resolves_suffixed_ids() {
        let reg = registry();
        assert_eq!(reg.shortcut("about").map(|s| s.name.as_str()), Some("About"));
        assert!(reg.shortcut("contact").is_none());
        assert!(reg.shortcut("").is_none());
    }

    #[test]
    fn base_name_strips_suffix() {
        assert_eq!(SectionId::new("about-section").base_name(), Some("about"));
        assert_eq!(SectionId::new("contact").base_name(), None);
        assert_eq!(SectionId::from_base("blog").as_str(), "blog-section");
    }

    #[test]
    fn empty_registry_rejected() {
        let err = SectionRegistry::new(&"menu-section".into(), Vec::new()).unwrap_err();
        assert_eq!(err, RegistryError::Empty);
    }

    #[test]
    fn unknown_root_rejected() {
        let err = SectionRegistry::new(
            &"home-section".into(),
            vec![Section::new("menu-section", "Menu", "")],
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "root section `home-section` is not registered");
    }

    #[test]
    fn duplicate_rejected() {
        let err = SectionRegistry::new(
            &"menu-section".into(),
            vec![
                Section::new("menu-section", "Menu", ""),
                Section::new("menu-section", "Menu again", ""),
            ],
        )
        .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("menu-section".into()));
    }

    #[test]
    fn registration_order_kept() {
        let ids: Vec<_> = registry().iter().map(|s| s.id.to_string()).collect();
        assert_eq!(ids, ["menu-section", "about-section", "projects-section", "contact"]);
    }

    #[test]
    fn item_label_falls_back_to_position() {
        assert_eq!(Item::titled("Rust").label(0), "Rust");
        assert_eq!(Item::default().label(2), "Item 3");
        assert_eq!(Item::titled("   ").label(0), "Item 1");
    }
}
