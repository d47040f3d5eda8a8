//! # folio-nav: the termfolio navigation controller
//!
//! A vim-style state machine over a static set of content sections:
//!
//! - **[`mode`]**: `Normal` / `Command`
//! - **[`section`]**: sections, items and the registry with its root
//! - **[`selection`]**: clamped selection, `gg` detection, scroll centering
//! - **[`command`]**: the `:` line, parsing and the built-in dispatch table
//! - **[`history`]**: submitted command lines, most recent first
//! - **[`message`]**: transient messages with timeout and interaction dismissal
//! - **[`navigator`]**: the controller tying it together, driving a [`Host`]
//!
//! The crate renders nothing. Everything visible goes through the
//! [`host::Host`] trait.

pub mod command;
pub mod config;
pub mod history;
pub mod host;
pub mod message;
pub mod mode;
pub mod navigator;
pub mod section;
pub mod selection;
pub mod status;

pub use config::NavigatorConfig;
pub use host::Host;
pub use mode::Mode;
pub use navigator::Navigator;
pub use section::{Item, Section, SectionId, SectionRegistry, Target};
