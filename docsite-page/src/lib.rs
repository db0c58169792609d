//! Docsite Page Behaviors
//!
//! Platform-agnostic core for the documentation site's browser behaviors:
//! theme switching, the mobile sidebar, code block enhancement and the
//! table-of-contents highlighter. Every behavior is a function from
//! DOM-derived state and an event to a list of [`Mutation`]s; the
//! [`PageController`] owns the little state that exists and drives a
//! platform [`Host`].

pub mod active_section;
pub mod code_block;
pub mod config;
pub mod controller;
pub mod mutation;
pub mod prefs;
pub mod registry;
pub mod sidebar;
pub mod testing;
pub mod theme;

pub use active_section::{ActiveSections, IntersectionEntry};
pub use code_block::{ClipboardError, CopyState, LanguageMatcher};
pub use config::{ConfigError, PageConfig};
pub use controller::{BlockSnapshot, PageController, PageSnapshot};
pub use mutation::{BlockId, Host, Mutation, Node};
pub use prefs::{MemoryStore, PreferenceStore, ThemePreferences};
pub use registry::{Registration, WiringRegistry};
pub use sidebar::{SidebarEvent, SidebarState};
pub use theme::{ParseThemeError, Theme, ThemeAsset, ThemeChange, ThemeSource};
