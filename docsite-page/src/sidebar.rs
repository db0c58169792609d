//! Collapsible navigation panel for narrow viewports.

use crate::config::PageConfig;
use crate::mutation::{Mutation, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarEvent {
    /// Toggle control activated.
    Toggle,
    /// Overlay clicked.
    Dismiss,
    /// A sidebar link was followed.
    Navigate,
}

impl SidebarState {
    /// Derive the state from whether the panel carries its hidden class.
    #[must_use]
    pub const fn from_hidden(hidden: bool) -> Self {
        if hidden { Self::Closed } else { Self::Open }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

#[must_use]
pub const fn transition(
    state: SidebarState,
    event: SidebarEvent,
    config: &PageConfig,
) -> SidebarState {
    match (state, event) {
        (SidebarState::Closed, SidebarEvent::Toggle) => SidebarState::Open,
        (SidebarState::Open, SidebarEvent::Toggle | SidebarEvent::Dismiss) => SidebarState::Closed,
        (SidebarState::Open, SidebarEvent::Navigate) if config.close_sidebar_on_navigate => {
            SidebarState::Closed
        }
        (state, _) => state,
    }
}

/// Hidden classes are present on panel and overlay exactly when closed.
#[must_use]
pub fn render(state: SidebarState, config: &PageConfig) -> Vec<Mutation> {
    let panel = &config.sidebar_hidden_class;
    let overlay = &config.overlay_hidden_class;
    if state.is_open() {
        vec![
            Mutation::remove_class(Node::Sidebar, panel),
            Mutation::remove_class(Node::SidebarOverlay, overlay),
        ]
    } else {
        vec![
            Mutation::add_class(Node::Sidebar, panel),
            Mutation::add_class(Node::SidebarOverlay, overlay),
        ]
    }
}
