//! Marks the sidebar link for the section currently being read.
//!
//! Headings are observed with a root margin that makes a heading "current"
//! once it enters a band below the top of the viewport and before it passes
//! the vertical midpoint. Each intersecting entry clears every link and
//! re-marks its own, so within one notification batch the last intersecting
//! entry wins regardless of where the headings sit on the page.

use crate::config::PageConfig;
use crate::mutation::{Mutation, Node};

/// One observed heading crossing the viewport band.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub id: String,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn entering(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_intersecting: true,
        }
    }

    pub fn leaving(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_intersecting: false,
        }
    }
}

/// Sidebar links by document order, as their `href` values.
#[derive(Debug, Clone, Default)]
pub struct ActiveSections {
    hrefs: Vec<String>,
}

impl ActiveSections {
    #[must_use]
    pub const fn new(hrefs: Vec<String>) -> Self {
        Self { hrefs }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hrefs.is_empty()
    }

    fn matches(href: &str, id: &str) -> bool {
        href.strip_prefix('#') == Some(id)
    }

    /// Link left active after processing `entries`, if any.
    #[must_use]
    pub fn active_link(&self, entries: &[IntersectionEntry]) -> Option<usize> {
        let last = entries.iter().rev().find(|e| e.is_intersecting)?;
        self.hrefs.iter().position(|h| Self::matches(h, &last.id))
    }

    /// Clear-and-reapply for every intersecting entry, in batch order.
    #[must_use]
    pub fn react(&self, entries: &[IntersectionEntry], config: &PageConfig) -> Vec<Mutation> {
        let mut out = Vec::new();
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            for (idx, href) in self.hrefs.iter().enumerate() {
                let node = Node::Link(idx);
                for class in &config.active_link_classes {
                    out.push(Mutation::remove_class(node, class));
                }
                if Self::matches(href, &entry.id) {
                    for class in &config.active_link_classes {
                        out.push(Mutation::add_class(node, class));
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> ActiveSections {
        ActiveSections::new(vec!["#a".into(), "#b".into(), "#c".into()])
    }

    #[test]
    fn leaving_entries_change_nothing() {
        let cfg = PageConfig::default();
        assert!(sections().react(&[IntersectionEntry::leaving("b")], &cfg).is_empty());
        assert_eq!(sections().active_link(&[IntersectionEntry::leaving("b")]), None);
    }

    #[test]
    fn last_intersecting_entry_wins() {
        let entries = [
            IntersectionEntry::entering("c"),
            IntersectionEntry::entering("a"),
            IntersectionEntry::leaving("b"),
        ];
        assert_eq!(sections().active_link(&entries), Some(0));
    }

    #[test]
    fn href_must_match_exactly() {
        let s = ActiveSections::new(vec!["#ab".into(), "/page#a".into(), "a".into()]);
        assert_eq!(s.active_link(&[IntersectionEntry::entering("a")]), None);
    }
}
