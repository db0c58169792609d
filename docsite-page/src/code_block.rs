//! Code block language tagging and the copy-to-clipboard affordance.

use regex::Regex;
use thiserror::Error;

use crate::config::PageConfig;
use crate::mutation::{BlockId, Mutation, Node};

pub const COPY_ICON: &str = r#"<svg width="14" height="14" viewBox="0 0 16 16" fill="currentColor"><path fill-rule="evenodd" d="M0 6.75C0 5.784.784 5 1.75 5h1.5a.75.75 0 010 1.5h-1.5a.25.25 0 00-.25.25v7.5c0 .138.112.25.25.25h7.5a.25.25 0 00.25-.25v-1.5a.75.75 0 011.5 0v1.5A1.75 1.75 0 019.25 16h-7.5A1.75 1.75 0 010 14.25v-7.5z"></path><path fill-rule="evenodd" d="M5 1.75C5 .784 5.784 0 6.75 0h7.5C15.216 0 16 .784 16 1.75v7.5A1.75 1.75 0 0114.25 11h-7.5A1.75 1.75 0 015 9.25v-7.5zm1.75-.25a.25.25 0 00-.25.25v7.5c0 .138.112.25.25.25h7.5a.25.25 0 00.25-.25v-7.5a.25.25 0 00-.25-.25h-7.5z"></path></svg>"#;
pub const CHECK_ICON: &str = r#"<svg width="14" height="14" viewBox="0 0 16 16" fill="currentColor"><path fill-rule="evenodd" d="M13.78 4.22a.75.75 0 010 1.06l-7.25 7.25a.75.75 0 01-1.06 0L2.22 9.28a.75.75 0 011.06-1.06L6 10.94l6.72-6.72a.75.75 0 011.06 0z"></path></svg>"#;
pub const FAILED_GLYPH: &str = "\u{2717}";

pub const RESTING_TITLE: &str = "Copy to clipboard";
pub const COPIED_TITLE: &str = "Copied!";
pub const FAILED_TITLE: &str = "Copy failed";

/// Why a clipboard write did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable")]
    Unavailable,
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}

/// Finds `<prefix>-<identifier>` in a class attribute.
#[derive(Debug, Clone)]
pub struct LanguageMatcher {
    prefix: String,
    pattern: Regex,
}

impl LanguageMatcher {
    /// # Errors
    ///
    /// Returns an error if the prefix cannot form a valid pattern.
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!("{}-([A-Za-z0-9_]+)", regex::escape(prefix)))?;
        Ok(Self {
            prefix: prefix.to_string(),
            pattern,
        })
    }

    #[must_use]
    pub fn detect<'a>(&self, class: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(class)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    #[must_use]
    pub fn class_for(&self, language: &str) -> String {
        format!("{}-{language}", self.prefix)
    }
}

/// Mirror the block's language onto its container. Unmarked blocks are left alone.
#[must_use]
pub fn enhance(block: BlockId, code_class: &str, matcher: &LanguageMatcher) -> Vec<Mutation> {
    let Some(language) = matcher.detect(code_class) else {
        return Vec::new();
    };
    vec![
        Mutation::set_attribute(Node::Block(block), "data-language", language),
        Mutation::add_class(Node::Code(block), matcher.class_for(language)),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyState {
    #[default]
    Resting,
    Copied,
    Failed,
}

impl CopyState {
    #[must_use]
    pub fn from_outcome(outcome: &Result<(), ClipboardError>) -> Self {
        if outcome.is_ok() {
            Self::Copied
        } else {
            Self::Failed
        }
    }
}

#[must_use]
pub fn render_copy(block: BlockId, state: CopyState, config: &PageConfig) -> Vec<Mutation> {
    let node = Node::CopyButton(block);
    match state {
        CopyState::Resting => vec![
            Mutation::set_inner_html(node, COPY_ICON),
            Mutation::remove_class(node, &config.copied_class),
            Mutation::remove_class(node, &config.copy_failed_class),
            Mutation::set_attribute(node, "title", RESTING_TITLE),
        ],
        CopyState::Copied => vec![
            Mutation::set_inner_html(node, CHECK_ICON),
            Mutation::remove_class(node, &config.copy_failed_class),
            Mutation::add_class(node, &config.copied_class),
            Mutation::set_attribute(node, "title", COPIED_TITLE),
        ],
        CopyState::Failed => vec![
            Mutation::set_inner_html(node, FAILED_GLYPH),
            Mutation::remove_class(node, &config.copied_class),
            Mutation::add_class(node, &config.copy_failed_class),
            Mutation::set_attribute(node, "title", FAILED_TITLE),
        ],
    }
}

/// Prepare a block's copy button the first time the block is wired.
///
/// `button_text` is `None` when the block has no button yet. Existing
/// buttons keep custom content; a plain "Copy" label becomes the icon.
#[must_use]
pub fn prepare_button(
    block: BlockId,
    button_text: Option<&str>,
    config: &PageConfig,
) -> Vec<Mutation> {
    let node = Node::CopyButton(block);
    match button_text {
        None => {
            let mut out = vec![Mutation::InsertCopyButton { block }];
            out.extend(render_copy(block, CopyState::Resting, config));
            out
        }
        Some(text) if text.trim() == "Copy" => vec![
            Mutation::set_inner_html(node, COPY_ICON),
            Mutation::set_attribute(node, "title", RESTING_TITLE),
        ],
        Some(_) => vec![Mutation::set_attribute(node, "title", RESTING_TITLE)],
    }
}
