//! DOM mutations emitted by the behaviors and the host seam that applies them.

use crate::code_block::ClipboardError;
use crate::registry::WiringRegistry;
use crate::theme::ThemeChange;

/// Identity of a wired code block, allocated by the wiring registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub usize);

/// Page elements a behavior can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    /// The document element carrying the theme marker.
    Root,
    ThemeToggle,
    Sidebar,
    SidebarOverlay,
    /// The `.highlight` container wrapping a code block.
    Block(BlockId),
    /// The `code` element inside a block.
    Code(BlockId),
    CopyButton(BlockId),
    /// Sidebar navigation link, by document order.
    Link(usize),
    /// Theme-aware image or SVG, by document order.
    ThemeAsset(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AddClass {
        node: Node,
        class: String,
    },
    RemoveClass {
        node: Node,
        class: String,
    },
    SetAttribute {
        node: Node,
        name: String,
        value: String,
    },
    SetInnerHtml {
        node: Node,
        html: String,
    },
    SetStyle {
        node: Node,
        property: &'static str,
        value: String,
    },
    /// Create the copy button for a block that has none.
    InsertCopyButton { block: BlockId },
}

impl Mutation {
    pub fn add_class(node: Node, class: impl Into<String>) -> Self {
        Self::AddClass {
            node,
            class: class.into(),
        }
    }

    pub fn remove_class(node: Node, class: impl Into<String>) -> Self {
        Self::RemoveClass {
            node,
            class: class.into(),
        }
    }

    pub fn set_attribute(node: Node, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::SetAttribute {
            node,
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn set_inner_html(node: Node, html: impl Into<String>) -> Self {
        Self::SetInnerHtml {
            node,
            html: html.into(),
        }
    }

    /// The node this mutation touches.
    #[must_use]
    pub const fn node(&self) -> Node {
        match self {
            Self::AddClass { node, .. }
            | Self::RemoveClass { node, .. }
            | Self::SetAttribute { node, .. }
            | Self::SetInnerHtml { node, .. }
            | Self::SetStyle { node, .. } => *node,
            Self::InsertCopyButton { block } => Node::CopyButton(*block),
        }
    }
}

/// Callback invoked once a clipboard write settles.
pub type ClipboardDone = Box<dyn FnOnce(Result<(), ClipboardError>)>;

/// Deferred work scheduled on the host's timer.
pub type Task = Box<dyn FnOnce()>;

/// Platform services the controller drives.
///
/// Hosts are single-threaded; implementations use interior mutability and
/// must not hold borrows while invoking `done` or scheduled tasks.
pub trait Host: 'static {
    /// Identity of a code block container, compared for wiring deduplication.
    type BlockKey: PartialEq + 'static;

    /// Apply mutations in order. Block nodes resolve through `blocks`;
    /// mutations addressing absent nodes are skipped.
    fn apply(&self, mutations: &[Mutation], blocks: &WiringRegistry<Self::BlockKey>);

    /// Write `text` to the system clipboard and report the outcome.
    fn write_clipboard(&self, text: String, done: ClipboardDone);

    /// Run `task` after `delay_ms` milliseconds.
    fn schedule(&self, delay_ms: u32, task: Task);

    /// Ask the syntax highlighter to process every code block on the page.
    fn highlight_all(&self);

    /// Notification that a theme was applied.
    fn theme_changed(&self, _change: ThemeChange) {}
}
