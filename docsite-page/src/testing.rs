//! In-memory host for exercising the controller without a browser.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

use crate::code_block::ClipboardError;
use crate::mutation::{ClipboardDone, Host, Mutation, Node, Task};
use crate::registry::WiringRegistry;
use crate::theme::ThemeChange;

/// Presentation state of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeState {
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
    pub html: Option<String>,
}

struct Timer {
    due: u64,
    seq: u64,
    task: Task,
}

/// Records every mutation into a node map and runs timers on a manual clock.
#[derive(Default)]
pub struct RecordingHost {
    nodes: RefCell<BTreeMap<Node, NodeState>>,
    absent: RefCell<BTreeSet<Node>>,
    inserted_buttons: Cell<usize>,
    clipboard: RefCell<Vec<String>>,
    reject_clipboard: Cell<bool>,
    timers: RefCell<Vec<Timer>>,
    now: Cell<u64>,
    seq: Cell<u64>,
    highlights: Cell<usize>,
    theme_events: RefCell<Vec<ThemeChange>>,
}

impl RecordingHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a node's classes before the controller runs.
    pub fn with_classes(self, node: Node, classes: &[&str]) -> Self {
        self.nodes
            .borrow_mut()
            .entry(node)
            .or_default()
            .classes
            .extend(classes.iter().map(|c| (*c).to_string()));
        self
    }

    /// Treat `node` as missing from the page; mutations to it are dropped.
    pub fn without(self, node: Node) -> Self {
        self.absent.borrow_mut().insert(node);
        self
    }

    pub fn reject_clipboard(&self, reject: bool) {
        self.reject_clipboard.set(reject);
    }

    #[must_use]
    pub fn node(&self, node: Node) -> NodeState {
        self.nodes.borrow().get(&node).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn has_class(&self, node: Node, class: &str) -> bool {
        self.nodes
            .borrow()
            .get(&node)
            .is_some_and(|n| n.classes.contains(class))
    }

    #[must_use]
    pub fn attribute(&self, node: Node, name: &str) -> Option<String> {
        self.nodes
            .borrow()
            .get(&node)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    #[must_use]
    pub fn clipboard_writes(&self) -> Vec<String> {
        self.clipboard.borrow().clone()
    }

    #[must_use]
    pub fn inserted_buttons(&self) -> usize {
        self.inserted_buttons.get()
    }

    #[must_use]
    pub fn highlight_calls(&self) -> usize {
        self.highlights.get()
    }

    #[must_use]
    pub fn theme_events(&self) -> Vec<ThemeChange> {
        self.theme_events.borrow().clone()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    #[must_use]
    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Move the clock forward, running due timers in due order. Timers
    /// scheduled by a running task fire in the same call when due.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let idx = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(idx, _)| idx);
                idx.map(|idx| timers.remove(idx))
            };
            let Some(timer) = next else { break };
            self.now.set(timer.due);
            (timer.task)();
        }
        self.now.set(target);
    }

    fn mutate(&self, mutation: &Mutation) {
        if self.absent.borrow().contains(&mutation.node()) {
            return;
        }
        let mut nodes = self.nodes.borrow_mut();
        match mutation {
            Mutation::AddClass { node, class } => {
                nodes.entry(*node).or_default().classes.insert(class.clone());
            }
            Mutation::RemoveClass { node, class } => {
                if let Some(state) = nodes.get_mut(node) {
                    state.classes.remove(class);
                }
            }
            Mutation::SetAttribute { node, name, value } => {
                nodes
                    .entry(*node)
                    .or_default()
                    .attributes
                    .insert(name.clone(), value.clone());
            }
            Mutation::SetInnerHtml { node, html } => {
                nodes.entry(*node).or_default().html = Some(html.clone());
            }
            Mutation::SetStyle {
                node,
                property,
                value,
            } => {
                nodes
                    .entry(*node)
                    .or_default()
                    .styles
                    .insert((*property).to_string(), value.clone());
            }
            Mutation::InsertCopyButton { block } => {
                nodes.entry(Node::CopyButton(*block)).or_default();
                self.inserted_buttons.set(self.inserted_buttons.get() + 1);
            }
        }
    }
}

impl Host for RecordingHost {
    type BlockKey = String;

    fn apply(&self, mutations: &[Mutation], _blocks: &WiringRegistry<Self::BlockKey>) {
        for mutation in mutations {
            self.mutate(mutation);
        }
    }

    fn write_clipboard(&self, text: String, done: ClipboardDone) {
        self.clipboard.borrow_mut().push(text);
        let outcome = if self.reject_clipboard.get() {
            Err(ClipboardError::Rejected("NotAllowedError".into()))
        } else {
            Ok(())
        };
        done(outcome);
    }

    fn schedule(&self, delay_ms: u32, task: Task) {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            due: self.now.get() + u64::from(delay_ms),
            seq,
            task,
        });
    }

    fn highlight_all(&self) {
        self.highlights.set(self.highlights.get() + 1);
    }

    fn theme_changed(&self, change: ThemeChange) {
        self.theme_events.borrow_mut().push(change);
    }
}
