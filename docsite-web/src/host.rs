//! `Host` implementation over the live DOM.

use std::cell::RefCell;

use docsite_page::mutation::{ClipboardDone, Task};
use docsite_page::{ClipboardError, Host, Mutation, Node, PageConfig, ThemeChange, WiringRegistry};
use js_sys::Reflect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{CustomEvent, CustomEventInit, Document, Element, HtmlElement, SvgElement};

use crate::{dom, highlighter};

pub const THEME_CHANGE_EVENT: &str = "themeChange";

/// Elements the behaviors address, captured once at page-ready.
#[derive(Debug, Clone, Default)]
pub struct PageElements {
    pub root: Option<Element>,
    pub theme_toggle: Option<Element>,
    pub sidebar_toggle: Option<Element>,
    pub sidebar: Option<Element>,
    pub sidebar_overlay: Option<Element>,
    pub links: Vec<Element>,
    pub theme_assets: Vec<Element>,
}

impl PageElements {
    #[must_use]
    pub fn collect(document: &Document, config: &PageConfig) -> Self {
        Self {
            root: document.document_element(),
            theme_toggle: document.get_element_by_id(&config.theme_toggle_id),
            sidebar_toggle: document.get_element_by_id(&config.sidebar_toggle_id),
            sidebar: document.get_element_by_id(&config.sidebar_id),
            sidebar_overlay: document.get_element_by_id(&config.sidebar_overlay_id),
            links: dom::query_all(document, &config.sidebar_link_selector),
            theme_assets: dom::query_all(document, &config.theme_asset_selector),
        }
    }
}

/// A `.highlight` container with its code element and copy button.
/// Identity is the container element.
#[derive(Debug)]
pub struct BlockHandle {
    pub container: Element,
    pub code: Element,
    pub button: RefCell<Option<Element>>,
}

impl PartialEq for BlockHandle {
    fn eq(&self, other: &Self) -> bool {
        self.container == other.container
    }
}

pub struct BrowserHost {
    document: Document,
    elements: PageElements,
    copy_button_class: String,
}

impl BrowserHost {
    #[must_use]
    pub fn new(document: Document, elements: PageElements, config: &PageConfig) -> Self {
        Self {
            document,
            elements,
            copy_button_class: config.copy_button_class.clone(),
        }
    }

    #[must_use]
    pub const fn elements(&self) -> &PageElements {
        &self.elements
    }

    fn resolve(&self, node: Node, blocks: &WiringRegistry<BlockHandle>) -> Option<Element> {
        match node {
            Node::Root => self.elements.root.clone(),
            Node::ThemeToggle => self.elements.theme_toggle.clone(),
            Node::Sidebar => self.elements.sidebar.clone(),
            Node::SidebarOverlay => self.elements.sidebar_overlay.clone(),
            Node::Block(id) => blocks.get(id).map(|b| b.container.clone()),
            Node::Code(id) => blocks.get(id).map(|b| b.code.clone()),
            Node::CopyButton(id) => blocks.get(id).and_then(|b| b.button.borrow().clone()),
            Node::Link(idx) => self.elements.links.get(idx).cloned(),
            Node::ThemeAsset(idx) => self.elements.theme_assets.get(idx).cloned(),
        }
    }

    fn insert_button(&self, handle: &BlockHandle) -> Result<(), JsValue> {
        if handle.button.borrow().is_some() {
            return Ok(());
        }
        let button = self.document.create_element("button")?;
        button.set_attribute("type", "button")?;
        button.class_list().add_1(&self.copy_button_class)?;
        handle.container.append_child(&button)?;
        *handle.button.borrow_mut() = Some(button);
        Ok(())
    }

    fn mutate(
        &self,
        mutation: &Mutation,
        blocks: &WiringRegistry<BlockHandle>,
    ) -> Result<(), JsValue> {
        if let Mutation::InsertCopyButton { block } = mutation {
            return match blocks.get(*block) {
                Some(handle) => self.insert_button(handle),
                None => Ok(()),
            };
        }
        let Some(el) = self.resolve(mutation.node(), blocks) else {
            return Ok(());
        };
        match mutation {
            Mutation::AddClass { class, .. } => el.class_list().add_1(class),
            Mutation::RemoveClass { class, .. } => el.class_list().remove_1(class),
            Mutation::SetAttribute { name, value, .. } => el.set_attribute(name, value),
            Mutation::SetInnerHtml { html, .. } => {
                el.set_inner_html(html);
                Ok(())
            }
            Mutation::SetStyle {
                property, value, ..
            } => {
                if let Some(html) = el.dyn_ref::<HtmlElement>() {
                    html.style().set_property(property, value)
                } else if let Some(svg) = el.dyn_ref::<SvgElement>() {
                    svg.style().set_property(property, value)
                } else {
                    Ok(())
                }
            }
            Mutation::InsertCopyButton { .. } => Ok(()),
        }
    }
}

impl Host for BrowserHost {
    type BlockKey = BlockHandle;

    fn apply(&self, mutations: &[Mutation], blocks: &WiringRegistry<BlockHandle>) {
        for mutation in mutations {
            if let Err(err) = self.mutate(mutation, blocks) {
                log::warn!(
                    "DOM update {mutation:?} failed: {}",
                    dom::js_error_message(&err)
                );
            }
        }
    }

    fn write_clipboard(&self, text: String, done: ClipboardDone) {
        let Some(win) = dom::window() else {
            done(Err(ClipboardError::Unavailable));
            return;
        };
        let navigator = win.navigator();
        // Absent outside secure contexts.
        let present = Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .is_ok_and(|value| !value.is_undefined() && !value.is_null());
        if !present {
            done(Err(ClipboardError::Unavailable));
            return;
        }
        let promise = navigator.clipboard().write_text(&text);
        spawn_local(async move {
            let outcome = JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|err| ClipboardError::Rejected(dom::js_error_message(&err)));
            done(outcome);
        });
    }

    fn schedule(&self, delay_ms: u32, task: Task) {
        dom::set_timeout(delay_ms, task);
    }

    fn highlight_all(&self) {
        highlighter::highlight_all();
    }

    fn theme_changed(&self, change: ThemeChange) {
        let Some(win) = dom::window() else {
            return;
        };
        let detail = match serde_wasm_bindgen::to_value(&change) {
            Ok(detail) => detail,
            Err(err) => {
                log::warn!("Failed to encode theme change: {err}");
                return;
            }
        };
        let init = CustomEventInit::new();
        init.set_detail(&detail);
        let dispatched = CustomEvent::new_with_event_init_dict(THEME_CHANGE_EVENT, &init)
            .and_then(|event| win.dispatch_event(&event));
        if let Err(err) = dispatched {
            log::warn!(
                "Failed to dispatch {THEME_CHANGE_EVENT}: {}",
                dom::js_error_message(&err)
            );
        }
    }
}
