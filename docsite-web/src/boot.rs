//! Page-ready wiring: snapshot the page, build the controller, attach listeners.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, anyhow};
use docsite_page::{
    BlockSnapshot, IntersectionEntry, PageController, PageSnapshot, SidebarEvent, SidebarState,
    ThemeAsset,
};
use js_sys::{Array, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    MediaQueryListEvent,
};

use crate::host::{BlockHandle, BrowserHost, PageElements};
use crate::storage::LocalPreferenceStore;
use crate::{config, dom, highlighter};

pub type Controller = PageController<BrowserHost, LocalPreferenceStore>;

/// Run `f` once the document has been parsed.
pub fn on_ready<F>(f: F)
where
    F: FnOnce() + 'static,
{
    let Some(document) = dom::document() else {
        return;
    };
    let loading = Reflect::get(&document, &JsValue::from_str("readyState"))
        .ok()
        .and_then(|state| state.as_string())
        .is_some_and(|state| state == "loading");
    if !loading {
        f();
        return;
    }
    let closure = Closure::once(f);
    if let Err(err) = document
        .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())
    {
        log::error!(
            "Failed to wait for DOMContentLoaded: {}",
            dom::js_error_message(&err)
        );
    }
    closure.forget();
}

/// Wire every behavior whose elements exist on this page.
///
/// # Errors
/// Returns an error if the document is unavailable or the configuration is
/// invalid. Behaviors that fail to wire individually are logged and skipped.
pub fn run() -> anyhow::Result<Rc<Controller>> {
    let document = dom::document().context("document unavailable")?;
    let config = config::load(&document);
    let elements = PageElements::collect(&document, &config);
    let snapshot = snapshot(&elements, &config.dark_class);

    if let Some(path) = config.prism_languages_path.as_deref() {
        highlighter::configure_autoloader(path);
    }

    let host = Rc::new(BrowserHost::new(document.clone(), elements, &config));
    let controller = Rc::new(PageController::new(host, LocalPreferenceStore, config)?);
    let theme = controller.init(snapshot);
    log::debug!("Initial theme {theme}");

    wire_theme_toggle(&controller);
    wire_system_preference(&controller);
    wire_sidebar(&controller);
    scan_code_blocks(&controller, &document);
    wire_highlighter_hook(&controller, &document);
    if let Err(err) = wire_active_sections(&controller, &document) {
        log::warn!("Active section highlighting unavailable: {err:#}");
    }
    Ok(controller)
}

fn snapshot(elements: &PageElements, dark_class: &str) -> PageSnapshot {
    PageSnapshot {
        prefers_dark: dom::prefers_dark(),
        marker_dark: elements
            .root
            .as_ref()
            .is_some_and(|root| root.class_list().contains(dark_class)),
        theme_assets: elements
            .theme_assets
            .iter()
            .map(|el| ThemeAsset {
                light_src: el.get_attribute("data-theme-src-light"),
                dark_src: el.get_attribute("data-theme-src-dark"),
            })
            .collect(),
        link_hrefs: elements
            .links
            .iter()
            .map(|link| link.get_attribute("href").unwrap_or_default())
            .collect(),
    }
}

fn wire_theme_toggle(controller: &Rc<Controller>) {
    let Some(toggle) = controller.host().elements().theme_toggle.clone() else {
        return;
    };
    let ctrl = Rc::clone(controller);
    dom::listen(&toggle, "click", move |_| {
        ctrl.on_theme_toggle();
    });
}

fn wire_system_preference(controller: &Rc<Controller>) {
    let Some(query) = dom::prefers_dark_query() else {
        return;
    };
    let ctrl = Rc::clone(controller);
    dom::listen(&query, "change", move |event| {
        let dark = event
            .dyn_ref::<MediaQueryListEvent>()
            .is_some_and(MediaQueryListEvent::matches);
        ctrl.on_system_preference(dark);
    });
}

fn wire_sidebar(controller: &Rc<Controller>) {
    let elements = controller.host().elements();
    let (Some(toggle), Some(sidebar), Some(overlay)) = (
        elements.sidebar_toggle.clone(),
        elements.sidebar.clone(),
        elements.sidebar_overlay.clone(),
    ) else {
        return;
    };
    let hidden = controller.config().sidebar_hidden_class.clone();
    let observe = Rc::new(move || SidebarState::from_hidden(sidebar.class_list().contains(&hidden)));

    let sidebar_listener = |event: SidebarEvent| {
        let ctrl = Rc::clone(controller);
        let observe = Rc::clone(&observe);
        move |_: Event| {
            ctrl.on_sidebar(observe(), event);
        }
    };
    dom::listen(&toggle, "click", sidebar_listener(SidebarEvent::Toggle));
    dom::listen(&overlay, "click", sidebar_listener(SidebarEvent::Dismiss));
    if controller.config().close_sidebar_on_navigate {
        for link in &elements.links {
            dom::listen(link, "click", sidebar_listener(SidebarEvent::Navigate));
        }
    }
}

fn block_snapshot(
    container: Element,
    code_selector: &str,
    button_class: &str,
) -> Option<BlockSnapshot<BlockHandle>> {
    let code = dom::query_within(&container, code_selector)?;
    let button = dom::query_within(&container, &format!(".{button_class}"));
    let button_text = button
        .as_ref()
        .map(|b| b.text_content().unwrap_or_default());
    Some(BlockSnapshot {
        code_class: code.class_name(),
        button_text,
        key: BlockHandle {
            container,
            code,
            button: RefCell::new(button),
        },
    })
}

/// Tag and wire every code block; only blocks seen for the first time get
/// a click listener. Blocks detached since the last scan are released first.
pub fn scan_code_blocks(controller: &Rc<Controller>, document: &Document) {
    controller.release_blocks(|handle| handle.container.is_connected());
    let cfg = controller.config();
    let blocks: Vec<_> = dom::query_all(document, &cfg.highlight_selector)
        .into_iter()
        .filter_map(|container| {
            block_snapshot(container, &cfg.code_selector, &cfg.copy_button_class)
        })
        .collect();

    for id in controller.setup_code_blocks(blocks) {
        let Some((button, code)) = controller
            .block(id)
            .and_then(|handle| Some((handle.button.borrow().clone()?, handle.code.clone())))
        else {
            continue;
        };
        let ctrl = Rc::clone(controller);
        dom::listen(&button, "click", move |_| {
            let text = code.text_content().unwrap_or_default();
            ctrl.on_copy(id, text);
        });
    }
}

fn wire_highlighter_hook(controller: &Rc<Controller>, document: &Document) {
    let ctrl = Rc::clone(controller);
    let document = document.clone();
    if !highlighter::on_complete(move || scan_code_blocks(&ctrl, &document)) {
        log::debug!("Prism not loaded; code blocks wired once");
    }
}

fn wire_active_sections(controller: &Rc<Controller>, document: &Document) -> anyhow::Result<()> {
    let cfg = controller.config();
    let headings = dom::query_all(document, &cfg.heading_selector);
    if controller.host().elements().links.is_empty() || headings.is_empty() {
        return Ok(());
    }

    let ctrl = Rc::clone(controller);
    let callback = Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
        let batch: Vec<IntersectionEntry> = entries
            .iter()
            .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
            .map(|entry| IntersectionEntry {
                id: entry.target().id(),
                is_intersecting: entry.is_intersecting(),
            })
            .collect();
        ctrl.on_intersections(&batch);
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_root_margin(&cfg.root_margin);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|err| anyhow!("IntersectionObserver: {}", dom::js_error_message(&err)))?;
    callback.forget();
    for heading in &headings {
        observer.observe(heading);
    }
    log::debug!("Observing {} section heading(s)", headings.len());
    Ok(())
}
