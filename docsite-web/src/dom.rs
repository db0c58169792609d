use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, Window};

const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// Retrieve the global `window` object, if running in a browser.
#[must_use]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Retrieve the document object for DOM interactions.
#[must_use]
pub fn document() -> Option<Document> {
    window().and_then(|win| win.document())
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Every element matching `selector`, in document order. Invalid selectors
/// match nothing.
#[must_use]
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        log::warn!("Invalid selector {selector:?}");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|idx| list.get(idx))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// First descendant of `element` matching `selector`.
#[must_use]
pub fn query_within(element: &Element, selector: &str) -> Option<Element> {
    element.query_selector(selector).ok().flatten()
}

/// Whether the platform reports a dark color-scheme preference.
#[must_use]
pub fn prefers_dark() -> bool {
    prefers_dark_query().is_some_and(|mq| mq.matches())
}

/// Attach `handler` for the lifetime of the page.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if let Err(err) =
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        log::warn!(
            "Failed to listen for {event}: {}",
            js_error_message(&err)
        );
    }
    closure.forget();
}

/// Run `task` once after `delay_ms` milliseconds.
pub fn set_timeout<F>(delay_ms: u32, task: F)
where
    F: FnOnce() + 'static,
{
    let Some(win) = window() else {
        log::warn!("Failed to schedule timer: window unavailable");
        return;
    };
    let closure = Closure::once(task);
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    if let Err(err) = win.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        delay,
    ) {
        log::warn!("Failed to schedule timer: {}", js_error_message(&err));
    }
    closure.forget();
}

/// Media query list for the dark color-scheme preference.
#[must_use]
pub fn prefers_dark_query() -> Option<web_sys::MediaQueryList> {
    window().and_then(|win| win.match_media(PREFERS_DARK_QUERY).ok().flatten())
}
