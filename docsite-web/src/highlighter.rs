//! Prism integration. Every entry point is a no-op when Prism is not loaded.

use js_sys::{Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::dom;

fn prism() -> Option<JsValue> {
    let win = dom::window()?;
    let prism = Reflect::get(&win, &JsValue::from_str("Prism")).ok()?;
    (!prism.is_undefined() && !prism.is_null()).then_some(prism)
}

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
    property(target, name)?.dyn_into::<Function>().ok()
}

#[must_use]
pub fn is_available() -> bool {
    prism().is_some()
}

/// Highlight every code block on the page.
pub fn highlight_all() {
    let Some(prism) = prism() else {
        return;
    };
    let Some(highlight) = method(&prism, "highlightAll") else {
        return;
    };
    if let Err(err) = highlight.call0(&prism) {
        log::warn!("Prism.highlightAll failed: {}", dom::js_error_message(&err));
    }
}

/// Run `hook` each time Prism finishes highlighting an element.
/// Returns `false` when Prism or its hook registry is missing.
pub fn on_complete<F>(hook: F) -> bool
where
    F: FnMut() + 'static,
{
    let Some(prism) = prism() else {
        return false;
    };
    let Some(hooks) = property(&prism, "hooks") else {
        return false;
    };
    let Some(add) = method(&hooks, "add") else {
        return false;
    };
    let closure = Closure::wrap(Box::new(hook) as Box<dyn FnMut()>);
    let registered = match add.call2(&hooks, &JsValue::from_str("complete"), closure.as_ref()) {
        Ok(_) => true,
        Err(err) => {
            log::warn!(
                "Prism hook registration failed: {}",
                dom::js_error_message(&err)
            );
            false
        }
    };
    closure.forget();
    registered
}

/// Point the autoloader plugin at `path`, when the plugin is loaded.
pub fn configure_autoloader(path: &str) {
    let Some(autoloader) = prism()
        .and_then(|prism| property(&prism, "plugins"))
        .and_then(|plugins| property(&plugins, "autoloader"))
    else {
        return;
    };
    if let Err(err) = Reflect::set(
        &autoloader,
        &JsValue::from_str("languages_path"),
        &JsValue::from_str(path),
    ) {
        log::warn!(
            "Prism autoloader configuration failed: {}",
            dom::js_error_message(&err)
        );
    }
}
