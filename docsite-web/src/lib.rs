#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod boot;
pub mod config;
pub mod dom;
pub mod highlighter;
pub mod host;
pub mod storage;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // A second init (tests, hot reload) keeps the first logger.
    let _ = console_log::init_with_level(level);
    boot::on_ready(|| match boot::run() {
        Ok(controller) => log::debug!("Page behaviors ready (theme {})", controller.theme()),
        Err(err) => log::error!("Page behaviors unavailable: {err:#}"),
    });
}
