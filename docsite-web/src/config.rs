//! Page configuration embedded as `<script type="application/json" id="docsite-config">`.

use docsite_page::PageConfig;
use web_sys::Document;

pub const CONFIG_ELEMENT_ID: &str = "docsite-config";

/// Read the embedded config, falling back to defaults when it is absent
/// or unusable.
#[must_use]
pub fn load(document: &Document) -> PageConfig {
    document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
        .map_or_else(PageConfig::default, |text| parse_or_default(&text))
}

#[must_use]
pub fn parse_or_default(text: &str) -> PageConfig {
    if text.trim().is_empty() {
        return PageConfig::default();
    }
    PageConfig::from_json(text).unwrap_or_else(|err| {
        log::error!("Ignoring page config: {err}");
        PageConfig::default()
    })
}
