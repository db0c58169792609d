//! Page structure and behavior settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when page configuration is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("language prefix {0:?} must be a bare identifier")]
    LanguagePrefix(String),
    #[error("language pattern invalid: {0}")]
    Pattern(#[from] regex::Error),
}

/// Element identifiers, class names and timings the behaviors rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub theme_toggle_id: String,
    pub sidebar_toggle_id: String,
    pub sidebar_id: String,
    pub sidebar_overlay_id: String,
    pub highlight_selector: String,
    pub code_selector: String,
    pub copy_button_class: String,
    pub sidebar_link_selector: String,
    pub heading_selector: String,
    pub theme_asset_selector: String,
    pub dark_class: String,
    pub theme_attribute: String,
    pub sidebar_hidden_class: String,
    pub overlay_hidden_class: String,
    pub language_prefix: String,
    pub copied_class: String,
    pub copy_failed_class: String,
    pub active_link_classes: Vec<String>,
    pub storage_key: String,
    pub copy_revert_ms: u32,
    pub highlight_delay_ms: u32,
    pub root_margin: String,
    pub close_sidebar_on_navigate: bool,
    pub prism_languages_path: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            theme_toggle_id: "theme-toggle".into(),
            sidebar_toggle_id: "sidebar-toggle".into(),
            sidebar_id: "sidebar".into(),
            sidebar_overlay_id: "sidebar-overlay".into(),
            highlight_selector: ".highlight".into(),
            code_selector: "pre > code".into(),
            copy_button_class: "copy-btn".into(),
            sidebar_link_selector: ".sidebar-link".into(),
            heading_selector: "h1[id], h2[id], h3[id]".into(),
            theme_asset_selector: ".theme-aware-svg".into(),
            dark_class: "dark".into(),
            theme_attribute: "data-theme".into(),
            sidebar_hidden_class: "-translate-x-full".into(),
            overlay_hidden_class: "hidden".into(),
            language_prefix: "language".into(),
            copied_class: "copied".into(),
            copy_failed_class: "copy-failed".into(),
            active_link_classes: Self::default_active_link_classes(),
            storage_key: "theme".into(),
            copy_revert_ms: 2000,
            highlight_delay_ms: 50,
            root_margin: "-100px 0px -50% 0px".into(),
            close_sidebar_on_navigate: false,
            prism_languages_path: Some(
                "https://cdnjs.cloudflare.com/ajax/libs/prism/1.29.0/components/".into(),
            ),
        }
    }
}

impl PageConfig {
    fn default_active_link_classes() -> Vec<String> {
        [
            "bg-custom-blue-100",
            "dark:bg-custom-blue-900/30",
            "text-custom-blue-700",
            "dark:text-custom-blue-300",
            "font-medium",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    /// Parse and validate a JSON config. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field fails validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the invariants the behaviors depend on.
    ///
    /// # Errors
    ///
    /// Returns the first violated field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("storage_key", &self.storage_key),
            ("dark_class", &self.dark_class),
            ("theme_attribute", &self.theme_attribute),
            ("sidebar_hidden_class", &self.sidebar_hidden_class),
            ("overlay_hidden_class", &self.overlay_hidden_class),
            ("copied_class", &self.copied_class),
            ("copy_failed_class", &self.copy_failed_class),
            ("highlight_selector", &self.highlight_selector),
            ("code_selector", &self.code_selector),
            ("copy_button_class", &self.copy_button_class),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { field });
            }
        }
        if self.active_link_classes.iter().all(|c| c.trim().is_empty()) {
            return Err(ConfigError::Empty {
                field: "active_link_classes",
            });
        }
        if self.copy_revert_ms == 0 {
            return Err(ConfigError::Zero {
                field: "copy_revert_ms",
            });
        }
        let prefix = &self.language_prefix;
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConfigError::LanguagePrefix(prefix.clone()));
        }
        Ok(())
    }
}
