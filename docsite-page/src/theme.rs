//! Light/dark theme values and the DOM updates that present them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PageConfig;
use crate::mutation::{Mutation, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme {0:?} (expected \"light\" or \"dark\")")]
pub struct ParseThemeError(pub String);

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn from_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Accessible label for the toggle control, describing the next action.
    #[must_use]
    pub const fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Switch to dark theme",
            Self::Dark => "Switch to light theme",
        }
    }

    /// Value for the CSS `color-scheme` property.
    #[must_use]
    pub const fn color_scheme(self) -> &'static str {
        self.as_str()
    }

    /// Resolve the initial theme: a valid stored value wins, then the
    /// system preference, then light.
    #[must_use]
    pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Self {
        stored
            .and_then(|value| value.parse().ok())
            .unwrap_or_else(|| Self::from_dark(prefers_dark))
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

/// What caused a theme to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSource {
    /// Applied at page-ready.
    Initial,
    Manual,
    System,
}

/// Detail of the `themeChange` page event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeChange {
    pub theme: Theme,
    pub source: ThemeSource,
}

/// Theme-aware image as found on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeAsset {
    pub light_src: Option<String>,
    pub dark_src: Option<String>,
}

impl ThemeAsset {
    fn src_for(&self, theme: Theme) -> Option<&str> {
        let (Some(light), Some(dark)) = (self.light_src.as_deref(), self.dark_src.as_deref())
        else {
            return None;
        };
        if light == dark {
            return None;
        }
        Some(if theme.is_dark() { dark } else { light })
    }
}

/// Mutations presenting `theme`: document marker, theme attribute, toggle
/// label and theme-aware assets.
#[must_use]
pub fn render(theme: Theme, config: &PageConfig, assets: &[ThemeAsset]) -> Vec<Mutation> {
    let mut out = Vec::with_capacity(3 + assets.len() * 2);
    out.push(if theme.is_dark() {
        Mutation::add_class(Node::Root, &config.dark_class)
    } else {
        Mutation::remove_class(Node::Root, &config.dark_class)
    });
    out.push(Mutation::set_attribute(
        Node::Root,
        &config.theme_attribute,
        theme.as_str(),
    ));
    out.push(Mutation::set_attribute(
        Node::ThemeToggle,
        "aria-label",
        theme.toggle_label(),
    ));
    for (idx, asset) in assets.iter().enumerate() {
        let node = Node::ThemeAsset(idx);
        out.push(Mutation::SetStyle {
            node,
            property: "color-scheme",
            value: theme.color_scheme().to_string(),
        });
        if let Some(src) = asset.src_for(theme) {
            out.push(Mutation::set_attribute(node, "src", src));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_stored_value() {
        assert_eq!(Theme::resolve(Some("dark"), false), Theme::Dark);
        assert_eq!(Theme::resolve(Some("light"), true), Theme::Light);
    }

    #[test]
    fn resolve_falls_back_to_system_then_light() {
        assert_eq!(Theme::resolve(None, true), Theme::Dark);
        assert_eq!(Theme::resolve(None, false), Theme::Light);
        assert_eq!(Theme::resolve(Some("sepia"), true), Theme::Dark);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = "Dark".parse::<Theme>().unwrap_err();
        assert_eq!(err, ParseThemeError("Dark".into()));
        assert!(err.to_string().contains("\"Dark\""));
    }

    #[test]
    fn toggle_label_describes_next_action() {
        assert_eq!(Theme::Dark.toggle_label(), "Switch to light theme");
        assert_eq!(Theme::Light.toggle_label(), "Switch to dark theme");
    }

    #[test]
    fn render_swaps_asset_source_only_when_both_differ() {
        let cfg = PageConfig::default();
        let assets = vec![
            ThemeAsset {
                light_src: Some("logo-light.svg".into()),
                dark_src: Some("logo-dark.svg".into()),
            },
            ThemeAsset {
                light_src: Some("same.svg".into()),
                dark_src: Some("same.svg".into()),
            },
            ThemeAsset::default(),
        ];
        let muts = render(Theme::Dark, &cfg, &assets);
        let srcs: Vec<_> = muts
            .iter()
            .filter_map(|m| match m {
                Mutation::SetAttribute { node, name, value } if name == "src" => {
                    Some((*node, value.as_str()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(srcs, vec![(Node::ThemeAsset(0), "logo-dark.svg")]);
        let styles = muts
            .iter()
            .filter(|m| matches!(m, Mutation::SetStyle { .. }))
            .count();
        assert_eq!(styles, 3);
    }

    #[test]
    fn theme_change_serializes_lowercase() {
        let change = ThemeChange {
            theme: Theme::Dark,
            source: ThemeSource::Manual,
        };
        let json = serde_json::to_string(&change).unwrap();
        assert_eq!(json, r#"{"theme":"dark","source":"manual"}"#);
    }
}
