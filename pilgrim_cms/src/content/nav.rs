use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;

/// One entry of the primary navigation (or the footer quick links).
///
/// Array index is display order. When `sub_links` is present the entry is a
/// dropdown parent and `href` is only a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub href: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(
        default,
        deserialize_with = "lenient::opt_vec",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_links: Option<Vec<NavLink>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn enabled_by_default() -> bool {
    true
}

impl NavLink {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            enabled: true,
            sub_links: None,
            extra: Map::new(),
        }
    }

    pub fn is_dropdown(&self) -> bool {
        self.sub_links.as_ref().is_some_and(|subs| !subs.is_empty())
    }

    pub fn has_child(&self, href: &str) -> bool {
        self.sub_links
            .as_ref()
            .is_some_and(|subs| subs.iter().any(|sub| sub.href == href))
    }
}
