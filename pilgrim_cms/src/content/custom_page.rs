use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;

/// Admin-defined page rendered from the generic block template.
///
/// `id` is a hash fragment and is unique among custom pages. A page is
/// "deleted" by disappearing from the list, never by a tombstone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, deserialize_with = "lenient::vec")]
    pub content_blocks: Vec<ContentBlock>,
    #[serde(default)]
    pub seo: Seo,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn enabled_by_default() -> bool {
    true
}

impl CustomPage {
    /// Identifier with any leading `#` removed; what uniqueness is judged on.
    pub fn key(&self) -> &str {
        normalize_fragment(&self.id)
    }
}

/// A single block of a custom page. `kind` is free-form (`heading`, `text`,
/// `list`, `image`, `cta`, ...) so the renderer decides what it supports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        deserialize_with = "lenient::vec",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Seo {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "lenient::vec")]
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Strip surrounding whitespace and a leading `#` from a hash fragment.
pub fn normalize_fragment(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_prefix('#').unwrap_or(trimmed)
}
