//! The Default Content Table.
//!
//! A code-embedded baseline that doubles as the schema of record: the merge
//! starts from it and every patch rule treats it as the source of repairs.

use std::sync::OnceLock;

use serde_json::Value;

use super::Document;

const DEFAULT_CONTENT: &str = include_str!("default_content.json");

/// The default table as an untyped tree, exactly as embedded.
pub fn default_value() -> &'static Value {
    static VALUE: OnceLock<Value> = OnceLock::new();
    VALUE.get_or_init(|| {
        serde_json::from_str(DEFAULT_CONTENT).expect("embedded default content is valid JSON")
    })
}

/// The default table decoded into the typed schema.
pub fn default_document() -> &'static Document {
    static DOCUMENT: OnceLock<Document> = OnceLock::new();
    DOCUMENT.get_or_init(|| {
        serde_json::from_value(default_value().clone())
            .expect("embedded default content matches the document schema")
    })
}
