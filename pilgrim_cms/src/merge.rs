//! Structural merge of a partial document into a complete one.
//!
//! Two steps:
//!
//! 1. [`deep_merge`]: recurse on mappings, let the overlay win on scalars and
//!    replace sequences wholesale, keep base-only keys, add overlay-only keys.
//! 2. [`conform`]: check the merged tree against the base's shape. A leaf
//!    whose JSON kind differs from the schema is put back to the schema value
//!    and reported, so the typed decode that follows cannot fail on it.
//!
//! [`merge_typed`] runs both against any serde type and decodes the result.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Merge `overlay` into `base` in place.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match overlay {
        Value::Object(entries) => {
            if !base.is_object() {
                *base = Value::Object(Map::new());
            }
            if let Some(target) = base.as_object_mut() {
                for (key, value) in entries {
                    if value.is_object() {
                        deep_merge(target.entry(key).or_insert(Value::Null), value);
                    } else {
                        target.insert(key, value);
                    }
                }
            }
        }
        other => *base = other,
    }
}

/// Repair `value` against `schema` and return the dotted paths that were
/// rejected.
///
/// `clearable` lists mapping paths that may be set to `null`. Sequence
/// elements are checked against a template built from the schema's elements;
/// a mismatched element key is removed so the element type's own default
/// applies.
pub fn conform(value: &mut Value, schema: &Value, clearable: &[&str]) -> Vec<String> {
    let mut conformer = Conformer {
        clearable,
        rejected: Vec::new(),
    };
    if !conformer.check(value, schema, "", Mode::Document) {
        conformer.rejected.push("$".to_string());
        *value = schema.clone();
    }
    conformer.rejected
}

/// Result of [`merge_typed`].
#[derive(Debug, Clone, PartialEq)]
pub struct Merged<T> {
    pub value: T,
    /// Paths whose overlay value did not fit the schema and was discarded.
    pub rejected: Vec<String>,
}

/// Merge an untyped overlay into a typed base.
///
/// The base's serialized form is the schema, so "overlay wins at the leaf,
/// recurse on mappings, replace sequences" holds for whatever `T` is.
pub fn merge_typed<T>(base: &T, overlay: &Value, clearable: &[&str]) -> serde_json::Result<Merged<T>>
where
    T: Serialize + DeserializeOwned,
{
    let schema = serde_json::to_value(base)?;
    let mut merged = schema.clone();
    deep_merge(&mut merged, overlay.clone());
    let rejected = conform(&mut merged, &schema, clearable);
    let value = serde_json::from_value(merged)?;
    Ok(Merged { value, rejected })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Fixed sections: a rejected value is restored from the schema.
    Document,
    /// Inside a sequence element: a rejected key is removed.
    Element,
}

struct Conformer<'a> {
    clearable: &'a [&'a str],
    rejected: Vec<String>,
}

impl Conformer<'_> {
    /// Returns false when `value` itself does not fit and the caller must
    /// restore or remove it.
    fn check(&mut self, value: &mut Value, schema: &Value, path: &str, mode: Mode) -> bool {
        match (value, schema) {
            (_, Value::Null) => true,
            (Value::Object(entries), Value::Object(fields)) => {
                self.check_entries(entries, fields, path, mode);
                true
            }
            (Value::Array(items), Value::Array(templates)) => {
                self.check_elements(items, templates, path);
                true
            }
            (Value::Null, Value::Object(_)) => {
                mode == Mode::Document && self.clearable.contains(&path)
            }
            (value, schema) => kind(value) == kind(schema),
        }
    }

    fn check_entries(
        &mut self,
        entries: &mut Map<String, Value>,
        fields: &Map<String, Value>,
        path: &str,
        mode: Mode,
    ) {
        let mut removed = Vec::new();
        for (key, child) in entries.iter_mut() {
            let Some(field_schema) = fields.get(key) else {
                continue;
            };
            let child_path = join(path, key);
            if self.check(child, field_schema, &child_path, mode) {
                continue;
            }
            self.rejected.push(child_path);
            match mode {
                Mode::Document => *child = field_schema.clone(),
                Mode::Element => removed.push(key.clone()),
            }
        }
        for key in removed {
            entries.remove(&key);
        }
    }

    fn check_elements(&mut self, items: &mut [Value], templates: &[Value], path: &str) {
        let template = element_template(templates);
        if template.is_empty() {
            return;
        }
        for (index, item) in items.iter_mut().enumerate() {
            if let Value::Object(entries) = item {
                let element_path = format!("{path}[{index}]");
                self.check_entries(entries, &template, &element_path, Mode::Element);
            }
        }
    }
}

/// Union of the keys of every mapping element, first occurrence wins.
fn element_template(templates: &[Value]) -> Map<String, Value> {
    let mut template = Map::new();
    for fields in templates.iter().filter_map(Value::as_object) {
        for (key, value) in fields {
            template
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
    template
}

fn kind(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
