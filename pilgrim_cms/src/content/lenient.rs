//! Tolerant decoding for collections.
//!
//! Sequences are replaced wholesale by the merge, so their elements are never
//! checked against the schema field by field. An element that cannot be
//! decoded is dropped and logged instead of failing the document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

pub(crate) fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(decode_elements(raw))
}

pub(crate) fn opt_vec<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw.map(decode_elements))
}

fn decode_elements<T: DeserializeOwned>(raw: Vec<Value>) -> Vec<T> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(index, error = %e, "dropping undecodable collection element");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "super::vec")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "super::opt_vec")]
        extra: Option<Vec<u32>>,
    }

    #[test]
    fn bad_elements_are_dropped() {
        let holder: Holder =
            serde_json::from_str(r#"{"items": ["a", 1, "b", null], "extra": [1, "x", 3]}"#)
                .unwrap();
        assert_eq!(holder.items, vec!["a", "b"]);
        assert_eq!(holder.extra, Some(vec![1, 3]));
    }

    #[test]
    fn missing_optional_sequence_is_none() {
        let holder: Holder = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(holder.items.is_empty());
        assert!(holder.extra.is_none());
    }

    #[test]
    fn non_sequence_is_still_an_error() {
        assert!(serde_json::from_str::<Holder>(r#"{"items": "nope"}"#).is_err());
    }
}
