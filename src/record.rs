//! Core data models used by the library.

use crate::ids::RawId;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One element of the input JSON array.
///
/// `text` drives the embedding; records without a usable `text` are skipped
/// during ingestion. `metadata` becomes the point payload verbatim.
#[derive(Clone, Debug, Deserialize)]
pub struct InputRecord {
    #[serde(default)]
    pub id: RawId,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl InputRecord {
    /// Returns the text to embed, or `None` when the field is missing or
    /// empty. Whitespace-only text counts as present.
    pub fn text_for_embedding(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::RawId;

    #[test]
    fn deserializes_full_record() {
        let r: InputRecord =
            serde_json::from_str(r#"{"id": 5, "text": "a", "metadata": {"k": 1}}"#).unwrap();
        assert_eq!(r.id, RawId::Uint(5));
        assert_eq!(r.text_for_embedding(), Some("a"));
        assert_eq!(r.metadata.len(), 1);
    }

    #[test]
    fn defaults_apply_for_missing_fields() {
        let r: InputRecord = serde_json::from_str(r#"{"text": "b"}"#).unwrap();
        assert_eq!(r.id, RawId::Absent);
        assert!(r.metadata.is_empty());
    }

    #[test]
    fn empty_text_is_not_embeddable() {
        let r: InputRecord = serde_json::from_str(r#"{"text": ""}"#).unwrap();
        assert_eq!(r.text_for_embedding(), None);
        let r: InputRecord = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(r.text_for_embedding(), None);
    }
}
