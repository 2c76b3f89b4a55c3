//! Point identifier resolution.
//!
//! Qdrant accepts point ids that are either unsigned integers or strings.
//! Input records may carry anything in their `id` field, so the raw value is
//! modeled as an explicit variant and resolved by a pure policy function:
//! caller-supplied ids are kept whenever they are valid (so re-upserts stay
//! idempotent), everything else gets a fresh random v4 UUID.

use qdrant_client::qdrant::PointId;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Raw `id` field of an input record, before resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RawId {
    /// Non-negative integer id, usable as-is.
    Uint(u64),
    /// String id, kept untrimmed; trimming happens at resolution.
    Text(String),
    /// Field missing or explicit `null`.
    #[default]
    Absent,
    /// Any other JSON shape, including negative integers.
    Unsupported,
}

impl RawId {
    /// Classifies a raw JSON value.
    pub fn from_value(v: &Value) -> Self {
        match v {
            Value::Null => RawId::Absent,
            Value::String(s) => RawId::Text(s.clone()),
            Value::Number(n) => match n.as_u64() {
                Some(u) => RawId::Uint(u),
                // Negative integers and floats are both invalid for Qdrant.
                None => RawId::Unsupported,
            },
            _ => RawId::Unsupported,
        }
    }
}

impl<'de> Deserialize<'de> for RawId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(deserializer)?;
        Ok(RawId::from_value(&v))
    }
}

/// A resolved point identifier: an unsigned integer or a non-empty string.
#[derive(Clone, Debug, PartialEq)]
pub enum PointKey {
    Num(u64),
    Text(String),
}

impl fmt::Display for PointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointKey::Num(n) => write!(f, "{n}"),
            PointKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<PointKey> for PointId {
    fn from(key: PointKey) -> Self {
        match key {
            PointKey::Num(n) => n.into(),
            PointKey::Text(s) => s.into(),
        }
    }
}

/// Outcome of identifier resolution for one record.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub key: PointKey,
    /// True when the id was synthesized rather than taken from the record.
    pub synthesized: bool,
}

/// Resolves a raw id into a point key. First match wins:
/// a non-negative integer is used as-is, a string with a non-empty trim is
/// used trimmed, everything else falls through to a fresh random v4 UUID.
pub fn resolve(raw: &RawId) -> Resolution {
    match raw {
        RawId::Uint(n) => {
            debug!("numeric id supplied, kept as integer: {n}");
            Resolution {
                key: PointKey::Num(*n),
                synthesized: false,
            }
        }
        RawId::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                debug!("string id is empty or whitespace-only");
                synthesize()
            } else {
                debug!("string id supplied: {trimmed}");
                Resolution {
                    key: PointKey::Text(trimmed.to_string()),
                    synthesized: false,
                }
            }
        }
        RawId::Absent => {
            debug!("no id supplied");
            synthesize()
        }
        RawId::Unsupported => {
            debug!("id is negative or of an unsupported type");
            synthesize()
        }
    }
}

fn synthesize() -> Resolution {
    let id = Uuid::new_v4().to_string();
    debug!("synthesized new id: {id}");
    Resolution {
        key: PointKey::Text(id),
        synthesized: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uuid_of(res: &Resolution) -> Uuid {
        match &res.key {
            PointKey::Text(s) => Uuid::parse_str(s).expect("synthesized id must parse as UUID"),
            PointKey::Num(n) => panic!("expected synthesized string id, got {n}"),
        }
    }

    #[test]
    fn non_negative_integer_kept_as_is() {
        for n in [0u64, 5, u64::MAX] {
            let res = resolve(&RawId::Uint(n));
            assert_eq!(res.key, PointKey::Num(n));
            assert!(!res.synthesized);
        }
    }

    #[test]
    fn negative_integer_classified_unsupported_and_replaced() {
        let raw = RawId::from_value(&json!(-3));
        assert_eq!(raw, RawId::Unsupported);
        let res = resolve(&raw);
        assert!(res.synthesized);
        uuid_of(&res);
    }

    #[test]
    fn string_id_trimmed() {
        let res = resolve(&RawId::Text("  doc-42 ".into()));
        assert_eq!(res.key, PointKey::Text("doc-42".into()));
        assert!(!res.synthesized);
    }

    #[test]
    fn blank_string_id_replaced() {
        for s in ["", "   ", "\t\n"] {
            let res = resolve(&RawId::Text(s.into()));
            assert!(res.synthesized);
            uuid_of(&res);
        }
    }

    #[test]
    fn absent_and_unsupported_replaced() {
        for raw in [
            RawId::Absent,
            RawId::from_value(&json!(null)),
            RawId::from_value(&json!(1.5)),
            RawId::from_value(&json!(true)),
            RawId::from_value(&json!([1, 2])),
            RawId::from_value(&json!({"k": "v"})),
        ] {
            let res = resolve(&raw);
            assert!(res.synthesized, "expected synthesis for {raw:?}");
        }
    }

    #[test]
    fn synthesized_ids_are_v4_and_distinct() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            let res = resolve(&RawId::Absent);
            let u = uuid_of(&res);
            assert_eq!(u.get_version_num(), 4);
            assert!(seen.insert(u));
        }
    }

    #[test]
    fn raw_id_classification_from_json() {
        assert_eq!(RawId::from_value(&json!(7)), RawId::Uint(7));
        assert_eq!(RawId::from_value(&json!("x")), RawId::Text("x".into()));
        assert_eq!(RawId::from_value(&json!(null)), RawId::Absent);
        assert_eq!(RawId::from_value(&json!(-1)), RawId::Unsupported);
        assert_eq!(RawId::from_value(&json!(0.5)), RawId::Unsupported);
    }
}
