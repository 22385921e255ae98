//! Resource identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one resource within a resource type.
///
/// Datadog ids are integers for some types (monitors, dashboards lists) and
/// strings for others (dashboards, reference tables). Unique within a type,
/// stable across get/put round-trips, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(u64),
    Str(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Int(n) => write!(f, "{n}"),
            ResourceId::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(n: u64) -> Self {
        ResourceId::Int(n)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        ResourceId::Str(s.to_string())
    }
}

impl ResourceId {
    /// Parse an id from its string form, preferring the integer variant.
    ///
    /// Used when recovering an id from a local file name, where the original
    /// JSON type is no longer visible.
    pub fn parse(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(n) => ResourceId::Int(n),
            Err(_) => ResourceId::Str(s.to_string()),
        }
    }

    /// Extract an id from a JSON item record, looking at its `id` field.
    pub fn from_item(item: &serde_json::Value) -> Option<Self> {
        match item.get("id")? {
            serde_json::Value::Number(n) => n.as_u64().map(ResourceId::Int),
            serde_json::Value::String(s) => Some(ResourceId::Str(s.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_prefers_integer() {
        assert_eq!(ResourceId::parse("42"), ResourceId::Int(42));
        assert_eq!(ResourceId::parse("abc-123"), ResourceId::Str("abc-123".into()));
    }

    #[test]
    fn test_from_item() {
        assert_eq!(
            ResourceId::from_item(&json!({"id": 7})),
            Some(ResourceId::Int(7))
        );
        assert_eq!(
            ResourceId::from_item(&json!({"id": "q5h-xae-8b2"})),
            Some(ResourceId::Str("q5h-xae-8b2".into()))
        );
        assert_eq!(ResourceId::from_item(&json!({"name": "x"})), None);
    }

    #[test]
    fn test_serde_untagged_round_trip() {
        let int: ResourceId = serde_json::from_str("12").unwrap();
        assert_eq!(int, ResourceId::Int(12));
        let s: ResourceId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(s, ResourceId::Str("abc".into()));
        assert_eq!(serde_json::to_string(&int).unwrap(), "12");
    }
}
