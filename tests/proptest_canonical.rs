//! Property-based tests using proptest
//!
//! These tests verify canonicalization stability and id handling using
//! randomized inputs.

use dogsync::resource::ResourceId;
use dogsync::storage::canonical_json;
use proptest::prelude::*;
use serde_json::{json, Value};

/// Generate arbitrary JSON values with nested objects and arrays
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 _-]{0,20}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::hash_map("[a-z_]{1,12}", inner, 0..8)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Canonicalizing twice is the same as canonicalizing once.
    #[test]
    fn canonicalization_is_idempotent(value in arb_json()) {
        let raw = serde_json::to_vec(&value).unwrap();
        let first = canonical_json(&raw).unwrap();
        let second = canonical_json(&first).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Canonical output parses back to the same logical value.
    #[test]
    fn canonicalization_preserves_value(value in arb_json()) {
        let raw = serde_json::to_vec(&value).unwrap();
        let canonical = canonical_json(&raw).unwrap();
        let parsed: Value = serde_json::from_slice(&canonical).unwrap();
        prop_assert_eq!(parsed, value);
    }

    /// String-form round trip: parsing the display form of an id yields
    /// the same id, for both variants.
    #[test]
    fn id_display_parse_round_trip_int(n in any::<u64>()) {
        let id = ResourceId::Int(n);
        prop_assert_eq!(ResourceId::parse(&id.to_string()), id);
    }

    /// Non-numeric string ids survive the round trip unchanged.
    #[test]
    fn id_display_parse_round_trip_str(s in "[a-z][a-z0-9-]{0,30}[a-z]") {
        prop_assume!(s.parse::<u64>().is_err());
        let id = ResourceId::Str(s.clone());
        prop_assert_eq!(ResourceId::parse(&id.to_string()), id);
    }
}
