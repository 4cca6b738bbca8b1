use crate::error::CoreResult;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

// Canonical form used for fingerprints:
// - UTF-8 JSON, no insignificant whitespace
// - object keys sorted lexicographically at every depth
// - array order preserved
// - numbers as serde_json prints them (shortest round-trip for floats)
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> CoreResult<Vec<u8>> {
    let v = serde_json::to_value(value)?;
    let s = serde_json::to_string(&normalize_value(v))?;
    Ok(s.into_bytes())
}

fn normalize_value(v: Value) -> Value {
    match v {
        Value::Object(map) => {
            let btm: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(k, vv)| (k, normalize_value(vv)))
                .collect();
            // rebuilt in sorted order regardless of Map's backing type
            Value::Object(btm.into_iter().collect())
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(normalize_value).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_at_every_depth() {
        let bytes = to_canonical_bytes(&json!({"b": 1, "a": {"d": [2, {"z": 0, "y": 0.5}], "c": null}}))
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"a":{"c":null,"d":[2,{"y":0.5,"z":0}]},"b":1}"#
        );
    }
}
