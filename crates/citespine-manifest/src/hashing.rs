//! Output hashing over canonical JSON.

use serde_json::{Map, Value};

/// Rebuild `value` with object keys in sorted order at every depth, so the
/// serialized form does not depend on insertion order.
pub fn canonical_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonical_json(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical_json).collect()),
        other => other.clone(),
    }
}

/// blake3 hex digest of the canonical serialization of `output`.
pub fn output_hash(output: &Value) -> String {
    let canonical = canonical_json(output).to_string();
    blake3::hash(canonical.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_change_hash() {
        let a = json!({"answer": "x", "citations": [{"chunk_id": "c1", "rank": 1}]});
        let mut inner = Map::new();
        inner.insert("rank".into(), json!(1));
        inner.insert("chunk_id".into(), json!("c1"));
        let mut outer = Map::new();
        outer.insert("citations".into(), Value::Array(vec![Value::Object(inner)]));
        outer.insert("answer".into(), json!("x"));
        assert_eq!(output_hash(&a), output_hash(&Value::Object(outer)));
    }

    #[test]
    fn any_change_changes_hash() {
        let a = json!({"answer": "Lessees recognise a liability."});
        let b = json!({"answer": "Lessees recognise a liability"});
        assert_ne!(output_hash(&a), output_hash(&b));
        assert_eq!(output_hash(&a).len(), 64);
    }

    #[test]
    fn array_order_is_significant() {
        assert_ne!(output_hash(&json!(["a", "b"])), output_hash(&json!(["b", "a"])));
    }
}
