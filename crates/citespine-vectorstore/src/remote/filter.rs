//! Metadata filter grammar shared by the remote adapter and the loopback
//! service.
//!
//! ```text
//! filter  := { "$and": [filter..] } | { "$or": [filter..] } | { field: cond }
//! cond    := { "$eq" | "$ne" | "$lt" | "$lte" | "$gt" | "$gte": scalar }
//!          | { "$in" | "$nin": [scalar..] }
//!          | scalar                      (shorthand for $eq)
//! ```

use serde_json::{json, Map, Value};

use citespine_core::models::ResolvedPredicate;

use super::protocol::{effective_ord, EFFECTIVE_ORD_KEY};

/// Compile a resolved predicate into a remote metadata filter.
pub fn compile(predicate: &ResolvedPredicate) -> Value {
    let mut terms: Vec<Value> = predicate
        .filters
        .constraints()
        .map(|(dimension, value)| json!({ dimension.key(): { "$eq": value } }))
        .collect();
    let versions: Vec<&str> = predicate.version_ids.iter().map(String::as_str).collect();
    terms.push(json!({ "version_id": { "$in": versions } }));
    terms.push(json!({ EFFECTIVE_ORD_KEY: { "$lte": effective_ord(predicate.filters.as_of) } }));
    json!({ "$and": terms })
}

/// Evaluate `filter` against a record's metadata. Unknown operators and
/// malformed filters match nothing.
pub fn evaluate(filter: &Value, metadata: &Map<String, Value>) -> bool {
    let Some(obj) = filter.as_object() else {
        return false;
    };
    obj.iter().all(|(key, cond)| match key.as_str() {
        "$and" => cond
            .as_array()
            .is_some_and(|items| items.iter().all(|f| evaluate(f, metadata))),
        "$or" => cond
            .as_array()
            .is_some_and(|items| items.iter().any(|f| evaluate(f, metadata))),
        field => field_matches(metadata.get(field), cond),
    })
}

fn field_matches(actual: Option<&Value>, cond: &Value) -> bool {
    let Some(ops) = cond.as_object() else {
        return actual == Some(cond);
    };
    ops.iter().all(|(op, operand)| match op.as_str() {
        "$eq" => actual == Some(operand),
        "$ne" => actual != Some(operand),
        "$in" => operand
            .as_array()
            .is_some_and(|set| actual.is_some_and(|a| set.contains(a))),
        "$nin" => operand
            .as_array()
            .is_some_and(|set| actual.map_or(true, |a| !set.contains(a))),
        "$lt" => compare(actual, operand).is_some_and(|o| o.is_lt()),
        "$lte" => compare(actual, operand).is_some_and(|o| o.is_le()),
        "$gt" => compare(actual, operand).is_some_and(|o| o.is_gt()),
        "$gte" => compare(actual, operand).is_some_and(|o| o.is_ge()),
        _ => false,
    })
}

fn compare(actual: Option<&Value>, operand: &Value) -> Option<std::cmp::Ordering> {
    match (actual?, operand) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Map<String, Value> {
        match json!({ "framework": "IFRS", "version_id": "v2", "effective_ord": 20190101 }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn operators() {
        let r = record();
        assert!(evaluate(&json!({ "framework": { "$eq": "IFRS" } }), &r));
        assert!(evaluate(&json!({ "framework": "IFRS" }), &r));
        assert!(!evaluate(&json!({ "framework": { "$ne": "IFRS" } }), &r));
        assert!(evaluate(&json!({ "version_id": { "$in": ["v1", "v2"] } }), &r));
        assert!(!evaluate(&json!({ "version_id": { "$nin": ["v2"] } }), &r));
        assert!(evaluate(&json!({ "effective_ord": { "$lte": 20190101 } }), &r));
        assert!(!evaluate(&json!({ "effective_ord": { "$lt": 20190101 } }), &r));
        assert!(evaluate(&json!({ "effective_ord": { "$gte": 20180101, "$lte": 20200101 } }), &r));
    }

    #[test]
    fn boolean_combinators() {
        let r = record();
        assert!(evaluate(
            &json!({ "$or": [{ "framework": "US_GAAP" }, { "version_id": "v2" }] }),
            &r
        ));
        assert!(!evaluate(
            &json!({ "$and": [{ "framework": "IFRS" }, { "version_id": "v1" }] }),
            &r
        ));
    }

    #[test]
    fn missing_field_and_unknown_operator_do_not_match() {
        let r = record();
        assert!(!evaluate(&json!({ "doc_type": { "$eq": "memo" } }), &r));
        assert!(!evaluate(&json!({ "framework": { "$regex": ".*" } }), &r));
        assert!(!evaluate(&json!("framework"), &r));
    }
}
