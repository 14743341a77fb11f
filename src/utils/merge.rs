//! Recursive merge of JSON objects.

use serde_json::{Map, Value};

/// Merge `source` into `target`.
///
/// Keys present only in `source` are added. When both sides hold an object
/// under the same key the two objects are merged recursively; in every other
/// case the value from `source` replaces the one in `target`.
pub fn merge_json(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        match value {
            Value::Object(incoming) => {
                if let Some(Value::Object(existing)) = target.get_mut(&key) {
                    merge_json(existing, incoming);
                    continue;
                }
                target.insert(key, Value::Object(incoming));
            }
            value => {
                target.insert(key, value);
            }
        }
    }
}
