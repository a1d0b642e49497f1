//! Deep merge over JSON fragments.
//!
//! Plugins contribute configuration as immutable fragments; the orchestrator
//! folds them left-to-right with this merge. Objects merge key-wise, arrays
//! append, and any other conflict is resolved in favor of the later value.

use serde_json::Value;

/// Merge `fragment` into `base`, returning the merged value.
pub fn deep_merge(base: Value, fragment: Value) -> Value {
    match (base, fragment) {
        (Value::Object(mut base_map), Value::Object(fragment_map)) => {
            for (key, value) in fragment_map {
                match base_map.get_mut(&key) {
                    // In-place so existing keys keep their position.
                    Some(existing) => {
                        *existing = deep_merge(existing.take(), value);
                    }
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
            Value::Object(base_map)
        }
        (Value::Array(mut base_items), Value::Array(fragment_items)) => {
            base_items.extend(fragment_items);
            Value::Array(base_items)
        }
        // `null` fragments never erase existing values.
        (base, Value::Null) => base,
        (_, fragment) => fragment,
    }
}

/// Left fold of [`deep_merge`] over a sequence of fragments.
pub fn fold_fragments<I>(initial: Value, fragments: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    fragments.into_iter().fold(initial, deep_merge)
}
