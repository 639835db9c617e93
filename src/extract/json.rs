//! Recursive shape descriptors for JSON files.
//!
//! The descriptor is a display-level truncation, not a parsing limit: objects
//! keep their first ten keys in insertion order, and anything deeper than
//! three levels collapses to an opaque placeholder. Both constants are part
//! of the output contract and must not drift.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Maximum depth structurally described; values deeper than this collapse.
pub const MAX_DEPTH: usize = 3;
/// Maximum object keys described per level.
pub const MAX_OBJECT_KEYS: usize = 10;

/// Shape of a JSON value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum JsonShape {
    Null,
    Boolean,
    Number,
    String,
    #[serde(rename_all = "camelCase")]
    Array {
        length: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        item_shape: Option<Box<JsonShape>>,
    },
    #[serde(rename_all = "camelCase")]
    Object {
        keys: IndexMap<String, JsonShape>,
        #[serde(skip_serializing_if = "is_zero")]
        remainder_count: usize,
    },
    /// Placeholder for values beyond `MAX_DEPTH`.
    Truncated,
}

fn is_zero(count: &usize) -> bool {
    *count == 0
}

/// Parse JSON content and describe its shape.
pub fn extract(content: &str) -> Result<JsonShape, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    Ok(describe(&value))
}

/// Describe the shape of an already-parsed value.
pub fn describe(value: &Value) -> JsonShape {
    shape(value, 0)
}

fn shape(value: &Value, depth: usize) -> JsonShape {
    if depth > MAX_DEPTH {
        return JsonShape::Truncated;
    }
    match value {
        Value::Null => JsonShape::Null,
        Value::Bool(_) => JsonShape::Boolean,
        Value::Number(_) => JsonShape::Number,
        Value::String(_) => JsonShape::String,
        Value::Array(items) => JsonShape::Array {
            length: items.len(),
            item_shape: items.first().map(|item| Box::new(shape(item, depth + 1))),
        },
        Value::Object(map) => {
            let mut keys = IndexMap::new();
            for (key, nested) in map.iter().take(MAX_OBJECT_KEYS) {
                keys.insert(key.clone(), shape(nested, depth + 1));
            }
            JsonShape::Object {
                keys,
                remainder_count: map.len().saturating_sub(MAX_OBJECT_KEYS),
            }
        }
    }
}
