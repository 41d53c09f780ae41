//! Free-form string-keyed maps stored in JSON columns (league settings, statistics,
//! custom terminology).

use sea_orm::prelude::Json;
use serde_json::{Map, Value};

/// A JSON object: string keys to arbitrary JSON values.
pub type Attributes = Map<String, Value>;

/// Interpret a stored JSON column as an object. Anything else reads as empty.
#[must_use]
pub fn from_json(value: Option<&Json>) -> Attributes {
    match value {
        Some(Value::Object(map)) => map.clone(),
        _ => Attributes::new(),
    }
}

/// Wrap a map for storage; empty maps are stored as `NULL`.
#[must_use]
pub fn to_json(map: Attributes) -> Option<Json> {
    if map.is_empty() {
        None
    } else {
        Some(Value::Object(map))
    }
}

/// Overlay `updates` onto `base` key by key. Keys absent from `updates` are kept.
#[must_use]
pub fn merge(mut base: Attributes, updates: Attributes) -> Attributes {
    for (key, value) in updates {
        base.insert(key, value);
    }
    base
}
