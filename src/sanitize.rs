//! Per-entry filter that strips internal-only metadata from plugin entries.
//!
//! The extended catalog carries bookkeeping fields the public marketplace
//! schema does not accept. Only object entries are filtered; anything else in
//! the `plugins` array is passed through so the public file mirrors the
//! extended one position for position.

use serde_json::{Map, Value};

/// Plugin fields that must never reach the public catalog.
pub const DISALLOWED_KEYS: &[&str] = &[
    "featured",
    "mcpTools",
    "pluginCount",
    "pricing",
    "components",
    "zcf_metadata",
    "external_sync",
];

pub fn is_disallowed(key: &str, disallowed: &[&str]) -> bool {
    disallowed.contains(&key)
}

/// Returns a copy of `entry` without any key listed in `disallowed`.
///
/// Surviving keys keep their original relative order. Non-object values are
/// cloned unchanged.
pub fn sanitize_entry(entry: &Value, disallowed: &[&str]) -> Value {
    match entry {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .filter(|(key, _)| !is_disallowed(key, disallowed))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Map<String, Value>>(),
        ),
        other => other.clone(),
    }
}

/// Keys of `entry` that `sanitize_entry` would drop, in entry order.
pub fn disallowed_keys_in<'a>(entry: &'a Value, disallowed: &[&str]) -> Vec<&'a str> {
    entry
        .as_object()
        .map(|fields| {
            fields
                .keys()
                .map(String::as_str)
                .filter(|key| is_disallowed(key, disallowed))
                .collect()
        })
        .unwrap_or_default()
}
