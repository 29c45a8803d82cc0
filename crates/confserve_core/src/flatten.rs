//! Mapping flattening and unflattening.
//!
//! Flattening joins nested mapping keys with `.`; empty nested mappings are
//! kept as values so no information is dropped. Indexed-list flattening
//! additionally rewrites list values into `prefix[i]` keys, recursing into
//! mappings carried inside lists.

use serde_json::Value;

use crate::JsonMap;

#[cfg(test)]
#[path = "flatten_tests.rs"]
mod tests;

/// Flatten a hierarchy into dot-joined keys.
pub fn flatten(map: &JsonMap) -> JsonMap {
    let mut out = JsonMap::new();
    let mut path = Vec::new();
    flatten_into(map, &mut path, &mut out);
    out
}

fn flatten_into<'a>(map: &'a JsonMap, path: &mut Vec<&'a str>, out: &mut JsonMap) {
    for (key, value) in map {
        path.push(key);
        match value {
            Value::Object(child) if !child.is_empty() => flatten_into(child, path, out),
            _ => {
                out.insert(path.join("."), value.clone());
            }
        }
        path.pop();
    }
}

/// Rebuild a hierarchy from dot-joined keys.
///
/// Inverse of [`flatten`] for mappings without indexed-list keys.
pub fn unflatten(map: &JsonMap) -> JsonMap {
    let mut out = JsonMap::new();
    for (key, value) in map {
        let segments: Vec<&str> = key.split('.').collect();
        insert_nested(&mut out, &segments, value.clone());
    }
    out
}

fn insert_nested(map: &mut JsonMap, segments: &[&str], value: Value) {
    if segments.len() == 1 {
        map.insert(segments[0].to_string(), value);
        return;
    }

    let entry = map
        .entry(segments[0].to_string())
        .or_insert_with(|| Value::Object(JsonMap::new()));
    if !entry.is_object() {
        *entry = Value::Object(JsonMap::new());
    }
    if let Value::Object(child) = entry {
        insert_nested(child, &segments[1..], value);
    }
}

/// Rewrite every list value into `prefix[i]` keys, in place.
///
/// Mappings inside lists are processed recursively; a subsequent
/// [`flatten`] pass exposes their entries as `prefix[i].sub` keys.
pub fn flatten_indexed_lists(map: &mut JsonMap) {
    let list_keys: Vec<String> = map
        .iter()
        .filter(|(_, value)| value.is_array())
        .map(|(key, _)| key.clone())
        .collect();

    for key in list_keys {
        let Some(Value::Array(items)) = map.remove(&key) else {
            continue;
        };
        for (i, mut item) in items.into_iter().enumerate() {
            if let Value::Object(child) = &mut item {
                flatten_indexed_lists(child);
            }
            map.insert(format!("{key}[{i}]"), item);
        }
    }
}
