//! Dot-notation access: `get`, `set`, `has`, `forget` and friends.

use miniserde::json::{Object, Value};

use super::{Entries, child, child_mut, entries, list_index, remove_child, values};
use crate::json::{self, is_container, is_empty};

/// Look up `key`, first as an exact top-level key, then as a dot path.
///
/// ```
/// use zd_helpers::{arr, json};
///
/// let data = json::decode(r#"{"db":{"hosts":["a","b"]},"x.y":1}"#).unwrap();
/// assert_eq!(arr::get(&data, "db.hosts.1").and_then(json::as_str), Some("b"));
/// assert_eq!(arr::get(&data, "x.y").and_then(json::as_i64), Some(1));
/// assert!(arr::get(&data, "db.port").is_none());
/// ```
#[must_use]
pub fn get<'a>(target: &'a Value, key: &str) -> Option<&'a Value> {
    if let Some(found) = child(target, key)
        && !json::is_null(found)
    {
        return Some(found);
    }
    get_with(target, key, ".")
}

/// [`get`] with a fallback.
#[must_use]
pub fn get_or(target: &Value, key: &str, default: Value) -> Value {
    get(target, key).cloned().unwrap_or(default)
}

/// Walk a path split on a custom `delimiter`. No exact-key shortcut.
#[must_use]
pub fn get_with<'a>(target: &'a Value, key: &str, delimiter: &str) -> Option<&'a Value> {
    key.split(delimiter)
        .try_fold(target, |node, segment| child(node, segment))
}

/// Set `value` at a dot path, creating intermediate objects as needed.
///
/// Non-container intermediates are replaced (by a list when the next
/// segment is `0`). A list grows when the segment equals its length; any
/// other segment turns it into an object.
///
/// ```
/// use zd_helpers::{arr, json};
///
/// let mut data = json::obj();
/// arr::set(&mut data, "a.b", json::int(1));
/// arr::set(&mut data, "list.0", json::str("x"));
/// assert_eq!(json::encode(&data), r#"{"a":{"b":1},"list":["x"]}"#);
/// ```
pub fn set(target: &mut Value, key: &str, value: Value) {
    let mut node = target;
    for segment in key.split('.') {
        node = slot(node, segment);
    }
    *node = value;
}

fn slot<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = match node {
        Value::Array(list) => list_index(segment).filter(|&i| i <= list.len()),
        _ => None,
    };
    if matches!(node, Value::Array(_)) && index.is_none() {
        list_to_object(node);
    }
    if !is_container(node) {
        *node = if list_index(segment) == Some(0) {
            Value::Array(miniserde::json::Array::new())
        } else {
            Value::Object(Object::new())
        };
    }
    match node {
        Value::Array(list) => {
            let i = index.unwrap_or(list.len());
            if i == list.len() {
                list.push(Value::Null);
            }
            &mut list[i]
        },
        Value::Object(map) => map.entry(segment.to_owned()).or_insert(Value::Null),
        other => other,
    }
}

/// Re-key a list as an object with `"0"`, `"1"`, … keys.
pub(super) fn list_to_object(node: &mut Value) {
    if let Value::Array(list) = node {
        let mut map = Object::new();
        for (i, item) in list.drain(..).enumerate() {
            map.insert(i.to_string(), item);
        }
        *node = Value::Object(map);
    }
}

/// Whether a top-level `key` exists (even when its value is `null`).
#[must_use]
pub fn exists(target: &Value, key: &str) -> bool {
    child(target, key).is_some()
}

/// Whether every key resolves, exactly or as a dot path.
///
/// Empty key lists and empty targets never match.
#[must_use]
pub fn has(target: &Value, keys: &[&str]) -> bool {
    if keys.is_empty() || is_empty(target) {
        return false;
    }
    keys.iter()
        .all(|key| exists(target, key) || get_with(target, key, ".").is_some())
}

/// Remove each key: exact top-level match first, otherwise by dot path.
///
/// Paths through non-containers are ignored.
pub fn forget(target: &mut Value, keys: &[&str]) {
    for key in keys {
        if exists(target, key) {
            remove_child(target, key);
            continue;
        }
        let (parents, last) = match key.rsplit_once('.') {
            Some((parents, last)) => (Some(parents), last),
            None => (None, *key),
        };
        let parent = match parents {
            Some(path) => path
                .split('.')
                .try_fold(&mut *target, |node, segment| {
                    child_mut(node, segment).filter(|n| is_container(n))
                }),
            None => Some(&mut *target),
        };
        if let Some(parent) = parent {
            remove_child(parent, last);
        }
    }
}

/// A copy of `target` without the given keys.
#[must_use]
pub fn except(mut target: Value, keys: &[&str]) -> Value {
    forget(&mut target, keys);
    target
}

/// Only the given top-level keys.
#[must_use]
pub fn only(target: &Value, keys: &[&str]) -> Value {
    let mut out = Entries::default();
    for (key, value) in entries(target) {
        if keys.contains(&key.as_str()) {
            out.insert(key, value.clone());
        }
    }
    out.into_value()
}

/// Remove a value by dot path and return it.
pub fn pull(target: &mut Value, key: &str) -> Option<Value> {
    let value = get(target, key).cloned();
    forget(target, &[key]);
    value
}

/// Remove a top-level key and return its value.
pub fn remove(target: &mut Value, key: &str) -> Option<Value> {
    remove_child(target, key)
}

/// Dot-path lookup with `*` wildcards.
///
/// A `*` segment plucks the rest of the path from every child; when the rest
/// holds another `*` the per-child lists are collapsed into one.
///
/// ```
/// use zd_helpers::{arr, json};
///
/// let data = json::decode(r#"{"users":[{"name":"a"},{"name":"b"},{}]}"#).unwrap();
/// let names = arr::data_get(&data, "users.*.name").unwrap();
/// assert_eq!(json::encode(&names), r#"["a","b",null]"#);
/// ```
#[must_use]
pub fn data_get(target: &Value, path: &str) -> Option<Value> {
    let segments: Vec<&str> = path.split('.').collect();
    data_get_segments(target, &segments)
}

fn data_get_segments(target: &Value, segments: &[&str]) -> Option<Value> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(target.clone());
    };
    if *first == "*" {
        if !is_container(target) {
            return None;
        }
        let plucked = pluck_segments(target, rest, None);
        return Some(if rest.contains(&"*") {
            super::collapse(&plucked)
        } else {
            plucked
        });
    }
    data_get_segments(child(target, first)?, rest)
}

/// Legacy star lookup: `*` keeps the current node and continues.
#[must_use]
pub fn get_with_star<'a>(target: &'a Value, path: &str, delimiter: &str) -> Option<&'a Value> {
    let (head, rest) = match path.split_once(delimiter) {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let node = if head == "*" {
        target
    } else {
        child(target, head)?
    };
    match rest {
        Some(rest) => get_with_star(node, rest, delimiter),
        None => Some(node),
    }
}

/// Collect `value_path` from every child, optionally keyed by `key_path`.
///
/// ```
/// use zd_helpers::{arr, json};
///
/// let rows = json::decode(r#"[{"id":3,"name":"x"},{"id":5,"name":"y"}]"#).unwrap();
/// assert_eq!(json::encode(&arr::pluck(&rows, "name", None)), r#"["x","y"]"#);
/// assert_eq!(json::encode(&arr::pluck(&rows, "name", Some("id"))), r#"{"3":"x","5":"y"}"#);
/// ```
#[must_use]
pub fn pluck(target: &Value, value_path: &str, key_path: Option<&str>) -> Value {
    let value_segments: Vec<&str> = value_path.split('.').collect();
    let key_segments: Option<Vec<&str>> = key_path.map(|k| k.split('.').collect());
    pluck_segments(target, &value_segments, key_segments.as_deref())
}

fn pluck_segments(target: &Value, value_path: &[&str], key_path: Option<&[&str]>) -> Value {
    let mut out = Entries::default();
    for item in values(target) {
        let value = data_get_segments(item, value_path).unwrap_or(Value::Null);
        match key_path {
            None => out.push(value),
            Some(path) => {
                let key = data_get_segments(item, path).unwrap_or(Value::Null);
                out.insert(super::key_string(&key), value);
            },
        }
    }
    out.into_value()
}
