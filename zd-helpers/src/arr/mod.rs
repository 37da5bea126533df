//! Array helpers over JSON-like trees.
//!
//! Lists are [`Value::Array`], maps are [`Value::Object`]. A path segment
//! addresses a list element when it is a canonical decimal index (`"0"`,
//! `"12"`, never `"01"`), and an object member otherwise.
//!
//! Results that mix positional and named entries follow the usual
//! "ordered hash" rules: named keys overwrite in place, positional entries
//! are renumbered on merge, and a result whose keys are exactly `0..n` in
//! order comes back as a list.
//!
//! # Examples
//!
//! ```
//! use zd_helpers::{arr, json};
//!
//! let mut config = json::decode(r#"{"app":{"name":"demo"}}"#).unwrap();
//! arr::set(&mut config, "app.debug", json::bool(true));
//! assert!(arr::has(&config, &["app.name", "app.debug"]));
//!
//! let merged = arr::merge(&[
//!     json::decode(r#"{"a":1,"0":"x"}"#).unwrap(),
//!     json::decode(r#"{"a":2,"0":"y"}"#).unwrap(),
//! ]);
//! assert_eq!(json::encode(&merged), r#"{"0":"x","1":"y","a":2}"#);
//! ```

mod dot;

use std::collections::HashMap;

use miniserde::json::{Array, Object, Value};

use crate::json::{self, is_container, loose_eq, to_plain_string};

pub use dot::{
    data_get, except, exists, forget, get, get_or, get_with, get_with_star, has, only, pluck,
    pull, remove, set,
};

// ============================================================================
// ORDERED ENTRIES
// ============================================================================

/// Insertion-ordered key/value builder with positional auto-keys.
#[derive(Debug, Default)]
pub(crate) struct Entries {
    items: Vec<(String, Value)>,
    positions: HashMap<String, usize>,
    next_index: usize,
}

impl Entries {
    /// Append under the next free positional key.
    pub(crate) fn push(&mut self, value: Value) {
        let key = self.next_index.to_string();
        self.insert(key, value);
    }

    /// Insert or overwrite `key` in place.
    pub(crate) fn insert(&mut self, key: String, value: Value) {
        if let Some(i) = list_index(&key) {
            self.next_index = self.next_index.max(i + 1);
        }
        if let Some(&at) = self.positions.get(&key) {
            self.items[at].1 = value;
        } else {
            self.positions.insert(key.clone(), self.items.len());
            self.items.push((key, value));
        }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// A list when keys are exactly `0..n` in order, an object otherwise.
    pub(crate) fn into_value(self) -> Value {
        let sequential = self
            .items
            .iter()
            .enumerate()
            .all(|(i, (k, _))| list_index(k) == Some(i));
        if sequential {
            let mut list = Array::new();
            list.extend(self.items.into_iter().map(|(_, v)| v));
            Value::Array(list)
        } else {
            let mut map = Object::new();
            map.extend(self.items);
            Value::Object(map)
        }
    }

    pub(crate) fn into_pairs(self) -> Vec<(String, Value)> {
        self.items
    }
}

// ============================================================================
// NODE ACCESS
// ============================================================================

/// Parse a canonical list index.
pub(crate) fn list_index(segment: &str) -> Option<usize> {
    segment
        .parse::<usize>()
        .ok()
        .filter(|i| i.to_string() == segment)
}

pub(crate) fn child<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(list) => list_index(segment).and_then(|i| list.get(i)),
        _ => None,
    }
}

pub(crate) fn child_mut<'a>(node: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(list) => list_index(segment).and_then(|i| list.get_mut(i)),
        _ => None,
    }
}

/// Remove a direct child. Removing from the middle of a list re-keys it as
/// an object so the remaining indexes stay stable.
pub(crate) fn remove_child(node: &mut Value, segment: &str) -> Option<Value> {
    if let Value::Array(list) = node {
        let i = list_index(segment).filter(|&i| i < list.len())?;
        if i + 1 == list.len() {
            return list.pop();
        }
        dot::list_to_object(node);
    }
    match node {
        Value::Object(map) => map.remove(segment),
        _ => None,
    }
}

/// `(key, value)` pairs of a container; empty for scalars.
pub(crate) fn entries(node: &Value) -> Vec<(String, &Value)> {
    match node {
        Value::Array(list) => list.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        _ => Vec::new(),
    }
}

/// Child values of a container; empty for scalars.
pub(crate) fn values(node: &Value) -> Vec<&Value> {
    match node {
        Value::Array(list) => list.iter().collect(),
        Value::Object(map) => map.values().collect(),
        _ => Vec::new(),
    }
}

/// Key form of a value: booleans become `"1"`/`"0"`, floats are truncated.
pub(crate) fn key_string(v: &Value) -> String {
    match v {
        Value::Bool(b) => String::from(if *b { "1" } else { "0" }),
        Value::Number(json::Number::F64(f)) => format!("{}", f.trunc()),
        other => to_plain_string(other),
    }
}

// ============================================================================
// MERGING
// ============================================================================

fn append_all(out: &mut Entries, node: &Value) {
    for (key, item) in entries(node) {
        if list_index(&key).is_some() {
            out.push(item.clone());
        } else {
            out.insert(key, item.clone());
        }
    }
}

fn merge_entries<'a>(nodes: impl IntoIterator<Item = &'a Value>) -> Entries {
    let mut out = Entries::default();
    for node in nodes.into_iter().filter(|n| is_container(n)) {
        append_all(&mut out, node);
    }
    out
}

/// Merge containers left to right.
///
/// Positional entries are appended and renumbered, named entries overwrite.
/// Scalars are skipped.
#[must_use]
pub fn merge(nodes: &[Value]) -> Value {
    merge_entries(nodes).into_value()
}

/// Like [`merge`], but named entries that are containers in every input are
/// merged instead of overwritten.
///
/// ```
/// use zd_helpers::{arr, json};
///
/// let a = json::decode(r#"{"db":{"host":"a","port":1},"v":1}"#).unwrap();
/// let b = json::decode(r#"{"db":{"host":"b"},"v":2}"#).unwrap();
/// let merged = arr::merge_2d(&[a, b]);
/// assert_eq!(json::encode(&merged), r#"{"db":{"host":"b","port":1},"v":2}"#);
/// ```
#[must_use]
pub fn merge_2d(nodes: &[Value]) -> Value {
    let mut merged = merge_entries(nodes);
    for (key, value) in &mut merged.items {
        if list_index(key).is_some() {
            continue;
        }
        let parts: Vec<&Value> = nodes.iter().filter_map(|n| child(n, key)).collect();
        if !parts.is_empty() && parts.iter().all(|p| is_container(p)) {
            *value = merge_entries(parts).into_value();
        }
    }
    merged.into_value()
}

/// Merge every container child of `node` into one.
#[must_use]
pub fn collapse(node: &Value) -> Value {
    merge_entries(values(node)).into_value()
}

/// Flatten nested containers into a single list of values.
///
/// `depth` limits how many levels are unwrapped; pass `usize::MAX` for all.
#[must_use]
pub fn flatten(node: &Value, depth: usize) -> Vec<Value> {
    let mut out = Vec::new();
    for item in values(node) {
        if !is_container(item) {
            out.push(item.clone());
        } else if depth <= 1 {
            out.extend(values(item).into_iter().cloned());
        } else {
            out.extend(flatten(item, depth - 1));
        }
    }
    out
}

// ============================================================================
// SHAPE
// ============================================================================

/// Whether `node` is an object whose keys are not exactly `0..n`.
#[must_use]
pub fn is_assoc(node: &Value) -> bool {
    match node {
        Value::Object(map) => !map
            .keys()
            .all(|k| list_index(k).is_some_and(|i| i < map.len())),
        _ => false,
    }
}

/// Whether any direct child is itself a container.
#[must_use]
pub fn is_multidimensional(node: &Value) -> bool {
    values(node).into_iter().any(is_container)
}

/// Pair `keys` with values.
///
/// A list of values is zipped by position (missing → `null`). An object is
/// looked up by key; absent or `null` entries are filled with `null` only when
/// `complete` is set.
#[must_use]
pub fn combine(keys: &[&str], source: &Value, complete: bool) -> Value {
    let mut out = Entries::default();
    if is_assoc(source) {
        for key in keys {
            match child(source, key).filter(|v| !json::is_null(v)) {
                Some(v) => out.insert((*key).to_owned(), v.clone()),
                None if complete => out.insert((*key).to_owned(), Value::Null),
                None => {},
            }
        }
    } else {
        let items = values(source);
        for (i, key) in keys.iter().enumerate() {
            let v = items.get(i).map_or(Value::Null, |v| (*v).clone());
            out.insert((*key).to_owned(), v);
        }
    }
    out.into_value()
}

// ============================================================================
// SEARCH
// ============================================================================

/// First child (in key order) accepted by `pred(key, value)`.
pub fn first<'a, F>(node: &'a Value, mut pred: F) -> Option<&'a Value>
where
    F: FnMut(&str, &Value) -> bool,
{
    entries(node)
        .into_iter()
        .find(|(k, v)| pred(k, v))
        .map(|(_, v)| v)
}

/// Last child accepted by `pred(key, value)`.
pub fn last<'a, F>(node: &'a Value, mut pred: F) -> Option<&'a Value>
where
    F: FnMut(&str, &Value) -> bool,
{
    entries(node)
        .into_iter()
        .rev()
        .find(|(k, v)| pred(k, v))
        .map(|(_, v)| v)
}

/// Key of the first child loosely equal to `needle`.
#[must_use]
pub fn key_of(node: &Value, needle: &Value) -> Option<String> {
    entries(node)
        .into_iter()
        .find(|(_, v)| loose_eq(v, needle))
        .map(|(k, _)| k)
}

/// Key of the first child that equals `needle` or, for container children,
/// contains it directly.
#[must_use]
pub fn find_in_2d(needle: &Value, node: &Value) -> Option<String> {
    entries(node)
        .into_iter()
        .find(|(_, v)| {
            if is_container(v) {
                values(v).into_iter().any(|item| loose_eq(item, needle))
            } else {
                loose_eq(v, needle)
            }
        })
        .map(|(k, _)| k)
}

/// The `index`-th `(key, value)` pair.
#[must_use]
pub fn split(node: &Value, index: usize) -> Option<(String, Value)> {
    entries(node)
        .into_iter()
        .nth(index)
        .map(|(k, v)| (k, v.clone()))
}

/// Column of a table, optionally keyed by another column.
///
/// Rows missing `column` are skipped; rows missing `index_key` are appended
/// positionally.
///
/// ```
/// use zd_helpers::{arr, json};
///
/// let rows = json::decode(r#"[{"a":12,"b":99},{"a":13}]"#).unwrap();
/// assert_eq!(json::encode(&arr::column(&rows, "a", None)), "[12,13]");
/// assert_eq!(json::encode(&arr::column(&rows, "a", Some("b"))), r#"{"100":13,"99":12}"#);
/// ```
#[must_use]
pub fn column(rows: &Value, column: &str, index_key: Option<&str>) -> Value {
    let mut out = Entries::default();
    for row in values(rows) {
        let Some(value) = child(row, column) else {
            continue;
        };
        match index_key.and_then(|k| child(row, k)) {
            Some(key) => out.insert(key_string(key), value.clone()),
            None => out.push(value.clone()),
        }
    }
    out.into_value()
}

// ============================================================================
// RESHAPING
// ============================================================================

/// Put the listed keys first (in the given order), then everything else.
///
/// Listed keys whose value is `null` are dropped.
#[must_use]
pub fn sort_by_key(node: &Value, keys: &[&str]) -> Vec<(String, Value)> {
    let mut out = Entries::default();
    for key in keys {
        if let Some(v) = child(node, key).filter(|v| !json::is_null(v)) {
            out.insert((*key).to_owned(), v.clone());
        }
    }
    for (key, v) in entries(node) {
        if !keys.contains(&key.as_str()) {
            out.insert(key, v.clone());
        }
    }
    out.into_pairs()
}

/// Insert `value` at the front.
///
/// Without a key, positional entries are renumbered after it. With a key,
/// an existing entry under that key is replaced.
#[must_use]
pub fn prepend(node: Value, value: Value, key: Option<&str>) -> Value {
    let mut out = Entries::default();
    match key {
        None => {
            out.push(value);
            append_all(&mut out, &node);
        },
        Some(key) => {
            out.insert(key.to_owned(), value);
            for (k, v) in entries(&node) {
                if !out.contains(&k) {
                    out.insert(k, v.clone());
                }
            }
        },
    }
    out.into_value()
}

/// Remove top-level keys and keys of nested containers.
///
/// `keys` is either a single key string, a list of keys, or an object whose
/// scalar members name top-level keys and whose container members list the
/// keys to remove below that member.
///
/// ```
/// use zd_helpers::{arr, json};
///
/// let data = json::decode(r#"{"a":1,"b":{"x":1,"y":2},"c":3}"#).unwrap();
/// let keys = json::decode(r#"{"0":"a","b":["x"]}"#).unwrap();
/// assert_eq!(json::encode(&arr::unset_2d(data, &keys)), r#"{"b":{"y":2},"c":3}"#);
/// ```
#[must_use]
pub fn unset_2d(mut data: Value, keys: &Value) -> Value {
    if let Value::String(key) = keys {
        remove_child(&mut data, key);
        return data;
    }
    for (key, item) in entries(keys) {
        if !is_container(item) {
            remove_child(&mut data, &to_plain_string(item));
            continue;
        }
        let Some(target) = child_mut(&mut data, &key) else {
            continue;
        };
        if !is_container(target) {
            remove_child(&mut data, &key);
            continue;
        }
        for sub in values(item) {
            remove_child(target, &to_plain_string(sub));
        }
    }
    data
}

/// Uppercase the first ASCII letter of each string.
#[must_use]
pub fn uc_first(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| crate::str::uc_first(s)).collect()
}

// ============================================================================
// STRING PROJECTIONS
// ============================================================================

/// Flatten into `prefix + key + link + value` strings.
///
/// Named containers extend the prefix with `key + link`; positional
/// entries keep the current prefix.
///
/// ```
/// use zd_helpers::{arr, json};
///
/// let tree = json::decode(r#"{"css":["a.css","b.css"],"js":"app.js"}"#).unwrap();
/// assert_eq!(arr::to_file(&tree, "/", ""), ["css/a.css", "css/b.css", "js/app.js"]);
/// ```
#[must_use]
pub fn to_file(node: &Value, link: &str, prefix: &str) -> Vec<String> {
    if !is_container(node) {
        return vec![format!("{prefix}{}", to_plain_string(node))];
    }
    let mut out = Vec::new();
    for (key, item) in entries(node) {
        let positional = list_index(&key).is_some();
        match (positional, is_container(item)) {
            (true, true) => out.extend(to_file(item, link, prefix)),
            (true, false) => out.push(format!("{prefix}{}", to_plain_string(item))),
            (false, true) => out.extend(to_file(item, link, &format!("{prefix}{key}{link}"))),
            (false, false) => out.push(format!("{prefix}{key}{link}{}", to_plain_string(item))),
        }
    }
    out
}

/// Concatenate every leaf, each followed by `link`.
#[must_use]
pub fn join_leaves(node: &Value, link: &str) -> String {
    if !is_container(node) {
        return format!("{}{link}", to_plain_string(node));
    }
    values(node)
        .into_iter()
        .map(|v| join_leaves(v, link))
        .collect()
}

/// Pick values by `"old:new default"` specs joined with `link`.
///
/// A single spec without renaming returns the bare value; otherwise the
/// result is an object keyed by the new names. A missing key falls back to
/// the inline default, then to `default`.
///
/// ```
/// use zd_helpers::{arr, json};
///
/// let args = json::decode(r#"{"id":7,"name":"ann"}"#).unwrap();
/// let picked = arr::get_values("id:user_id,name,age 18", &args, &json::null(), ",");
/// assert_eq!(json::encode(&picked), r#"{"age":"18","name":"ann","user_id":7}"#);
/// let bare = arr::get_values("name", &args, &json::null(), ",");
/// assert_eq!(json::as_str(&bare), Some("ann"));
/// ```
#[must_use]
pub fn get_values(spec: &str, args: &Value, default: &Value, link: &str) -> Value {
    if !spec.contains(link) {
        let (new_key, value, old_key) = pick(spec, args, default);
        if new_key == old_key {
            return value;
        }
        let mut out = Object::new();
        out.insert(new_key.to_owned(), value);
        return Value::Object(out);
    }
    let mut out = Entries::default();
    for part in spec.split(link) {
        let (new_key, value, _) = pick(part, args, default);
        out.insert(new_key.to_owned(), value);
    }
    out.into_value()
}

fn pick<'s>(spec: &'s str, args: &Value, default: &Value) -> (&'s str, Value, &'s str) {
    let (name, fallback) = match spec.split_once(' ') {
        Some((name, inline)) => (name, Value::String(inline.to_owned())),
        None => (spec, default.clone()),
    };
    let (old_key, new_key) = name.split_once(':').unwrap_or((name, name));
    let value = child(args, old_key).cloned().unwrap_or(fallback);
    (new_key, value, old_key)
}

// ============================================================================
// FIELD CASTS
// ============================================================================

/// Target type for [`cast_fields`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cast {
    /// Leading integer of the value.
    Int,
    /// Leading float of the value.
    Float,
    /// Truthiness per [`crate::str::to_bool`].
    Bool,
    /// Unix timestamp rendered with the default date format.
    DateTime,
    /// Unix timestamp rendered as "n unit ago".
    Ago,
    /// JSON text decoded into a tree.
    Array,
}

impl Cast {
    /// Parse a type name: `int`/`integer`, `float`/`double`,
    /// `bool`/`boolean`, `datetime`, `ago`, `array`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "int" | "integer" => Self::Int,
            "float" | "double" => Self::Float,
            "bool" | "boolean" => Self::Bool,
            "datetime" => Self::DateTime,
            "ago" => Self::Ago,
            "array" => Self::Array,
            _ => return None,
        })
    }

    fn apply(self, v: &Value) -> Value {
        match self {
            Self::Int => json::int(int_value(v)),
            Self::Float => json::float(float_value(v)),
            Self::Bool => json::bool(crate::str::to_bool(v)),
            Self::DateTime => json::str(crate::time::timestamp(int_value(v))),
            Self::Ago => json::str(crate::time::time_ago(int_value(v), crate::time::now())),
            Self::Array => match v {
                Value::String(s) => json::decode(s).unwrap_or(Value::Null),
                other => other.clone(),
            },
        }
    }
}

/// Convert the named fields of an object in place.
#[must_use]
pub fn cast_fields(mut data: Value, casts: &[(&str, Cast)]) -> Value {
    for (field, cast) in casts {
        if let Some(slot) = child_mut(&mut data, field) {
            *slot = cast.apply(slot);
        }
    }
    data
}

/// Integer part of a value, reading leading digits from strings.
pub(crate) fn int_value(v: &Value) -> i64 {
    match v {
        Value::Number(_) => json::as_i64(v).unwrap_or_else(|| float_value(v) as i64),
        Value::String(s) => {
            let s = s.trim_start();
            let sign_len = usize::from(s.starts_with(['-', '+']));
            let digits = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
            s[..sign_len + digits].parse().unwrap_or(0)
        },
        Value::Bool(b) => i64::from(*b),
        Value::Null => 0,
        Value::Array(_) | Value::Object(_) => i64::from(!json::is_empty(v)),
    }
}

/// Float part of a value, reading the longest numeric prefix from strings.
pub(crate) fn float_value(v: &Value) -> f64 {
    match v {
        Value::Number(_) => json::as_f64(v).unwrap_or(0.0),
        Value::String(s) => {
            let s = s.trim_start();
            (1..=s.len())
                .rev()
                .filter(|&end| s.is_char_boundary(end))
                .find_map(|end| s[..end].parse::<f64>().ok().filter(|f| f.is_finite()))
                .unwrap_or(0.0)
        },
        other => int_value(other) as f64,
    }
}
