//! Descendant and ancestor lookups over flat `(id, parent_id)` rows.
//!
//! ```
//! use zd_helpers::{json, tree::{self, TreeKeys}};
//!
//! let rows = json::decode(r#"[
//!     {"id":1,"parent_id":0},
//!     {"id":2,"parent_id":1},
//!     {"id":3,"parent_id":2}
//! ]"#).unwrap();
//! let rows = json::as_array(&rows).unwrap();
//!
//! let kids = tree::children(rows, &json::int(1), TreeKeys::default());
//! assert_eq!(kids.iter().filter_map(json::as_i64).collect::<Vec<_>>(), [2, 3]);
//!
//! let up = tree::parents(rows, &json::int(3), TreeKeys::default());
//! assert_eq!(up.iter().filter_map(json::as_i64).collect::<Vec<_>>(), [1, 2]);
//! ```

use std::collections::HashMap;

use miniserde::json::Value;

use crate::arr::{child, float_value, key_string};
use crate::json::{is_empty, loose_eq};

/// Field names of the id and parent id in each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeKeys<'a> {
    /// Parent reference field, `parent_id` by default.
    pub parent: &'a str,
    /// Row id field, `id` by default.
    pub id: &'a str,
}

impl Default for TreeKeys<'static> {
    fn default() -> Self {
        Self {
            parent: "parent_id",
            id: "id",
        }
    }
}

impl<'a> TreeKeys<'a> {
    /// Custom field names.
    #[must_use]
    pub const fn new(parent: &'a str, id: &'a str) -> Self {
        Self { parent, id }
    }
}

const NULL: Value = Value::Null;

fn field<'v>(row: &'v Value, name: &str) -> &'v Value {
    child(row, name).unwrap_or(&NULL)
}

/// Ids of every descendant of `parent_id`, level by level.
///
/// Within a level, rows are scanned from the end of `rows`. Ids compare
/// loosely, so `"2"` matches `2`. Each row is visited at most once, which
/// keeps cyclic data finite.
#[must_use]
pub fn children(rows: &[Value], parent_id: &Value, keys: TreeKeys<'_>) -> Vec<Value> {
    let mut remaining: Vec<&Value> = rows.iter().collect();
    let mut result = Vec::new();
    let mut level = vec![parent_id.clone()];

    while !level.is_empty() {
        let mut next = Vec::new();
        for fid in &level {
            for i in (0..remaining.len()).rev() {
                if loose_eq(field(remaining[i], keys.parent), fid) {
                    let row = remaining.remove(i);
                    let id = field(row, keys.id).clone();
                    result.push(id.clone());
                    next.push(id);
                }
            }
        }
        level = next;
    }
    result
}

/// Ids of the ancestors of `id`, root first.
///
/// The walk stops at a missing row, at a parent that is not positive
/// (non-numeric parents count as zero) and when a parent repeats.
#[must_use]
pub fn parents(rows: &[Value], id: &Value, keys: TreeKeys<'_>) -> Vec<Value> {
    let parent_of: HashMap<String, &Value> = rows
        .iter()
        .map(|row| (key_string(field(row, keys.id)), field(row, keys.parent)))
        .collect();

    let mut result: Vec<Value> = Vec::new();
    let mut current = id.clone();
    while !is_empty(&current) {
        let Some(&parent) = parent_of.get(&key_string(&current)) else {
            break;
        };
        if float_value(parent) <= 0.0 || result.iter().any(|seen| loose_eq(seen, parent)) {
            break;
        }
        result.push(parent.clone());
        current = parent.clone();
    }
    result.reverse();
    result
}
