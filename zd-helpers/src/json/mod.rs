//! JSON decoding, encoding and value helpers using miniserde.
//!
//! Every tree-shaped helper in this crate ([`crate::arr`], [`crate::xml`],
//! [`crate::tree`]) works on [`Value`]. This module owns the guarded parser,
//! the encoder, and the scalar conversions those helpers share.
//!
//! # Examples
//!
//! ```
//! use zd_helpers::json::{self, Build, Value};
//!
//! let value = json::obj()
//!     .with("name", json::str("Alice"))
//!     .with("tags", json::arr().with_item(json::str("rust")));
//! let text = json::encode(&value);
//! assert_eq!(text, r#"{"name":"Alice","tags":["rust"]}"#);
//!
//! let Value::Object(back) = json::decode(&text).unwrap() else { unreachable!() };
//! assert_eq!(back.get("name").and_then(json::as_str), Some("Alice"));
//! ```
//!
//! Objects are backed by a sorted map, so encoded keys come out in
//! lexicographic order regardless of insertion order.

mod builder;
#[cfg(test)]
mod tests;

use crate::constants::{MAX_JSON_DEPTH, get_max_json_size};
use crate::error::{Error, Result};

pub use builder::{Build, arr, bool, float, int, null, obj, str};
pub use miniserde::json::{Array, Number, Object, Value};

/// Check if JSON nesting depth exceeds limit.
pub(crate) fn json_depth_exceeds_limit(data: &[u8]) -> bool {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escape = false;

    for &byte in data {
        if escape {
            escape = false;
            continue;
        }

        match byte {
            b'\\' if in_string => escape = true,
            b'"' => in_string = !in_string,
            b'[' | b'{' if !in_string => {
                depth += 1;
                if depth > MAX_JSON_DEPTH {
                    return true;
                }
            },
            b']' | b'}' if !in_string => {
                depth = depth.saturating_sub(1);
            },
            _ => {},
        }
    }

    false
}

/// Decode a JSON document into a [`Value`].
///
/// Rejects input larger than [`get_max_json_size`], nested deeper than
/// [`MAX_JSON_DEPTH`], with non-whitespace content after the value, or that
/// is not valid JSON.
///
/// ```
/// # use zd_helpers::json;
/// assert!(json::decode(r#"{"a":1}"#).is_ok());
/// assert!(json::decode(r#"{"a":1} trailing"#).is_err());
/// ```
pub fn decode(input: &str) -> Result<Value> {
    let bytes = input.as_bytes();
    if bytes.len() > get_max_json_size() {
        return Err(Error::Json(format!(
            "input of {} bytes exceeds limit of {}",
            bytes.len(),
            get_max_json_size()
        )));
    }
    if json_depth_exceeds_limit(bytes) {
        return Err(Error::Json(format!(
            "nesting deeper than {MAX_JSON_DEPTH} levels"
        )));
    }

    // `{"key":"value"}garbage` must not be accepted.
    let value_end =
        find_json_value_end(bytes).ok_or_else(|| Error::Json("no JSON value found".into()))?;
    if has_trailing_content(bytes, value_end) {
        return Err(Error::Json("trailing content after JSON value".into()));
    }

    miniserde::json::from_str(input).map_err(|_| Error::Json("malformed JSON".into()))
}

/// Decode raw bytes, returning `None` on any failure (including bad UTF-8).
#[must_use]
pub fn try_decode(data: &[u8]) -> Option<Value> {
    let s = std::str::from_utf8(data).ok()?;
    decode(s).ok()
}

/// Encode a [`Value`] as compact JSON. Non-ASCII text is written unescaped.
#[must_use]
pub fn encode(value: &Value) -> String {
    miniserde::json::to_string(value)
}

/// Check if there's non-whitespace content after position `pos`.
#[inline]
fn has_trailing_content(bytes: &[u8], pos: usize) -> bool {
    bytes[pos..]
        .iter()
        .any(|&b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
}

/// Find the end position of a JSON value starting at the beginning of bytes.
/// Returns the position after the complete JSON value.
fn find_json_value_end(bytes: &[u8]) -> Option<usize> {
    let pos = skip_ws(bytes, 0);
    let b = *bytes.get(pos)?;

    match b {
        b'"' => find_string_end_pos(bytes, pos + 1).map(|end| end + 1),
        b'{' => find_balanced_end_pos(bytes, pos, b'{', b'}'),
        b'[' => find_balanced_end_pos(bytes, pos, b'[', b']'),
        b't' => literal_end(bytes, pos, b"true"),
        b'f' => literal_end(bytes, pos, b"false"),
        b'n' => literal_end(bytes, pos, b"null"),
        b'-' | b'0'..=b'9' => {
            let len = bytes[pos..]
                .iter()
                .take_while(|b| matches!(b, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E'))
                .count();
            Some(pos + len)
        },
        _ => None,
    }
}

fn literal_end(bytes: &[u8], pos: usize, literal: &[u8]) -> Option<usize> {
    bytes
        .get(pos..pos + literal.len())
        .filter(|s| *s == literal)
        .map(|_| pos + literal.len())
}

#[inline]
fn skip_ws(bytes: &[u8], pos: usize) -> usize {
    pos + bytes[pos..]
        .iter()
        .take_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
        .count()
}

fn find_string_end_pos(bytes: &[u8], mut pos: usize) -> Option<usize> {
    while pos < bytes.len() {
        match bytes[pos] {
            b'"' => return Some(pos),
            b'\\' => pos += 2,
            _ => pos += 1,
        }
    }
    None
}

fn find_balanced_end_pos(bytes: &[u8], mut pos: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    while pos < bytes.len() {
        let b = bytes[pos];

        if escape {
            escape = false;
            pos += 1;
            continue;
        }

        match b {
            b'\\' if in_string => escape = true,
            b'"' => in_string = !in_string,
            _ if in_string => {},
            _ if b == open => depth += 1,
            _ if b == close => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(pos + 1);
                }
            },
            _ => {},
        }
        pos += 1;
    }
    None
}

// ============================================================================
// SCALAR HELPERS
// ============================================================================

/// Borrow the string inside a [`Value::String`].
#[inline]
#[must_use]
pub fn as_str(v: &Value) -> Option<&str> {
    match v {
        Value::String(s) => Some(s),
        _ => None,
    }
}

/// Borrow the items of a [`Value::Array`].
#[inline]
#[must_use]
pub fn as_array(v: &Value) -> Option<&[Value]> {
    match v {
        Value::Array(list) => Some(list.as_slice()),
        _ => None,
    }
}

/// Integer view of a number. Floats are accepted when they fit losslessly
/// in the JavaScript safe range.
#[must_use]
pub fn as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => match n {
            Number::I64(i) => Some(*i),
            Number::U64(u) => (*u).try_into().ok(),
            Number::F64(f) => {
                const MAX_SAFE_INT: f64 = 9007199254740992.0;
                if f.is_finite() && f.abs() <= MAX_SAFE_INT {
                    Some(*f as i64)
                } else {
                    None
                }
            },
        },
        _ => None,
    }
}

/// Float view of a number.
#[must_use]
#[allow(clippy::cast_precision_loss)] // large i64/u64 may lose precision
pub const fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => match n {
            Number::F64(f) if f.is_finite() => Some(*f),
            Number::I64(i) => Some(*i as f64),
            Number::U64(u) => Some(*u as f64),
            Number::F64(_) => None,
        },
        _ => None,
    }
}

/// The boolean inside a [`Value::Bool`].
#[inline]
#[must_use]
pub const fn as_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        _ => None,
    }
}

/// Whether the value is `null`.
#[inline]
#[must_use]
pub const fn is_null(v: &Value) -> bool {
    matches!(v, Value::Null)
}

/// Whether the value is an array or an object.
#[inline]
#[must_use]
pub const fn is_container(v: &Value) -> bool {
    matches!(v, Value::Array(_) | Value::Object(_))
}

/// Loose "emptiness": `null`, `false`, `0`, `""`, `"0"` and empty containers.
#[must_use]
pub fn is_empty(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(_) => as_f64(v).is_none_or(|f| f == 0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Render a number without a trailing `.0` for integral floats.
#[must_use]
pub fn number_to_string(n: &Number) -> String {
    match n {
        Number::I64(i) => i.to_string(),
        Number::U64(u) => u.to_string(),
        Number::F64(f) => f.to_string(),
    }
}

/// String form of a value as a template engine would print it.
///
/// `null` and `false` become `""`, `true` becomes `"1"`, numbers print in
/// their shortest form, and containers are JSON-encoded.
#[must_use]
pub fn to_plain_string(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Bool(true) => "1".into(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => encode(v),
    }
}

/// Loose equality between two values.
///
/// Numbers and numeric strings compare numerically, booleans compare by
/// truthiness, `null` equals any empty value, and everything else compares
/// by [`to_plain_string`].
#[must_use]
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == !is_empty(other),
        (Value::Null, other) | (other, Value::Null) => is_empty(other),
        _ => match (numeric(a), numeric(b)) {
            (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
            _ => to_plain_string(a) == to_plain_string(b),
        },
    }
}

fn numeric(v: &Value) -> Option<f64> {
    match v {
        Value::Number(_) => as_f64(v),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
