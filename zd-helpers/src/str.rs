//! String helpers: matching, random strings, splitting, case conversion.
//!
//! Lengths are in bytes unless a function says otherwise; [`abs_length`]
//! and [`substr`] count Unicode scalar values.
//!
//! ```
//! use zd_helpers::str;
//!
//! assert!(str::is(&["library/*"], "library/rust"));
//! assert_eq!(str::studly("user_profile-page"), "UserProfilePage");
//! assert_eq!(str::un_studly("UserProfile", "_"), "user_profile");
//! assert_eq!(str::substr("你好世界", 0, 2, true), "你好…");
//! ```

use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use miniserde::json::Value;
use regex::Regex;

use crate::constants::ALNUM_POOL;
use crate::{json, random, url};

// ============================================================================
// CONVERSION
// ============================================================================

/// Truthiness of a loosely typed flag.
///
/// True for positive numbers (or numeric strings), `true`, and the string
/// `"true"` in any case. Empty values are always false.
///
/// ```
/// use zd_helpers::{json, str::to_bool};
///
/// assert!(to_bool(&json::str("TRUE")));
/// assert!(to_bool(&json::str("2")));
/// assert!(!to_bool(&json::str("yes")));
/// assert!(!to_bool(&json::int(-1)));
/// ```
#[must_use]
pub fn to_bool(value: &Value) -> bool {
    let truthy = match value {
        Value::Bool(b) => *b,
        Value::Number(_) => json::as_f64(value).is_some_and(|n| n > 0.0),
        Value::String(s) => {
            s.eq_ignore_ascii_case("true")
                || s.trim_start()
                    .parse::<f64>()
                    .is_ok_and(|n| n.is_finite() && n > 0.0)
        },
        _ => false,
    };
    truthy && !json::is_empty(value)
}

/// Uppercase the first byte if it is an ASCII letter.
#[must_use]
pub fn uc_first(s: &str) -> String {
    let mut out = s.to_owned();
    if let Some(first) = out.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    out
}

// ============================================================================
// MATCHING
// ============================================================================

/// Whether `haystack` contains any non-empty needle.
#[must_use]
pub fn contains(haystack: &str, needles: &[&str]) -> bool {
    needles
        .iter()
        .any(|n| !n.is_empty() && haystack.contains(n))
}

/// Whether `haystack` starts with any non-empty needle.
#[must_use]
pub fn starts_with(haystack: &str, needles: &[&str]) -> bool {
    needles
        .iter()
        .any(|n| !n.is_empty() && haystack.starts_with(n))
}

/// Whether `haystack` ends with any non-empty needle.
#[must_use]
pub fn ends_with(haystack: &str, needles: &[&str]) -> bool {
    needles
        .iter()
        .any(|n| !n.is_empty() && haystack.ends_with(n))
}

/// Whether `value` matches any pattern, where `*` matches any run of
/// characters (except newlines).
///
/// ```
/// use zd_helpers::str::is;
///
/// assert!(is(&["admin/*"], "admin/users"));
/// assert!(is(&["*.rs", "*.toml"], "Cargo.toml"));
/// assert!(!is(&["a.c"], "abc"));
/// assert!(!is(&[], "x"));
/// ```
#[must_use]
pub fn is(patterns: &[&str], value: &str) -> bool {
    patterns.iter().any(|pattern| wildcard_match(pattern, value))
}

/// Anchored `*` match. A `*` never spans a newline.
fn wildcard_match(pattern: &str, value: &str) -> bool {
    let Some((head, tail)) = pattern.split_once('*') else {
        return pattern == value;
    };
    let Some(mut rest) = value.strip_prefix(head) else {
        return false;
    };
    let (middle, last) = tail.rsplit_once('*').unwrap_or(("", tail));
    for part in middle.split('*').filter(|p| !p.is_empty()) {
        let Some(at) = rest.find(part) else {
            return false;
        };
        if rest[..at].contains('\n') {
            return false;
        }
        rest = &rest[at + part.len()..];
    }
    rest.strip_suffix(last).is_some_and(|gap| !gap.contains('\n'))
}

// ============================================================================
// RANDOM STRINGS
// ============================================================================

/// Random `[A-Za-z0-9]` string of exactly `length` chars.
///
/// Built from base64 of secure random bytes with `/`, `+` and `=` removed.
#[must_use]
pub fn random(length: usize) -> String {
    let mut out = String::with_capacity(length);
    while out.len() < length {
        let size = length - out.len();
        let encoded = STANDARD.encode(random::bytes(size));
        out.extend(
            encoded
                .chars()
                .filter(|c| !matches!(c, '/' | '+' | '='))
                .take(size),
        );
    }
    out
}

/// Uniform integer in `min..=max`.
#[must_use]
pub fn random_int(min: i64, max: i64) -> i64 {
    random::range(min, max)
}

/// Random digit string of exactly `length` chars (leading zeros kept).
#[must_use]
pub fn random_number(length: usize) -> String {
    (0..length)
        .map(|_| char::from(b'0' + random::range(0, 9) as u8))
        .collect()
}

/// Secure random bytes.
#[must_use]
pub fn random_bytes(length: usize) -> Vec<u8> {
    random::bytes(length)
}

/// Random alphanumeric string drawn by shuffling a repeated pool.
#[must_use]
pub fn quick_random(length: usize) -> String {
    let mut pool: Vec<u8> = ALNUM_POOL.repeat(length).into_bytes();
    random::shuffle(&mut pool);
    pool.truncate(length);
    String::from_utf8_lossy(&pool).into_owned()
}

/// Encode `number` in base `pool.len()` using `pool` as digits, then pad
/// with shuffled pool characters to `length`.
///
/// The result is truncated to `length`, so large numbers lose their low
/// digits. An empty pool yields an empty string.
///
/// ```
/// use zd_helpers::str::random_by_number;
///
/// // 53 is 110101 in base 2
/// assert_eq!(random_by_number(6, 53, "ab"), "bbabab");
/// assert_eq!(random_by_number(8, 53, "ab").len(), 8);
/// ```
#[must_use]
pub fn random_by_number(length: usize, number: u64, pool: &str) -> String {
    let digits: Vec<char> = pool.chars().collect();
    if digits.is_empty() {
        return String::new();
    }
    let base = digits.len() as u64;
    let mut encoded = Vec::new();
    let mut n = number;
    while n > 0 {
        encoded.push(digits[(n % base) as usize]);
        n /= base;
    }
    encoded.reverse();

    let mut filler: Vec<char> = digits
        .iter()
        .copied()
        .cycle()
        .take(digits.len() * length.saturating_sub(encoded.len()))
        .collect();
    random::shuffle(&mut filler);

    encoded.into_iter().chain(filler).take(length).collect()
}

// ============================================================================
// URL BINDING
// ============================================================================

fn split_url(url: &str) -> (String, Vec<(String, String)>) {
    let url = url.replace("&amp;", "&");
    match url.split_once('?') {
        Some((base, query)) => (base.to_owned(), url::parse_query(query)),
        None => (url, Vec::new()),
    }
}

fn upsert(pairs: &mut Vec<(String, String)>, key: String, value: String) {
    match pairs.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => pairs.push((key, value)),
    }
}

/// Set one query parameter on `url`, keeping the others in order.
///
/// ```
/// use zd_helpers::str::url_bind_value;
///
/// assert_eq!(url_bind_value("/list?page=1&amp;q=a", "page", "2"), "/list?page=2&q=a");
/// assert_eq!(url_bind_value("/list", "q", "a b"), "/list?q=a+b");
/// ```
#[must_use]
pub fn url_bind_value(url: &str, key: &str, value: &str) -> String {
    let (base, mut pairs) = split_url(url);
    upsert(&mut pairs, key.to_owned(), value.to_owned());
    format!("{base}?{}", url::build_query(&pairs))
}

/// Merge a `k=v&…` query string into the query of `url`.
#[must_use]
pub fn url_bind_query(url: &str, query: &str) -> String {
    let (base, mut pairs) = split_url(url);
    for (key, value) in url::parse_query(&query.replace("&amp;", "&")) {
        upsert(&mut pairs, key, value);
    }
    format!("{base}?{}", url::build_query(&pairs))
}

// ============================================================================
// SPLITTING / JOINING
// ============================================================================

/// Repeat `s` `count` times joined by `line`.
#[must_use]
pub fn repeat(s: &str, count: usize, line: &str) -> String {
    vec![s; count].join(line)
}

/// Length in bytes.
#[must_use]
pub const fn byte_length(s: &str) -> usize {
    s.len()
}

fn split_limited(s: &str, link: &str, num: usize) -> Vec<String> {
    if link.is_empty() {
        return vec![s.to_owned()];
    }
    s.splitn(num.max(1), link).map(str::to_owned).collect()
}

/// Split into at most `num` parts, padding missing parts with `default`.
///
/// ```
/// use zd_helpers::str::explode;
///
/// assert_eq!(explode("user@login", "@", 2, ""), ["user", "login"]);
/// assert_eq!(explode("user", "@", 2, "index"), ["user", "index"]);
/// assert_eq!(explode("a:b:c", ":", 2, ""), ["a", "b:c"]);
/// ```
#[must_use]
pub fn explode(s: &str, link: &str, num: usize, default: &str) -> Vec<String> {
    let mut parts = split_limited(s, link, num);
    parts.resize(num.max(parts.len()), default.to_owned());
    parts
}

/// Like [`explode`], but the missing part at index `i` comes from
/// `defaults[i]` (empty when `defaults` is too short).
#[must_use]
pub fn explode_with(s: &str, link: &str, num: usize, defaults: &[&str]) -> Vec<String> {
    let mut parts = split_limited(s, link, num);
    for i in parts.len()..num {
        parts.push(defaults.get(i).copied().unwrap_or_default().to_owned());
    }
    parts
}

/// Split on every delimiter.
#[must_use]
pub fn multi_explode(delimiters: &[&str], s: &str) -> Vec<String> {
    let Some((&first, rest)) = delimiters.split_first() else {
        return vec![s.to_owned()];
    };
    if first.is_empty() {
        return vec![s.to_owned()];
    }
    let unified = rest
        .iter()
        .filter(|d| !d.is_empty())
        .fold(s.to_owned(), |acc, d| acc.replace(d, first));
    unified.split(first).map(str::to_owned).collect()
}

/// Split `Class@method`; without `@` the second part is `default`.
#[must_use]
pub fn parse_callback(callback: &str, default: Option<&str>) -> (String, Option<String>) {
    match callback.split_once('@') {
        Some((target, method)) => (target.to_owned(), Some(method.to_owned())),
        None => (callback.to_owned(), default.map(str::to_owned)),
    }
}

// ============================================================================
// REPLACING / CASE
// ============================================================================

/// Replace `search` once when `s` starts with it.
#[must_use]
pub fn first_replace(s: &str, search: &str, replace: &str) -> String {
    match s.strip_prefix(search) {
        Some(rest) if !search.is_empty() => format!("{replace}{rest}"),
        _ => s.to_owned(),
    }
}

/// Replace `search` once when `s` ends with it.
#[must_use]
pub fn last_replace(s: &str, search: &str, replace: &str) -> String {
    match s.strip_suffix(search) {
        Some(rest) if !search.is_empty() => format!("{rest}{replace}"),
        _ => s.to_owned(),
    }
}

/// `foo_bar-baz` → `FooBarBaz`.
#[must_use]
pub fn studly(s: &str) -> String {
    let spaced = s.replace(['-', '_'], " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for c in spaced.chars() {
        if at_word_start {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c');
    }
    out.replace(' ', "")
}

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([a-z])([A-Z])").expect("static regex"));

/// `FooBar` → `foo_bar` (with a custom separator).
#[must_use]
pub fn un_studly(s: &str, separator: &str) -> String {
    CAMEL_BOUNDARY
        .replace_all(s, |caps: &regex::Captures<'_>| {
            format!("{}{separator}{}", &caps[1], &caps[2])
        })
        .to_ascii_lowercase()
}

// ============================================================================
// CHARACTER LENGTHS
// ============================================================================

/// Length in characters.
#[must_use]
pub fn abs_length(s: &str) -> usize {
    s.chars().count()
}

/// Character-based substring of `length` chars from `start`.
///
/// Strings of at most `length` chars come back unchanged. With `suffix`,
/// a truncated result ends in `…`.
#[must_use]
pub fn substr(s: &str, start: usize, length: usize, suffix: bool) -> String {
    if abs_length(s) <= length {
        return s.to_owned();
    }
    let slice: String = s.chars().skip(start).take(length).collect();
    if suffix { slice + "…" } else { slice }
}
