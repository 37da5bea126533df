//! Byte sizes and path arithmetic on plain strings.

use std::path::MAIN_SEPARATOR_STR;

use crate::constants::SIZE_UNITS;

/// Human-readable size rounded to two decimals, `"n/a"` for zero.
///
/// ```
/// use zd_helpers::disk::size;
///
/// assert_eq!(size(0), "n/a");
/// assert_eq!(size(512), "512 Bytes");
/// assert_eq!(size(1536), "1.5 KB");
/// assert_eq!(size(5 * 1024 * 1024 * 1024), "5 GB");
/// ```
#[must_use]
pub fn size(bytes: u64) -> String {
    if bytes == 0 {
        return "n/a".to_owned();
    }
    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{rounded}{}", SIZE_UNITS[unit])
}

/// `a` expressed from the directory of `b`.
///
/// Leading `/` are ignored. Each leading segment the two paths share is
/// replaced by `..` in `a`.
///
/// ```
/// use zd_helpers::disk::relative_path;
///
/// assert_eq!(relative_path("/a/b/c.txt", "/a/d"), "../b/c.txt");
/// ```
#[must_use]
pub fn relative_path(a: &str, b: &str) -> String {
    let mut segments: Vec<&str> = a.trim_start_matches('/').split('/').collect();
    let base: Vec<&str> = b.trim_start_matches('/').split('/').collect();
    for (segment, other) in segments.iter_mut().zip(&base) {
        if segment != other {
            break;
        }
        *segment = "..";
    }
    segments.join("/")
}

/// Normalize `path` by resolving `.` and `..`, joining with the platform
/// separator. Both `/` and `\` split segments, empty segments are dropped
/// and `..` past the start is ignored.
///
/// ```
/// use zd_helpers::disk::absolute_path;
///
/// let sep = std::path::MAIN_SEPARATOR_STR;
/// assert_eq!(absolute_path("a/./b/../c"), format!("a{sep}c"));
/// ```
#[must_use]
pub fn absolute_path(path: &str) -> String {
    let mut resolved: Vec<&str> = Vec::new();
    for part in path.split(['/', '\\']).filter(|p| !p.is_empty()) {
        match part {
            "." => {},
            ".." => {
                resolved.pop();
            },
            _ => resolved.push(part),
        }
    }
    resolved.join(MAIN_SEPARATOR_STR)
}
