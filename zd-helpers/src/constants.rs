//! Centralized constants for the zd-helpers crate.
//!
//! All limits, defaults, and lookup tables are defined here for easy tuning
//! and consistent behavior across the helpers.
//!
//! # Environment Variables
//!
//! | Variable            | Default          | Description                 |
//! |---------------------|------------------|-----------------------------|
//! | `ZD_MAX_JSON_SIZE`  | 1 MB (1,000,000) | Maximum JSON input size     |
//!
//! Other runtime settings (timezone offset, default date format, JWT
//! algorithm) are read through [`crate::config::Config`].

use std::sync::OnceLock;

// ============================================================================
// TIME CONSTANTS
// ============================================================================

/// Seconds in a year, as used by "time ago" (365 days).
pub const SECONDS_PER_YEAR: i64 = 31_536_000;

/// Seconds in a month, as used by "time ago" (30 days).
pub const SECONDS_PER_MONTH: i64 = 2_592_000;

/// Seconds in a week.
pub const SECONDS_PER_WEEK: i64 = 604_800;

/// Seconds in a day (24 * 60 * 60).
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Seconds in an hour (60 * 60).
pub const SECONDS_PER_HOUR: i64 = 3_600;

/// Seconds in a minute.
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Default `date()`-style format: `2025-01-16 10:50:00`.
pub const DEFAULT_DATE_FORMAT: &str = "Y-m-d H:i:s";

/// Default format for calendar-day output: `2025-01-16`.
pub const DEFAULT_DAY_FORMAT: &str = "Y-m-d";

/// Default prefix for [`crate::time::week_format`] ("星期").
pub const DEFAULT_WEEK_PREFIX: &str = "星期";

/// Weekday suffixes used by [`crate::time::week_format`], Sunday first.
pub const WEEKDAY_NAMES_ZH: [&str; 7] = ["日", "一", "二", "三", "四", "五", "六"];

// ============================================================================
// JSON LIMITS
// ============================================================================

/// Default maximum JSON input size (1MB) - prevents memory exhaustion.
const DEFAULT_MAX_JSON_SIZE: usize = 1_000_000;

/// Cached max JSON size from environment.
static MAX_JSON_SIZE_CACHE: OnceLock<usize> = OnceLock::new();

/// Returns the maximum allowed JSON input size in bytes.
///
/// Reads from `ZD_MAX_JSON_SIZE` on first call and falls back to 1MB if the
/// variable is unset or invalid. The value is cached for the process lifetime.
#[inline]
pub fn get_max_json_size() -> usize {
    *MAX_JSON_SIZE_CACHE.get_or_init(|| {
        std::env::var("ZD_MAX_JSON_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_JSON_SIZE)
    })
}

/// Maximum JSON nesting depth.
///
/// miniserde parses recursively, so deeply nested input is rejected before
/// it reaches the parser.
pub const MAX_JSON_DEPTH: usize = 64;

// ============================================================================
// URL LIMITS
// ============================================================================

/// Maximum decoded URL length (64KB).
pub const MAX_URL_DECODED_LEN: usize = 65536;

// ============================================================================
// RANDOM / ENCODING
// ============================================================================

/// Default length of [`crate::str::random`] and friends.
pub const DEFAULT_RANDOM_LENGTH: usize = 16;

/// Pool used by [`crate::str::quick_random`].
pub const ALNUM_POOL: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Pool used by [`crate::str::random_by_number`].
pub const ALPHA_POOL: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Human-readable size units for [`crate::disk::size`].
pub const SIZE_UNITS: [&str; 9] = [
    " Bytes", " KB", " MB", " GB", " TB", " PB", " EB", " ZB", " YB",
];

// ============================================================================
// CRYPTO
// ============================================================================

/// Line width used when wrapping bare base64 keys into PEM armor.
pub const PEM_LINE_WIDTH: usize = 64;

/// Default JWT signing algorithm.
pub const DEFAULT_JWT_ALGO: &str = "HS256";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_json_size_defaults_to_one_megabyte() {
        // The env var is not set in the test environment.
        if std::env::var("ZD_MAX_JSON_SIZE").is_err() {
            assert_eq!(get_max_json_size(), DEFAULT_MAX_JSON_SIZE);
        }
    }

    #[test]
    fn time_units_are_consistent() {
        assert_eq!(SECONDS_PER_DAY, 24 * SECONDS_PER_HOUR);
        assert_eq!(SECONDS_PER_WEEK, 7 * SECONDS_PER_DAY);
        assert_eq!(SECONDS_PER_MONTH, 30 * SECONDS_PER_DAY);
        assert_eq!(SECONDS_PER_YEAR, 365 * SECONDS_PER_DAY);
    }

    #[test]
    fn pools_have_expected_sizes() {
        assert_eq!(ALNUM_POOL.len(), 62);
        assert_eq!(ALPHA_POOL.len(), 52);
    }
}
