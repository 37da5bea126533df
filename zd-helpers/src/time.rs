//! Time utilities: clocks, `date()`-style formatting, calendar bounds.
//!
//! Timestamps are Unix seconds as `i64`. Formatting uses the classic
//! one-letter format characters (`Y-m-d H:i:s`, `D, d M Y`, …) evaluated
//! in a fixed UTC offset held by a [`DateFormatter`]. The free functions
//! in this module use UTC.
//!
//! # Examples
//!
//! ```
//! use zd_helpers::time::{self, DateFormatter};
//!
//! assert_eq!(time::timestamp(1737024600), "2025-01-16 10:50:00");
//! assert_eq!(time::format(1737024600, "D, d M Y"), "Thu, 16 Jan 2025");
//! assert_eq!(time::time_ago(1737024600 - 7200, 1737024600), "2 hour ago");
//!
//! let shanghai = DateFormatter::from_offset_seconds(8 * 3600).unwrap();
//! assert_eq!(shanghai.format(1737024600, "H:i P"), "18:50 +08:00");
//!
//! let iso = time::now_iso();
//! assert!(iso.ends_with('Z'));
//! ```

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, Timelike,
    Utc,
};

use crate::constants::{
    DEFAULT_DATE_FORMAT, DEFAULT_WEEK_PREFIX, SECONDS_PER_DAY, SECONDS_PER_HOUR,
    SECONDS_PER_MINUTE, SECONDS_PER_MONTH, SECONDS_PER_WEEK, SECONDS_PER_YEAR, WEEKDAY_NAMES_ZH,
};
use crate::error::{Error, Result};

// ============================================================================
// CLOCKS
// ============================================================================

/// Current Unix timestamp in seconds.
///
/// ```
/// assert!(zd_helpers::time::now() > 1_700_000_000);
/// ```
#[inline]
#[must_use]
pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Current Unix timestamp in milliseconds.
#[inline]
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current time as ISO 8601 UTC, e.g. `2025-01-16T10:50:00.500Z`.
///
/// Milliseconds are included only if non-zero.
#[inline]
#[must_use]
pub fn now_iso() -> String {
    let now = Utc::now();
    to_iso(now.timestamp(), now.timestamp_subsec_nanos())
}

/// Current time in seconds with microsecond precision.
#[must_use]
pub fn millisecond() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Milliseconds elapsed since `start` (a [`millisecond`] reading), rounded
/// to two decimals.
///
/// ```
/// use zd_helpers::time;
///
/// let start = time::millisecond();
/// assert!(time::elapsed_time(start) >= 0.0);
/// ```
#[must_use]
pub fn elapsed_time(start: f64) -> f64 {
    round_to((millisecond() - start) * 1000.0, 2)
}

/// Convert to milliseconds since epoch, saturating on overflow.
///
/// ```
/// assert_eq!(zd_helpers::time::to_millis(1737024600, 500_000_000), 1737024600500);
/// ```
#[inline]
#[must_use]
pub fn to_millis(seconds: i64, nanoseconds: u32) -> i64 {
    seconds
        .saturating_mul(1000)
        .saturating_add(i64::from(nanoseconds / 1_000_000))
}

/// Convert to ISO 8601 UTC with optional millisecond precision.
///
/// - If nanoseconds is 0: `YYYY-MM-DDTHH:MM:SSZ`
/// - Otherwise: `YYYY-MM-DDTHH:MM:SS.sssZ` (truncated to milliseconds)
///
/// Out-of-range timestamps render as the epoch.
///
/// ```
/// use zd_helpers::time::to_iso;
///
/// assert_eq!(to_iso(1737024600, 0), "2025-01-16T10:50:00Z");
/// assert_eq!(to_iso(1737024600, 500_000_000), "2025-01-16T10:50:00.500Z");
/// ```
#[must_use]
pub fn to_iso(seconds: i64, nanoseconds: u32) -> String {
    let millis = nanoseconds / 1_000_000;
    let dt = DateTime::from_timestamp(seconds, millis * 1_000_000).unwrap_or_default();
    if millis == 0 {
        dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

// ============================================================================
// DATE FORMATTER
// ============================================================================

/// Formats and parses dates in a fixed UTC offset.
///
/// The default formatter is UTC with `Y-m-d H:i:s` as its default format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatter {
    offset: FixedOffset,
    default_format: String,
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new(Utc.fix())
    }
}

impl DateFormatter {
    /// Formatter for `offset` with the default format.
    #[must_use]
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            default_format: DEFAULT_DATE_FORMAT.to_owned(),
        }
    }

    /// Formatter for an offset east of UTC in seconds.
    ///
    /// Returns `None` when the offset is a day or more.
    #[must_use]
    pub fn from_offset_seconds(seconds: i32) -> Option<Self> {
        FixedOffset::east_opt(seconds).map(Self::new)
    }

    /// Replace the format used by [`DateFormatter::timestamp`].
    #[must_use]
    pub fn with_default_format(mut self, format: impl Into<String>) -> Self {
        self.default_format = format.into();
        self
    }

    /// The UTC offset.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The format used by [`DateFormatter::timestamp`].
    #[must_use]
    pub fn default_format(&self) -> &str {
        &self.default_format
    }

    fn local(&self, ts: i64) -> DateTime<FixedOffset> {
        DateTime::from_timestamp(ts, 0)
            .unwrap_or_default()
            .with_timezone(&self.offset)
    }

    fn at_local(&self, naive: NaiveDateTime) -> i64 {
        naive.and_local_timezone(self.offset).single().map_or_else(
            || naive.and_utc().timestamp() - i64::from(self.offset.local_minus_utc()),
            |dt| dt.timestamp(),
        )
    }

    /// Render `ts` with a `date()`-style format string.
    ///
    /// Supported characters: `d D j l N S w z W F m M n t L o Y y a A g G h
    /// H i s u v e T P O U`. A backslash emits the next character
    /// literally; anything else is copied through.
    #[must_use]
    pub fn format(&self, ts: i64, format: &str) -> String {
        let dt = self.local(ts);
        let mut out = String::with_capacity(format.len() * 2);
        let mut chars = format.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
                continue;
            }
            self.push_field(&mut out, &dt, c);
        }
        out
    }

    fn push_field(&self, out: &mut String, dt: &DateTime<FixedOffset>, c: char) {
        use std::fmt::Write as _;

        const DAY_NAMES: [&str; 7] = [
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ];
        const MONTH_NAMES: [&str; 12] = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];

        let weekday = dt.weekday().num_days_from_monday() as usize;
        let month = dt.month0() as usize;
        let hour12 = match dt.hour() % 12 {
            0 => 12,
            h => h,
        };
        let offset = self.offset.local_minus_utc();
        let (sign, abs) = if offset < 0 { ('-', -offset) } else { ('+', offset) };
        let _ = match c {
            'd' => write!(out, "{:02}", dt.day()),
            'D' => out.write_str(&DAY_NAMES[weekday][..3]),
            'j' => write!(out, "{}", dt.day()),
            'l' => out.write_str(DAY_NAMES[weekday]),
            'N' => write!(out, "{}", weekday + 1),
            'S' => out.write_str(ordinal_suffix(dt.day())),
            'w' => write!(out, "{}", dt.weekday().num_days_from_sunday()),
            'z' => write!(out, "{}", dt.ordinal0()),
            'W' => write!(out, "{:02}", dt.iso_week().week()),
            'F' => out.write_str(MONTH_NAMES[month]),
            'm' => write!(out, "{:02}", dt.month()),
            'M' => out.write_str(&MONTH_NAMES[month][..3]),
            'n' => write!(out, "{}", dt.month()),
            't' => write!(out, "{}", days_in_month(dt.year(), dt.month())),
            'L' => write!(out, "{}", u8::from(is_leap_year(dt.year()))),
            'o' => write!(out, "{}", dt.iso_week().year()),
            'Y' => write!(out, "{}", dt.year()),
            'y' => write!(out, "{:02}", dt.year().rem_euclid(100)),
            'a' => out.write_str(if dt.hour() < 12 { "am" } else { "pm" }),
            'A' => out.write_str(if dt.hour() < 12 { "AM" } else { "PM" }),
            'g' => write!(out, "{hour12}"),
            'G' => write!(out, "{}", dt.hour()),
            'h' => write!(out, "{hour12:02}"),
            'H' => write!(out, "{:02}", dt.hour()),
            'i' => write!(out, "{:02}", dt.minute()),
            's' => write!(out, "{:02}", dt.second()),
            'u' => out.write_str("000000"),
            'v' => out.write_str("000"),
            'e' | 'T' if offset == 0 => out.write_str("UTC"),
            'e' | 'T' | 'P' => write!(out, "{sign}{:02}:{:02}", abs / 3600, abs % 3600 / 60),
            'O' => write!(out, "{sign}{:02}{:02}", abs / 3600, abs % 3600 / 60),
            'U' => write!(out, "{}", dt.timestamp()),
            other => {
                out.push(other);
                Ok(())
            },
        };
    }

    /// Render `ts` with the default format.
    #[must_use]
    pub fn timestamp(&self, ts: i64) -> String {
        self.format(ts, &self.default_format)
    }

    /// "n unit ago" for `ts` relative to `now`.
    ///
    /// A zero timestamp yields an empty string. Differences under a second
    /// (including future times) count as one second.
    #[must_use]
    pub fn time_ago(&self, ts: i64, now: i64) -> String {
        const TOKENS: [(i64, &str); 7] = [
            (SECONDS_PER_YEAR, "year"),
            (SECONDS_PER_MONTH, "month"),
            (SECONDS_PER_WEEK, "week"),
            (SECONDS_PER_DAY, "day"),
            (SECONDS_PER_HOUR, "hour"),
            (SECONDS_PER_MINUTE, "minute"),
            (1, "second"),
        ];
        if ts == 0 {
            return String::new();
        }
        let diff = now.saturating_sub(ts).max(1);
        TOKENS
            .iter()
            .find(|(unit, _)| diff >= *unit)
            .map_or_else(String::new, |(unit, name)| format!("{} {name} ago", diff / unit))
    }

    /// [`DateFormatter::time_ago`], but differences above `max_seconds` are
    /// rendered with `max_format` instead.
    #[must_use]
    pub fn time_ago_max(&self, ts: i64, now: i64, max_seconds: i64, max_format: &str) -> String {
        if ts == 0 {
            return String::new();
        }
        if max_seconds > 0 && now.saturating_sub(ts) > max_seconds {
            return self.format(ts, max_format);
        }
        self.time_ago(ts, now)
    }

    /// Parse a date string in this formatter's offset.
    ///
    /// Accepts RFC 3339, `Y-m-d`, `Y-m-d H:i`, `Y-m-d H:i:s` (with `-` or
    /// `/` separators, optional `T`), and bare Unix timestamps.
    pub fn parse(&self, input: &str) -> Result<i64> {
        const DATETIME_FORMATS: [&str; 5] = [
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M",
            "%Y/%m/%d %H:%M:%S",
            "%Y/%m/%d %H:%M",
        ];
        const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

        let s = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.timestamp());
        }
        if let Some(naive) = DATETIME_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        {
            return Ok(self.at_local(naive));
        }
        if let Some(date) = DATE_FORMATS
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        {
            return Ok(self.at_local(date.and_time(chrono::NaiveTime::MIN)));
        }
        if let Ok(ts) = s.strip_prefix('@').unwrap_or(s).parse::<i64>() {
            return Ok(ts);
        }
        Err(Error::InvalidDate(input.to_owned()))
    }

    /// Every day from `start` to `end` inclusive, formatted.
    ///
    /// An `end` before `start` yields an empty list.
    pub fn range_date(&self, start: &str, end: &str, format: &str) -> Result<Vec<String>> {
        let start = self.parse(start)?;
        let end = self.parse(end)?.saturating_add(SECONDS_PER_DAY);
        let mut days = Vec::new();
        let mut day = start;
        while day < end {
            days.push(self.format(day, format));
            day += SECONDS_PER_DAY;
        }
        Ok(days)
    }

    /// First second and last second of the month containing `ts`.
    #[must_use]
    pub fn month_bounds(&self, ts: i64) -> (i64, i64) {
        let date = self.local(ts).date_naive();
        let first = date.with_day(1).unwrap_or(date);
        let last_day = days_in_month(date.year(), date.month());
        let last = date.with_day(last_day).unwrap_or(date);
        (
            self.at_local(first.and_time(chrono::NaiveTime::MIN)),
            self.at_local(last.and_time(chrono::NaiveTime::MIN)) + SECONDS_PER_DAY - 1,
        )
    }

    /// Formatted [`DateFormatter::month_bounds`].
    #[must_use]
    pub fn month(&self, ts: i64, format: &str) -> (String, String) {
        let (start, end) = self.month_bounds(ts);
        (self.format(start, format), self.format(end, format))
    }

    /// Monday 00:00:00 and Sunday 23:59:59 of the week containing `ts`.
    #[must_use]
    pub fn week_bounds(&self, ts: i64) -> (i64, i64) {
        let date = self.local(ts).date_naive();
        let back = i64::from(date.weekday().num_days_from_monday());
        let monday = date - Duration::days(back);
        let start = self.at_local(monday.and_time(chrono::NaiveTime::MIN));
        (start, start + SECONDS_PER_WEEK - 1)
    }

    /// Formatted [`DateFormatter::week_bounds`].
    #[must_use]
    pub fn week(&self, ts: i64, format: &str) -> (String, String) {
        let (start, end) = self.week_bounds(ts);
        (self.format(start, format), self.format(end, format))
    }

    /// Weekday name as `prefix` plus a Chinese numeral (`星期四`).
    #[must_use]
    pub fn week_format(&self, ts: i64, prefix: &str) -> String {
        let day = self.local(ts).weekday().num_days_from_sunday() as usize;
        format!("{prefix}{}", WEEKDAY_NAMES_ZH[day])
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn is_leap_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 2, 29).is_some()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(31, |d| d.day())
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ============================================================================
// UTC SHORTCUTS
// ============================================================================

/// [`DateFormatter::format`] in UTC.
#[must_use]
pub fn format(ts: i64, format: &str) -> String {
    DateFormatter::default().format(ts, format)
}

/// `Y-m-d H:i:s` in UTC.
#[must_use]
pub fn timestamp(ts: i64) -> String {
    DateFormatter::default().timestamp(ts)
}

/// [`DateFormatter::time_ago`] in UTC.
#[must_use]
pub fn time_ago(ts: i64, now: i64) -> String {
    DateFormatter::default().time_ago(ts, now)
}

/// [`DateFormatter::time_ago_max`] in UTC.
#[must_use]
pub fn time_ago_max(ts: i64, now: i64, max_seconds: i64, max_format: &str) -> String {
    DateFormatter::default().time_ago_max(ts, now, max_seconds, max_format)
}

/// [`DateFormatter::parse`] in UTC.
pub fn parse(input: &str) -> Result<i64> {
    DateFormatter::default().parse(input)
}

/// [`DateFormatter::range_date`] in UTC.
pub fn range_date(start: &str, end: &str, format: &str) -> Result<Vec<String>> {
    DateFormatter::default().range_date(start, end, format)
}

/// [`DateFormatter::month`] in UTC.
#[must_use]
pub fn month(ts: i64, format: &str) -> (String, String) {
    DateFormatter::default().month(ts, format)
}

/// [`DateFormatter::week`] in UTC.
#[must_use]
pub fn week(ts: i64, format: &str) -> (String, String) {
    DateFormatter::default().week(ts, format)
}

/// [`DateFormatter::week_format`] in UTC with the default `星期` prefix.
#[must_use]
pub fn week_format(ts: i64) -> String {
    DateFormatter::default().week_format(ts, DEFAULT_WEEK_PREFIX)
}

/// `HH:MM:SS` for a number of seconds; hours are not capped at 24.
///
/// ```
/// assert_eq!(zd_helpers::time::hours_format(3725), "01:02:05");
/// ```
#[must_use]
pub fn hours_format(seconds: u64) -> String {
    let (hour, minute) = (SECONDS_PER_HOUR as u64, SECONDS_PER_MINUTE as u64);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / hour,
        seconds % hour / minute,
        seconds % minute
    )
}

/// Human duration: `μs` below a millisecond, `ms` below a second, else `s`.
///
/// ```
/// use zd_helpers::time::format_duration;
///
/// assert_eq!(format_duration(0.000_25), "250μs");
/// assert_eq!(format_duration(0.012_34), "12.34ms");
/// assert_eq!(format_duration(0.5), "500ms");
/// assert_eq!(format_duration(2.5), "2.5s");
/// ```
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    if seconds < 0.001 {
        format!("{}μs", (seconds * 1_000_000.0).round())
    } else if seconds < 0.1 {
        format!("{}ms", round_to(seconds * 1000.0, 2))
    } else if seconds < 1.0 {
        format!("{}ms", (seconds * 1000.0).round())
    } else {
        format!("{}s", round_to(seconds, 2))
    }
}
