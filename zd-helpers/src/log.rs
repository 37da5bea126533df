//! Structured JSON logging to stderr.
//!
//! Each log line is a JSON object with these fields:
//! - `level`: Log level ("debug", "info", "warn", "error")
//! - `msg`: The log message
//! - Additional key-value fields as specified
//! - `ts`: ISO 8601 UTC timestamp with milliseconds
//!
//! ```json
//! {"level":"info","msg":"key loaded","bits":"2048","ts":"2025-01-16T10:30:00.000Z"}
//! {"level":"debug","msg":"jwt signature mismatch","alg":"HS256","ts":"2025-01-16T10:30:01.120Z"}
//! ```
//!
//! # Structured Logging Usage
//!
//! ```no_run
//! use zd_helpers::log;
//!
//! let alg = "RS256";
//! log!(info, "token issued", alg: alg, ttl: 3600);
//! log!(warn, "clock skew");
//! ```
//!
//! # Simple Logging (format string style)
//!
//! ```no_run
//! use zd_helpers::log;
//!
//! log::info!("cipher ready: {}", "aes-256-ecb");
//! log::warn!("falling back to UTC");
//! log::error!("key rejected: {}", "bad pem");
//! log::debug!("only in debug builds");
//! ```
//!
//! `debug!` is compiled out in release builds. The helpers in this crate
//! only log at debug level, when a key fails to load or a signature does
//! not verify.
//!
//! The macros are defined as `log_info`, `log_warn`, … to stay clear of
//! builtin names and re-exported here as `info`, `warn`, `error`, `debug`.

use chrono::Utc;

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.sssZ`.
#[doc(hidden)]
#[must_use]
pub fn __format_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Escape a string for a JSON string literal (RFC 8259).
#[doc(hidden)]
#[must_use]
pub fn __escape_json(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + (s.len() / 10).max(8));
    for c in s.chars() {
        match c {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(result, "\\u{:04x}", c as u32);
            },
            c => result.push(c),
        }
    }
    result
}

/// Build one log line with an explicit timestamp.
#[doc(hidden)]
#[must_use]
pub fn __build_log_line(level: &str, msg: &str, fields: &[(&str, &str)], ts: &str) -> String {
    let mut output = String::with_capacity(50 + msg.len() * 2 + fields.len() * 30);

    output.push_str(r#"{"level":""#);
    output.push_str(level);
    output.push_str(r#"","msg":""#);
    output.push_str(&__escape_json(msg));
    output.push('"');

    for (key, value) in fields {
        output.push_str(r#",""#);
        output.push_str(&__escape_json(key));
        output.push_str(r#"":""#);
        output.push_str(&__escape_json(value));
        output.push('"');
    }

    output.push_str(r#","ts":""#);
    output.push_str(ts);
    output.push_str(r#""}"#);
    output
}

/// Build a structured log line stamped with the current time.
#[doc(hidden)]
#[must_use]
pub fn __build_structured_log(level: &str, msg: &str, fields: &[(&str, &str)]) -> String {
    __build_log_line(level, msg, fields, &__format_timestamp())
}

/// Write one line to stderr. Write errors are ignored.
#[doc(hidden)]
pub fn __emit(line: &str) {
    use std::io::Write;
    let _ = writeln!(std::io::stderr(), "{line}");
}

/// Log an informational message to stderr.
///
/// ```no_run
/// zd_helpers::log::info!("loaded {} keys", 2);
/// ```
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::log::__emit(&$crate::log::__build_structured_log("info", &format!($($arg)*), &[]))
    };
}

/// Log a warning message to stderr.
///
/// ```no_run
/// zd_helpers::log::warn!("offset {} out of range, using UTC", 90_000);
/// ```
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::log::__emit(&$crate::log::__build_structured_log("warn", &format!($($arg)*), &[]))
    };
}

/// Log an error message to stderr.
///
/// ```no_run
/// zd_helpers::log::error!("decrypt failed: {}", "bad padding");
/// ```
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::log::__emit(&$crate::log::__build_structured_log("error", &format!($($arg)*), &[]))
    };
}

/// Log a debug message to stderr (only in debug builds).
///
/// In release builds this expands to nothing and the arguments are not
/// evaluated.
///
/// ```no_run
/// zd_helpers::log::debug!("segments: {:?}", ["a", "b", "c"]);
/// ```
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        #[cfg(debug_assertions)]
        {
            $crate::log::__emit(&$crate::log::__build_structured_log(
                "debug",
                &format!($($arg)*),
                &[],
            ));
        }
    }};
}

pub use log_debug as debug;
pub use log_error as error;
pub use log_info as info;
pub use log_warn as warn;

// ============================================================================
// STRUCTURED LOGGING MACRO
// ============================================================================

/// Structured logging with key-value fields.
///
/// Values are rendered with `Display`. Unlike `log::debug!`, the structured
/// `log!(debug, ...)` is not compiled out in release builds.
///
/// ```no_run
/// use zd_helpers::log;
///
/// log!(info, "cipher ready", mode: "ecb", bits: 256);
/// log!(info, "started");
/// ```
#[macro_export]
macro_rules! log {
    ($level:ident, $msg:expr $(, $key:ident : $value:expr)* $(,)?) => {{
        let fields: &[(&str, &str)] = &[
            $( (stringify!($key), &format!("{}", $value)) ),*
        ];
        $crate::log::__emit(&$crate::log::__build_structured_log(stringify!($level), $msg, fields));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2025-01-16T10:50:00.000Z";

    #[test]
    fn test_escape_json_specials() {
        assert_eq!(__escape_json("hello"), "hello");
        assert_eq!(__escape_json(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(__escape_json(r"C:\path"), r"C:\\path");
        assert_eq!(__escape_json("a\nb\r\tc"), r"a\nb\r\tc");
        assert_eq!(__escape_json("\x00\x1f"), r"\u0000\u001f");
        assert_eq!(__escape_json(""), "");
        assert_eq!(__escape_json("日本 🎉"), "日本 🎉");
    }

    #[test]
    fn test_log_line_without_fields() {
        assert_eq!(
            __build_log_line("info", "started", &[], TS),
            r#"{"level":"info","msg":"started","ts":"2025-01-16T10:50:00.000Z"}"#
        );
    }

    #[test]
    fn test_log_line_with_fields() {
        assert_eq!(
            __build_log_line("debug", "jwt rejected", &[("alg", "HS256"), ("reason", "sig")], TS),
            r#"{"level":"debug","msg":"jwt rejected","alg":"HS256","reason":"sig","ts":"2025-01-16T10:50:00.000Z"}"#
        );
    }

    #[test]
    fn test_log_line_escapes_message_and_values() {
        let line = __build_log_line("warn", "bad \"key\"", &[("data", "line1\nline2")], TS);
        assert!(line.contains(r#""msg":"bad \"key\"""#));
        assert!(line.contains(r#""data":"line1\nline2""#));
    }

    #[test]
    fn test_log_line_is_valid_json() {
        let line = __build_log_line("error", "x\u{1}y", &[("k", "\"v\"")], TS);
        let parsed = crate::json::decode(&line).unwrap();
        let Some(msg) = crate::arr::get(&parsed, "msg").and_then(crate::json::as_str) else {
            panic!("msg missing in {line}");
        };
        assert_eq!(msg, "x\u{1}y");
    }

    #[test]
    fn test_timestamp_format() {
        let ts = __format_timestamp();
        assert_eq!(ts.len(), 24, "{ts}");
        assert!(ts.ends_with('Z'));
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[19..20], ".");
        let year: i32 = ts[0..4].parse().unwrap();
        assert!((2020..=2100).contains(&year));
    }

    #[test]
    fn test_structured_log_stamps_current_time() {
        let output = __build_structured_log("info", "test", &[("key", "value")]);
        assert!(output.starts_with(r#"{"level":"info","msg":"test","key":"value","ts":"20"#));
        assert!(output.ends_with(r#"Z"}"#));
    }

    #[test]
    fn test_macros_expand() {
        log_info!("info {}", 1);
        log_warn!("warn");
        log_error!("error {:?}", "e");
        log_debug!("debug {}", 2);
        crate::log!(info, "structured", n: 1, s: "x");
        crate::log!(warn, "bare");
    }
}
