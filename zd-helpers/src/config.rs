//! Runtime settings read from the environment.
//!
//! | Variable             | Default       | Description                               |
//! |----------------------|---------------|-------------------------------------------|
//! | `ZD_TIMEZONE_OFFSET` | `+00:00`      | `±HH:MM`, `±HHMM`, `Z`/`UTC`, or seconds  |
//! | `ZD_DATE_FORMAT`     | `Y-m-d H:i:s` | Default format of [`DateFormatter`]       |
//! | `ZD_JWT_ALGO`        | `HS256`       | Default [`Algorithm`] for new JWTs        |
//! | `ZD_RANDOM_LENGTH`   | `16`          | Default length for random strings         |
//!
//! Invalid values fall back to the default (logged at debug level).
//!
//! ```
//! use zd_helpers::config::Config;
//! use zd_helpers::env::EnvCache;
//!
//! let env = EnvCache::new(vec![
//!     ("ZD_TIMEZONE_OFFSET".to_string(), "+08:00".to_string()),
//!     ("ZD_RANDOM_LENGTH".to_string(), "8".to_string()),
//! ]);
//! let config = Config::from_env(&env);
//! assert_eq!(config.random_length, 8);
//! assert_eq!(config.formatter().timestamp(0), "1970-01-01 08:00:00");
//! ```

use chrono::{FixedOffset, Offset, Utc};

use crate::constants::{DEFAULT_DATE_FORMAT, DEFAULT_JWT_ALGO, DEFAULT_RANDOM_LENGTH};
use crate::env::EnvCache;
use crate::security::Algorithm;
use crate::time::DateFormatter;

/// Settings shared by the helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Offset used for date formatting and parsing.
    pub timezone_offset: FixedOffset,
    /// Format used by [`DateFormatter::timestamp`].
    pub date_format: String,
    /// Algorithm for newly issued JWTs.
    pub jwt_algorithm: Algorithm,
    /// Length of generated random strings.
    pub random_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone_offset: Utc.fix(),
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
            jwt_algorithm: Algorithm::from_name(DEFAULT_JWT_ALGO).unwrap_or(Algorithm::Hs256),
            random_length: DEFAULT_RANDOM_LENGTH,
        }
    }
}

impl Config {
    /// Read settings from an environment snapshot.
    #[must_use]
    pub fn from_env(env: &EnvCache) -> Self {
        let defaults = Self::default();

        let timezone_offset = env
            .get("ZD_TIMEZONE_OFFSET")
            .map_or(defaults.timezone_offset, |raw| {
                parse_offset(&raw).unwrap_or_else(|| {
                    crate::log::debug!("invalid ZD_TIMEZONE_OFFSET {raw:?}, using UTC");
                    defaults.timezone_offset
                })
            });

        let date_format = env
            .get("ZD_DATE_FORMAT")
            .filter(|f| !f.is_empty())
            .unwrap_or(defaults.date_format);

        let jwt_algorithm = env
            .get("ZD_JWT_ALGO")
            .map_or(defaults.jwt_algorithm, |raw| {
                Algorithm::from_name(&raw).unwrap_or_else(|| {
                    crate::log::debug!("unsupported ZD_JWT_ALGO {raw:?}, using {DEFAULT_JWT_ALGO}");
                    defaults.jwt_algorithm
                })
            });

        let random_length = env
            .parse::<usize>("ZD_RANDOM_LENGTH")
            .filter(|n| *n > 0)
            .unwrap_or(defaults.random_length);

        Self {
            timezone_offset,
            date_format,
            jwt_algorithm,
            random_length,
        }
    }

    /// Read settings from the process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self::from_env(&EnvCache::from_process())
    }

    /// A [`DateFormatter`] for the configured offset and format.
    #[must_use]
    pub fn formatter(&self) -> DateFormatter {
        DateFormatter::new(self.timezone_offset).with_default_format(self.date_format.clone())
    }
}

/// Parse `±HH:MM`, `±HHMM`, `±HH`, `Z`, `UTC`, or a signed number of seconds.
fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let s = raw.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return Some(Utc.fix());
    }
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return FixedOffset::east_opt(s.parse().ok()?),
    };
    let digits = rest.replace(':', "");
    if digits.is_empty() || digits.len() > 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = if digits.len() <= 2 {
        (digits.parse::<i32>().ok()?, 0)
    } else {
        let split = digits.len() - 2;
        (digits[..split].parse::<i32>().ok()?, digits[split..].parse::<i32>().ok()?)
    };
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvCache {
        EnvCache::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_env(&env(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.date_format, "Y-m-d H:i:s");
        assert_eq!(config.jwt_algorithm, Algorithm::Hs256);
        assert_eq!(config.random_length, 16);
    }

    #[test]
    fn reads_every_setting() {
        let config = Config::from_env(&env(&[
            ("ZD_TIMEZONE_OFFSET", "-05:30"),
            ("ZD_DATE_FORMAT", "d/m/Y"),
            ("ZD_JWT_ALGO", "RS512"),
            ("ZD_RANDOM_LENGTH", "40"),
        ]));
        assert_eq!(config.timezone_offset.local_minus_utc(), -19800);
        assert_eq!(config.jwt_algorithm, Algorithm::Rs512);
        assert_eq!(config.random_length, 40);
        assert_eq!(config.formatter().timestamp(0), "31/12/1969");
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = Config::from_env(&env(&[
            ("ZD_TIMEZONE_OFFSET", "+25:00"),
            ("ZD_DATE_FORMAT", ""),
            ("ZD_JWT_ALGO", "none"),
            ("ZD_RANDOM_LENGTH", "0"),
        ]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn offset_forms() {
        let secs = |s: &str| parse_offset(s).map(|o| o.local_minus_utc());
        assert_eq!(secs("+08:00"), Some(28800));
        assert_eq!(secs("+0800"), Some(28800));
        assert_eq!(secs("+8"), Some(28800));
        assert_eq!(secs("-0930"), Some(-34200));
        assert_eq!(secs("3600"), Some(3600));
        assert_eq!(secs("UTC"), Some(0));
        assert_eq!(secs("Z"), Some(0));
        assert_eq!(secs("+08:75"), None);
        assert_eq!(secs("+x"), None);
        assert_eq!(secs(""), None);
        assert_eq!(secs("+12345"), None);
    }
}
