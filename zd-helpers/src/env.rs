//! Environment lookups over `(name, value)` pairs.
//!
//! Functions take the pairs explicitly so settings can be tested without
//! touching the process environment. [`EnvCache::from_process`] snapshots
//! the real environment.
//!
//! ```
//! use zd_helpers::env;
//!
//! let vars = vec![
//!     ("ZD_RANDOM_LENGTH".to_string(), "24".to_string()),
//!     ("ZD_DEBUG".to_string(), "yes".to_string()),
//! ];
//!
//! assert_eq!(env::parse::<usize>(&vars, "ZD_RANDOM_LENGTH"), Some(24));
//! assert!(env::bool(&vars, "ZD_DEBUG", false));
//! assert_eq!(env::get_or(&vars, "ZD_DATE_FORMAT", "Y-m-d"), "Y-m-d");
//! ```

use std::collections::HashMap;
use std::str::FromStr;

/// `true`, `1` and `yes` (any case) are truthy.
fn is_truthy(value: &str) -> bool {
    ["true", "1", "yes"]
        .iter()
        .any(|t| value.trim().eq_ignore_ascii_case(t))
}

/// Value of `name`, if set.
#[must_use]
pub fn get(env: &[(String, String)], name: &str) -> Option<String> {
    env.iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
}

/// Value of `name` or `default`.
#[must_use]
pub fn get_or(env: &[(String, String)], name: &str, default: &str) -> String {
    get(env, name).unwrap_or_else(|| default.to_string())
}

/// Value of `name` as a boolean, or `default` when unset.
#[must_use]
pub fn bool(env: &[(String, String)], name: &str, default: bool) -> bool {
    get(env, name).map_or(default, |v| is_truthy(&v))
}

/// Value of `name` parsed as `T`. Unset and unparsable values are `None`.
#[must_use]
pub fn parse<T: FromStr>(env: &[(String, String)], name: &str) -> Option<T> {
    get(env, name).and_then(|v| v.trim().parse().ok())
}

/// Environment snapshot with O(1) lookups.
///
/// ```
/// use zd_helpers::env::EnvCache;
///
/// let cache = EnvCache::new(vec![("ZD_TIMEZONE_OFFSET".to_string(), "+08:00".to_string())]);
/// assert_eq!(cache.get("ZD_TIMEZONE_OFFSET").as_deref(), Some("+08:00"));
/// assert_eq!(cache.get_or("ZD_JWT_ALGO", "HS256"), "HS256");
/// assert_eq!(cache.parse::<u8>("ZD_TIMEZONE_OFFSET"), None);
/// assert_eq!(cache.all().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvCache {
    map: HashMap<String, String>,
    vec: Vec<(String, String)>,
}

impl EnvCache {
    /// Cache the given pairs. Later duplicates win on lookup.
    #[must_use]
    pub fn new(env: Vec<(String, String)>) -> Self {
        let map = env.iter().cloned().collect();
        Self { map, vec: env }
    }

    /// Snapshot of the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    #[must_use]
    pub fn from_process() -> Self {
        Self::new(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        )
    }

    /// Value of `name`, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.map.get(name).cloned()
    }

    /// Value of `name` or `default`.
    #[must_use]
    pub fn get_or(&self, name: &str, default: &str) -> String {
        self.map
            .get(name)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Value of `name` as a boolean, or `default` when unset.
    #[must_use]
    pub fn bool(&self, name: &str, default: bool) -> bool {
        self.map.get(name).map_or(default, |v| is_truthy(v))
    }

    /// Value of `name` parsed as `T`.
    #[must_use]
    pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
        self.map.get(name).and_then(|v| v.trim().parse().ok())
    }

    /// Every cached pair in original order.
    #[inline]
    #[must_use]
    pub fn all(&self) -> &[(String, String)] {
        &self.vec
    }
}
