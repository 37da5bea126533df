//! URL encoding and query-string plumbing.
//!
//! Queries are handled as ordered `(key, value)` pairs so a parse/build
//! round trip keeps the caller's parameter order.
//!
//! ```
//! use zd_helpers::url;
//!
//! let pairs = url::parse_query("q=rust+lang&page=2");
//! assert_eq!(pairs[0], ("q".to_string(), "rust lang".to_string()));
//! assert_eq!(url::build_query(&pairs), "q=rust+lang&page=2");
//! ```

use crate::constants::MAX_URL_DECODED_LEN;

/// Error returned when URL decoding fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Decoded output would exceed maximum length.
    TooLong,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLong => write!(
                f,
                "url decoded output exceeds maximum length ({}KB limit)",
                MAX_URL_DECODED_LEN / 1024
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<DecodeError> for crate::Error {
    fn from(err: DecodeError) -> Self {
        Self::encoding("url", err)
    }
}

/// Form-style URL decoding (`%XX` sequences and `+` as space).
///
/// Invalid or truncated escapes are kept verbatim; invalid UTF-8 is replaced
/// lossily.
///
/// # Errors
///
/// Returns [`DecodeError::TooLong`] if decoded output would exceed
/// `MAX_URL_DECODED_LEN` (64KB).
///
/// ```
/// use zd_helpers::url::url_decode;
///
/// assert_eq!(url_decode("hello%20world").unwrap(), "hello world");
/// assert_eq!(url_decode("hello+world").unwrap(), "hello world");
/// assert_eq!(url_decode("caf%C3%A9").unwrap(), "café");
/// ```
pub fn url_decode(s: &str) -> Result<String, DecodeError> {
    let mut bytes = Vec::with_capacity(s.len());
    let mut chars = s.bytes();

    while let Some(b) = chars.next() {
        if bytes.len() >= MAX_URL_DECODED_LEN {
            return Err(DecodeError::TooLong);
        }

        match b {
            b'%' => {
                let h1 = chars.next();
                let h2 = chars.next();
                if let (Some(h1), Some(h2)) = (h1, h2) {
                    let hex_str = [h1, h2];
                    if let Ok(hex_str) = std::str::from_utf8(&hex_str)
                        && let Ok(decoded) = u8::from_str_radix(hex_str, 16)
                    {
                        bytes.push(decoded);
                        continue;
                    }
                    // Invalid escape, keep original bytes
                    bytes.push(b'%');
                    bytes.push(h1);
                    bytes.push(h2);
                } else {
                    bytes.push(b'%');
                    if let Some(h1) = h1 {
                        bytes.push(h1);
                    }
                }
            },
            b'+' => bytes.push(b' '),
            _ => bytes.push(b),
        }
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Form-style URL encoding: unreserved bytes pass through, space becomes
/// `+`, everything else becomes `%XX` (uppercase).
///
/// ```
/// assert_eq!(zd_helpers::url::url_encode("a b&c=ü"), "a+b%26c%3D%C3%BC");
/// ```
#[must_use]
pub fn url_encode(s: &str) -> String {
    const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => out.push(b as char),
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(UPPER_HEX[(b >> 4) as usize] as char);
                out.push(UPPER_HEX[(b & 0x0f) as usize] as char);
            },
        }
    }
    out
}

/// Parse `a=1&b=2` into ordered pairs.
///
/// Empty segments are skipped, a key without `=` gets an empty value, and
/// segments that fail to decode are kept raw. A later duplicate key
/// replaces the earlier value in place.
#[must_use]
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for segment in query.split('&').filter(|s| !s.is_empty()) {
        let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
        let key = url_decode(key).unwrap_or_else(|_| key.to_owned());
        if key.is_empty() {
            continue;
        }
        let value = url_decode(value).unwrap_or_else(|_| value.to_owned());
        match pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => pairs.push((key, value)),
        }
    }
    pairs
}

/// Build `a=1&b=2` from pairs, encoding keys and values.
#[must_use]
pub fn build_query<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", url_encode(k.as_ref()), url_encode(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}
