//! Crate-wide error type.
//!
//! Every fallible helper returns [`Result<T>`]. Errors are plain enum
//! variants so callers can match on the failure kind:
//!
//! ```
//! use zd_helpers::{BinaryReader, Error};
//!
//! let mut reader = BinaryReader::new(vec![0x01]);
//! match reader.read_u32() {
//!     Err(Error::OutOfBounds { requested, len, .. }) => {
//!         assert_eq!(requested, 4);
//!         assert_eq!(len, 1);
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::fmt;

/// Shorthand result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all helper operations.
///
/// This enum is marked `#[non_exhaustive]` so new failure kinds can be added
/// without breaking downstream `match` expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A read or seek went past the end of a byte buffer.
    OutOfBounds {
        /// Position the cursor was at (`-1` before the first byte).
        position: i64,
        /// Number of bytes (or target index) requested.
        requested: usize,
        /// Total length of the buffer.
        len: usize,
    },

    /// Input was not valid hex, base64, UTF-8 or similar.
    InvalidEncoding {
        /// Which encoding failed (e.g. "hex", "base64").
        encoding: &'static str,
        /// Decoder message.
        message: String,
    },

    /// JSON input was rejected (too large, too deep, malformed).
    Json(String),

    /// XML input could not be parsed or written.
    Xml(String),

    /// A date string could not be parsed.
    InvalidDate(String),

    /// A cryptographic key is missing or could not be loaded.
    Key(String),

    /// Encryption, decryption or signing failed.
    Crypto(String),

    /// A JWT could not be decoded or verified.
    Jwt(JwtError),
}

/// Failure kinds specific to JWT decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum JwtError {
    /// Token does not have exactly three segments.
    WrongSegmentCount,
    /// Header or payload is not base64url-encoded JSON.
    InvalidSegmentEncoding,
    /// Header has no `alg` field.
    EmptyAlgorithm,
    /// Algorithm is not one of HS256/384/512 or RS256/384/512.
    UnsupportedAlgorithm,
    /// Signature does not match.
    SignatureMismatch,
}

impl Error {
    /// Create an [`Error::InvalidEncoding`].
    #[inline]
    #[must_use]
    pub fn encoding(encoding: &'static str, message: impl fmt::Display) -> Self {
        Self::InvalidEncoding {
            encoding,
            message: message.to_string(),
        }
    }

    /// Create an [`Error::Crypto`] from any displayable cause.
    #[inline]
    #[must_use]
    pub fn crypto(cause: impl fmt::Display) -> Self {
        Self::Crypto(cause.to_string())
    }

    /// Create an [`Error::Key`] from any displayable cause.
    #[inline]
    #[must_use]
    pub fn key(cause: impl fmt::Display) -> Self {
        Self::Key(cause.to_string())
    }

    /// Create an [`Error::Xml`] from any displayable cause.
    #[inline]
    #[must_use]
    pub fn xml(cause: impl fmt::Display) -> Self {
        Self::Xml(cause.to_string())
    }
}

impl fmt::Display for JwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::WrongSegmentCount => "wrong number of segments",
            Self::InvalidSegmentEncoding => "invalid segment encoding",
            Self::EmptyAlgorithm => "empty algorithm",
            Self::UnsupportedAlgorithm => "unsupported or invalid signing algorithm",
            Self::SignatureMismatch => "signature verification failed",
        };
        f.write_str(msg)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                position,
                requested,
                len,
            } => write!(
                f,
                "trying to read too many bytes [{position}+{requested}>{len}]"
            ),
            Self::InvalidEncoding { encoding, message } => {
                write!(f, "invalid {encoding} string: {message}")
            },
            Self::Json(msg) => write!(f, "json error: {msg}"),
            Self::Xml(msg) => write!(f, "xml error: {msg}"),
            Self::InvalidDate(input) => write!(f, "invalid date '{input}'"),
            Self::Key(msg) => write!(f, "key error: {msg}"),
            Self::Crypto(msg) => write!(f, "crypto error: {msg}"),
            Self::Jwt(kind) => write!(f, "jwt error: {kind}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<JwtError> for Error {
    fn from(kind: JwtError) -> Self {
        Self::Jwt(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_message_matches_legacy_wording() {
        let err = Error::OutOfBounds {
            position: 3,
            requested: 8,
            len: 6,
        };
        assert_eq!(err.to_string(), "trying to read too many bytes [3+8>6]");
    }

    #[test]
    fn jwt_error_converts() {
        let err: Error = JwtError::SignatureMismatch.into();
        assert_eq!(err, Error::Jwt(JwtError::SignatureMismatch));
        assert_eq!(err.to_string(), "jwt error: signature verification failed");
    }

    #[test]
    fn encoding_helper_captures_message() {
        let err = Error::encoding("hex", "odd number of digits");
        assert_eq!(err.to_string(), "invalid hex string: odd number of digits");
    }
}
