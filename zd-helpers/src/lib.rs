// =============================================================================
// CRATE-LEVEL QUALITY LINTS
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
// Pedantic lints - allow stylistic ones that don't affect correctness
#![allow(clippy::doc_markdown)] // Code in docs - extensive changes needed
#![allow(clippy::must_use_candidate)] // Not all returned values need must_use
#![allow(clippy::return_self_not_must_use)] // Builder pattern returns Self
#![allow(clippy::cast_possible_truncation)] // Byte and digit arithmetic
#![allow(clippy::cast_sign_loss)] // Byte and digit arithmetic
#![allow(clippy::cast_possible_wrap)] // Byte and digit arithmetic
#![allow(clippy::cast_precision_loss)] // Sizes and timestamps as f64
#![allow(clippy::unreadable_literal)] // Timestamps don't need separators
#![allow(clippy::items_after_statements)] // Const in functions for locality
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy
#![allow(clippy::match_same_arms)] // Intentional for clarity
#![allow(clippy::format_push_string)] // String building style
#![allow(clippy::format_collect)]
// Iterator to string style
// Internal implementation where bounds/values are known at compile time or checked
#![allow(clippy::indexing_slicing)] // Fixed-size buffers and checked lengths
#![allow(clippy::unwrap_used)] // Used after explicit checks or with known values
#![allow(clippy::expect_used)] // Static regexes and the system RNG

//! zd-helpers - Helpers for web application back ends
//!
//! # Overview
//!
//! A grab bag of the small utilities a web framework leans on: dot-notation
//! access into JSON-like trees, string and HTML munging, date formatting,
//! XML and JSON conversion, parent/child tree walks, and a handful of
//! cipher wrappers with JWT on top. A byte cursor ([`BinaryReader`]) covers
//! hand-written binary parsers.
//!
//! Every tree-shaped helper works on [`json::Value`] (miniserde), so data
//! moves between modules without conversion.
//!
//! # Modules
//!
//! | Module             | What it does                                            |
//! |--------------------|---------------------------------------------------------|
//! | [`arr`]            | Dot-notation get/set/forget, merge, pluck, column       |
//! | [`binary_reader`]  | Cursor over bytes with typed, bounds-checked reads      |
//! | [`mod@str`]        | Case conversion, explode, substr, random strings        |
//! | [`url`]            | Percent encoding and query strings                      |
//! | [`random`]         | OS-backed random bytes, ranges, UUIDs                   |
//! | [`time`]           | Date formatting, `time_ago`, week and month bounds      |
//! | [`html`]           | Compress, strip tags, text/HTML conversion              |
//! | [`xml`]            | XML to and from [`json::Value`]                         |
//! | [`json`]           | Guarded JSON parsing, encoding, value builders          |
//! | [`tree`]           | Children and ancestors in flat parent-id rows           |
//! | [`disk`]           | Human file sizes and path arithmetic                    |
//! | [`security`]       | AES, legacy DES, RC4, timestamp scrambler, RSA, JWT     |
//! | [`config`]         | Defaults read from `ZD_*` environment variables         |
//!
//! # Quick Start
//!
//! ```
//! use zd_helpers::prelude::*;
//!
//! let mut data = json::decode(r#"{"user":{"name":"ada"}}"#).unwrap();
//! arr::set(&mut data, "user.roles", json::arr().with_item(json::str("admin")));
//! assert_eq!(
//!     json::encode(&data),
//!     r#"{"user":{"name":"ada","roles":["admin"]}}"#
//! );
//!
//! let jwt = Jwt::default().with_secret("s3cret");
//! let token = jwt.encode(&data).unwrap();
//! assert_eq!(json::encode(&jwt.decode(&token).unwrap()), json::encode(&data));
//!
//! let mut reader = BinaryReader::new(vec![0x00, 0x2a]);
//! assert_eq!(reader.read_u16().unwrap(), 42);
//! ```

pub mod arr;
pub mod binary_reader;
pub mod config;
pub mod constants;
pub mod disk;
pub mod env;
pub mod error;
pub mod html;
pub mod json;
pub mod log;
pub mod random;
pub mod security;
pub mod str;
pub mod time;
pub mod tree;
pub mod url;
pub mod xml;

pub use binary_reader::BinaryReader;
pub use config::Config;
pub use error::{Error, JwtError, Result};

/// Prelude module for convenient imports.
///
/// ```
/// use zd_helpers::prelude::*;
/// ```
///
/// This imports the helper modules by name ([`arr`], [`html`], [`json`],
/// [`mod@str`], [`time`], [`xml`], ...) plus the types most callers touch:
/// [`BinaryReader`], [`Cipher`], [`Jwt`], [`Config`] and the crate
/// [`Error`].
///
/// [`arr`]: crate::arr
/// [`html`]: crate::html
/// [`json`]: crate::json
/// [`mod@str`]: crate::str
/// [`time`]: crate::time
/// [`xml`]: crate::xml
/// [`BinaryReader`]: crate::BinaryReader
/// [`Cipher`]: crate::security::Cipher
/// [`Jwt`]: crate::security::Jwt
/// [`Config`]: crate::Config
/// [`Error`]: crate::Error
pub mod prelude {
    pub use crate::json::{Build, Value};
    pub use crate::security::{Aes, Algorithm, Cipher, Encrypt, Encryptor, Jwt, Rsa};
    pub use crate::{BinaryReader, Config, Error, JwtError};
    pub use crate::{arr, disk, env, html, json, log, random, str, time, tree, url, xml};
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
