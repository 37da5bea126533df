//! Constructor functions for building JSON values.

use miniserde::json::{Array, Number, Object, Value};

/// Create an empty object `{}`.
#[must_use]
pub fn obj() -> Value {
    Value::Object(Object::new())
}

/// Create an empty array `[]`.
#[must_use]
pub fn arr() -> Value {
    Value::Array(Array::new())
}

/// Create a string value.
#[must_use]
pub fn str<S: AsRef<str>>(value: S) -> Value {
    Value::String(value.as_ref().to_string())
}

/// Create an integer value.
#[must_use]
pub const fn int(value: i64) -> Value {
    Value::Number(Number::I64(value))
}

/// Create a float value.
#[must_use]
pub const fn float(value: f64) -> Value {
    Value::Number(Number::F64(value))
}

/// Create a boolean value.
#[must_use]
pub const fn bool(value: bool) -> Value {
    Value::Bool(value)
}

/// Create a null value.
#[must_use]
pub const fn null() -> Value {
    Value::Null
}

/// Chainable building on top of a raw [`Value`].
///
/// ```
/// use zd_helpers::json::{self, Build};
///
/// let user = json::obj().with("id", json::int(7)).with("name", json::str("Ann"));
/// assert_eq!(json::encode(&user), r#"{"id":7,"name":"Ann"}"#);
/// ```
pub trait Build: Sized {
    /// Set `key` on an object. Non-objects are replaced by a fresh object.
    fn with(self, key: &str, value: Value) -> Self;

    /// Append to an array. Non-arrays are replaced by a fresh array.
    fn with_item(self, value: Value) -> Self;
}

impl Build for Value {
    fn with(self, key: &str, value: Value) -> Self {
        let mut map = match self {
            Self::Object(map) => map,
            _ => Object::new(),
        };
        map.insert(key.to_string(), value);
        Self::Object(map)
    }

    fn with_item(self, value: Value) -> Self {
        let mut list = match self {
            Self::Array(list) => list,
            _ => Array::new(),
        };
        list.push(value);
        Self::Array(list)
    }
}
