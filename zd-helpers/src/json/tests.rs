//! All tests for the json module.

use super::*;

fn obj_get<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    match v {
        Value::Object(map) => map.get(key),
        _ => None,
    }
}

// =========================================================================
// PROPTEST PROPERTY TESTS - decoder must never panic
// =========================================================================

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn decode_doesnt_panic_on_arbitrary_bytes(input in prop::collection::vec(any::<u8>(), 0..1024)) {
            let _ = try_decode(&input);
        }

        #[test]
        fn decode_doesnt_panic_on_arbitrary_strings(input in ".*") {
            let _ = decode(&input);
        }

        #[test]
        fn nesting_beyond_limit_is_rejected(depth in 1usize..200) {
            let json = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
            let result = decode(&json);
            if depth > MAX_JSON_DEPTH {
                prop_assert!(result.is_err());
            } else {
                prop_assert!(result.is_ok());
            }
        }

        #[test]
        fn plain_strings_survive_encode_decode(s in "[a-zA-Z0-9 ]{0,100}") {
            let value = obj().with("value", str(&s));
            let back = decode(&encode(&value)).unwrap();
            prop_assert_eq!(obj_get(&back, "value").and_then(as_str), Some(s.as_str()));
        }
    }
}

// =========================================================================
// DECODE
// =========================================================================

#[test]
fn decode_scalars_and_containers() {
    assert!(matches!(decode("null"), Ok(Value::Null)));
    assert!(matches!(decode(" true "), Ok(Value::Bool(true))));
    assert_eq!(decode("42").ok().as_ref().and_then(as_i64), Some(42));
    assert_eq!(decode("-1.5").ok().as_ref().and_then(as_f64), Some(-1.5));
    let v = decode(r#"{"a":[1,2,{"b":"c"}]}"#).unwrap();
    let Some(Value::Array(list)) = obj_get(&v, "a") else {
        panic!("expected array");
    };
    assert_eq!(list.len(), 3);
}

#[test]
fn decode_rejects_trailing_content() {
    assert!(decode(r#"{"a":1}x"#).is_err());
    assert!(decode(r#"[1] [2]"#).is_err());
    assert!(decode("truex").is_err());
    assert!(decode("{\"a\":1}\n\t ").is_ok());
}

#[test]
fn decode_rejects_malformed() {
    for bad in ["", "   ", "{", r#"{"a":}"#, "nul", "'a'"] {
        assert!(decode(bad).is_err(), "{bad:?} should fail");
    }
}

#[test]
fn decode_error_kinds() {
    let deep = format!("{}{}", "[".repeat(MAX_JSON_DEPTH + 1), "]".repeat(MAX_JSON_DEPTH + 1));
    assert!(matches!(decode(&deep), Err(Error::Json(msg)) if msg.contains("nesting")));
    assert!(matches!(decode("[]x"), Err(Error::Json(msg)) if msg.contains("trailing")));
}

#[test]
fn brackets_inside_strings_do_not_count_as_depth() {
    let s = format!(r#"{{"s":"{}"}}"#, "[".repeat(MAX_JSON_DEPTH * 2));
    assert!(decode(&s).is_ok());
}

#[test]
fn try_decode_rejects_invalid_utf8() {
    assert!(try_decode(&[b'"', 0xFF, b'"']).is_none());
    assert!(try_decode(b"[1,2]").is_some());
}

// =========================================================================
// ENCODE
// =========================================================================

#[test]
fn encode_keeps_unicode_unescaped() {
    let v = obj().with("name", str("张三"));
    assert_eq!(encode(&v), r#"{"name":"张三"}"#);
}

#[test]
fn encode_sorts_object_keys() {
    let v = obj().with("b", int(1)).with("a", int(2));
    assert_eq!(encode(&v), r#"{"a":2,"b":1}"#);
}

#[test]
fn encode_escapes_quotes_and_controls() {
    assert_eq!(encode(&str("a\"b\n")), r#""a\"b\n""#);
}

// =========================================================================
// BUILDERS
// =========================================================================

#[test]
fn build_replaces_wrong_container() {
    let v = int(1).with("a", null());
    assert_eq!(encode(&v), r#"{"a":null}"#);
    let v = obj().with_item(bool(false)).with_item(float(0.5));
    assert_eq!(encode(&v), "[false,0.5]");
}

// =========================================================================
// SCALAR HELPERS
// =========================================================================

#[test]
fn as_i64_accepts_integral_floats() {
    assert_eq!(as_i64(&float(3.0)), Some(3));
    assert_eq!(as_i64(&float(f64::INFINITY)), None);
    assert_eq!(as_i64(&Value::Number(Number::U64(u64::MAX))), None);
    assert_eq!(as_i64(&str("3")), None);
}

#[test]
fn emptiness_follows_loose_rules() {
    for v in [null(), bool(false), int(0), float(0.0), str(""), str("0"), arr(), obj()] {
        assert!(is_empty(&v), "{} should be empty", encode(&v));
    }
    for v in [bool(true), int(-1), str(" "), str("a"), arr().with_item(null())] {
        assert!(!is_empty(&v), "{} should not be empty", encode(&v));
    }
}

#[test]
fn plain_string_forms() {
    assert_eq!(to_plain_string(&null()), "");
    assert_eq!(to_plain_string(&bool(true)), "1");
    assert_eq!(to_plain_string(&bool(false)), "");
    assert_eq!(to_plain_string(&float(2.0)), "2");
    assert_eq!(to_plain_string(&float(1.25)), "1.25");
    assert_eq!(to_plain_string(&int(-7)), "-7");
    assert_eq!(to_plain_string(&arr().with_item(int(1))), "[1]");
}

#[test]
fn loose_equality() {
    assert!(loose_eq(&int(1), &str("1")));
    assert!(loose_eq(&str("1.0"), &str("01")));
    assert!(loose_eq(&float(2.0), &int(2)));
    assert!(loose_eq(&null(), &str("")));
    assert!(loose_eq(&null(), &int(0)));
    assert!(loose_eq(&bool(true), &str("x")));
    assert!(loose_eq(&bool(false), &str("0")));
    assert!(!loose_eq(&str("abc"), &int(0)));
    assert!(!loose_eq(&str("a"), &str("b")));
    assert!(!loose_eq(&null(), &str("x")));
}
