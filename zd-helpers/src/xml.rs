//! XML to and from JSON values.
//!
//! Element trees map onto [`Value`] with a few reserved keys:
//!
//! | Key           | Meaning                                    |
//! |---------------|--------------------------------------------|
//! | `@attributes` | Object of attribute name → value           |
//! | `@value`      | Text content of an element with attributes |
//! | `@cdata`      | Content written as a CDATA section         |
//!
//! A list under key `k` repeats the `<k>` element once per item.
//!
//! ```
//! use zd_helpers::{json, xml};
//!
//! let doc = json::decode(r#"{"user":{"@attributes":{"id":7},"@value":"zd"}}"#).unwrap();
//! let out = xml::encode(&doc, "root").unwrap();
//! assert_eq!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root><user id=\"7\">zd</user></root>");
//!
//! let back = xml::decode(&out).unwrap();
//! assert_eq!(json::encode(&back), r#"{"root":{"user":{"@attributes":{"id":"7"},"@value":"zd"}}}"#);
//! ```

use std::collections::BTreeMap;

use miniserde::json::{Array, Object, Value};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Error, Result};
use crate::json;

const ATTRIBUTES: &str = "@attributes";
const VALUE: &str = "@value";
const CDATA: &str = "@cdata";

// ============================================================================
// Encoding
// ============================================================================

/// Serialize `value` as a document whose root element is `root`.
///
/// Scalars become text (`true`/`false` for booleans), `null` an empty
/// element. Keys must be valid element names.
pub fn encode(value: &Value, root: &str) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(Error::xml)?;
    writer.get_mut().push(b'\n');
    write_element(&mut writer, root, value)?;
    String::from_utf8(writer.into_inner()).map_err(Error::xml)
}

/// Like [`encode`], with every string wrapped in CDATA and `null` fields
/// dropped. This is the shape WeChat-style message APIs expect.
///
/// ```
/// use zd_helpers::{json, xml};
///
/// let msg = json::decode(r#"{"Content":"<hi>","MsgId":null}"#).unwrap();
/// let out = xml::special_encode(&msg, "xml").unwrap();
/// assert!(out.ends_with("<xml><Content><![CDATA[<hi>]]></Content></xml>"));
/// ```
pub fn special_encode(value: &Value, root: &str) -> Result<String> {
    encode(&to_special(value), root)
}

fn to_special(value: &Value) -> Value {
    match value {
        Value::String(_) => {
            let mut obj = Object::new();
            obj.insert(CDATA.to_owned(), value.clone());
            Value::Object(obj)
        },
        Value::Array(items) => {
            let mut out = Array::new();
            for item in items.iter().filter(|v| !json::is_null(v)) {
                out.push(to_special(item));
            }
            Value::Array(out)
        },
        Value::Object(map) => {
            let mut out = Object::new();
            for (key, item) in map.iter().filter(|(_, v)| !json::is_null(v)) {
                let item = if key.starts_with('@') {
                    item.clone()
                } else {
                    to_special(item)
                };
                out.insert(key.clone(), item);
            }
            Value::Object(out)
        },
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<()> {
    check_name(name)?;
    let mut start = BytesStart::new(name);

    let Value::Object(map) = value else {
        return match value {
            Value::Null => write_empty(writer, start),
            Value::Array(items) if items.is_empty() => write_empty(writer, start),
            // a list directly inside a list has no element name to repeat
            Value::Array(_) => Err(illegal_name("0")),
            _ => write_text(writer, start, name, &scalar_text(value)),
        };
    };

    if let Some(Value::Object(attrs)) = map.get(ATTRIBUTES) {
        for (key, attr) in attrs.iter() {
            check_name(key)?;
            start.push_attribute((key.as_str(), scalar_text(attr).as_str()));
        }
    }

    if let Some(text) = map.get(VALUE) {
        return write_text(writer, start, name, &scalar_text(text));
    }
    if let Some(cdata) = map.get(CDATA) {
        writer.write_event(Event::Start(start)).map_err(Error::xml)?;
        write_cdata(writer, &scalar_text(cdata))?;
        return writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(Error::xml);
    }

    let mut children = map.iter().filter(|(key, _)| !key.starts_with('@')).peekable();
    if children.peek().is_none() {
        return write_empty(writer, start);
    }
    writer.write_event(Event::Start(start)).map_err(Error::xml)?;
    for (key, child) in children {
        match child {
            Value::Array(items) if !items.is_empty() => {
                for item in items.iter() {
                    write_element(writer, key, item)?;
                }
            },
            _ => write_element(writer, key, child)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(Error::xml)
}

fn write_empty(writer: &mut Writer<Vec<u8>>, start: BytesStart<'_>) -> Result<()> {
    writer.write_event(Event::Empty(start)).map_err(Error::xml)
}

fn write_text(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart<'_>,
    name: &str,
    text: &str,
) -> Result<()> {
    if text.is_empty() {
        return write_empty(writer, start);
    }
    writer.write_event(Event::Start(start)).map_err(Error::xml)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(Error::xml)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(Error::xml)
}

/// Write `text` as CDATA, splitting around any `]]>` it contains.
fn write_cdata(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<()> {
    let parts: Vec<&str> = text.split("]]>").collect();
    let last = parts.len() - 1;
    for (i, part) in parts.iter().enumerate() {
        let mut piece = String::with_capacity(part.len() + 3);
        if i > 0 {
            piece.push('>');
        }
        piece.push_str(part);
        if i < last {
            piece.push_str("]]");
        }
        writer
            .write_event(Event::CData(BytesCData::new(piece)))
            .map_err(Error::xml)?;
    }
    Ok(())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Bool(true) => "true".to_owned(),
        Value::Bool(false) => "false".to_owned(),
        other => json::to_plain_string(other),
    }
}

/// Element and attribute names: a letter, `_` or `:` followed by letters,
/// digits, `-`, `_`, `.` or `:`.
fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == ':');
    if valid_start && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')) {
        Ok(())
    } else {
        Err(illegal_name(name))
    }
}

fn illegal_name(name: &str) -> Error {
    Error::xml(format!("illegal character in tag name: {name:?}"))
}

// ============================================================================
// Decoding
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Keep `@value`/`@cdata` apart, key the result by the root name.
    Full,
    /// Fold CDATA into text, return the root's content.
    Special,
}

struct Frame {
    name: String,
    attributes: Option<Object>,
    children: BTreeMap<String, Vec<Value>>,
    text: String,
    cdata: String,
}

impl Frame {
    fn open(e: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let mut attributes = None;
        for attr in e.attributes() {
            let attr = attr.map_err(Error::xml)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(Error::xml)?.into_owned();
            attributes
                .get_or_insert_with(Object::new)
                .insert(key, Value::String(value));
        }
        Ok(Self {
            name,
            attributes,
            children: BTreeMap::new(),
            text: String::new(),
            cdata: String::new(),
        })
    }

    fn finish(self, mode: Mode) -> (String, Value) {
        let text = self.text.trim();
        let cdata = self.cdata.trim();
        let mut obj = Object::new();

        if self.children.is_empty() && cdata.is_empty() {
            let Some(attrs) = self.attributes else {
                let leaf = if mode == Mode::Special && text.is_empty() {
                    Value::Array(Array::new())
                } else {
                    Value::String(text.to_owned())
                };
                return (self.name, leaf);
            };
            obj.insert(VALUE.to_owned(), Value::String(text.to_owned()));
            obj.insert(ATTRIBUTES.to_owned(), Value::Object(attrs));
            return (self.name, Value::Object(obj));
        }

        for (name, mut values) in self.children {
            let value = if values.len() == 1 {
                values.remove(0)
            } else {
                let mut list = Array::new();
                list.extend(values);
                Value::Array(list)
            };
            obj.insert(name, value);
        }
        if mode == Mode::Full {
            if !text.is_empty() {
                obj.insert(VALUE.to_owned(), Value::String(text.to_owned()));
            }
            if !cdata.is_empty() {
                obj.insert(CDATA.to_owned(), Value::String(cdata.to_owned()));
            }
        }
        if let Some(attrs) = self.attributes {
            obj.insert(ATTRIBUTES.to_owned(), Value::Object(attrs));
        }
        (self.name, Value::Object(obj))
    }
}

/// Parse a document into `{root_name: content}`.
///
/// Text-only elements become strings. Elements with attributes, children or
/// CDATA become objects. Repeated child elements collect into a list. All
/// text is trimmed and kept as strings.
pub fn decode(xml: &str) -> Result<Value> {
    let (name, content) = parse(xml, Mode::Full)?;
    let mut obj = Object::new();
    obj.insert(name, content);
    Ok(Value::Object(obj))
}

/// Parse a document into the root element's content, reading CDATA as
/// plain text. Empty elements become empty lists.
///
/// ```
/// use zd_helpers::{json, xml};
///
/// let msg = xml::special_decode("<xml><Content><![CDATA[hi]]></Content><Id>9</Id></xml>").unwrap();
/// assert_eq!(json::encode(&msg), r#"{"Content":"hi","Id":"9"}"#);
/// ```
pub fn special_decode(xml: &str) -> Result<Value> {
    parse(xml, Mode::Special).map(|(_, content)| content)
}

fn parse(xml: &str, mode: Mode) -> Result<(String, Value)> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        let event = reader.read_event().map_err(|err| {
            Error::xml(format!("{err} at position {}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(Error::xml("multiple root elements"));
                }
                stack.push(Frame::open(&e)?);
            },
            Event::Empty(e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(Error::xml("multiple root elements"));
                }
                let done = Frame::open(&e)?.finish(mode);
                attach(&mut stack, &mut root, done);
            },
            Event::End(_) => {
                if let Some(frame) = stack.pop() {
                    let done = frame.finish(mode);
                    attach(&mut stack, &mut root, done);
                }
            },
            Event::Text(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&e.unescape().map_err(Error::xml)?);
                }
            },
            Event::CData(e) => {
                if let Some(frame) = stack.last_mut() {
                    let content = String::from_utf8_lossy(&e);
                    match mode {
                        Mode::Full => frame.cdata.push_str(&content),
                        Mode::Special => frame.text.push_str(&content),
                    }
                }
            },
            Event::Eof => break,
            _ => {},
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::xml(format!("unclosed element <{}>", open.name)));
    }
    root.ok_or_else(|| Error::xml("no root element"))
}

fn attach(stack: &mut [Frame], root: &mut Option<(String, Value)>, (name, value): (String, Value)) {
    match stack.last_mut() {
        Some(parent) => parent.children.entry(name).or_default().push(value),
        None => *root = Some((name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECL: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

    fn v(text: &str) -> Value {
        json::decode(text).unwrap()
    }

    fn body(xml: &str) -> &str {
        xml.strip_prefix(DECL).unwrap()
    }

    #[test]
    fn encode_scalars_lists_and_attributes() {
        let doc = v(r#"{"name":"zd","tags":["a","b"],"meta":{"@attributes":{"id":7,"on":true},"@value":"x"},"empty":null,"ok":true,"n":1.5}"#);
        let out = encode(&doc, "root").unwrap();
        insta::assert_snapshot!(
            body(&out),
            @r#"<root><empty/><meta id="7" on="true">x</meta><n>1.5</n><name>zd</name><ok>true</ok><tags>a</tags><tags>b</tags></root>"#
        );
    }

    #[test]
    fn encode_escapes_text_and_cdata_split() {
        let doc = v(r#"{"t":"a < b & c","c":{"@cdata":"x]]>y"}}"#);
        let out = encode(&doc, "r").unwrap();
        insta::assert_snapshot!(
            body(&out),
            @"<r><c><![CDATA[x]]]]><![CDATA[>y]]></c><t>a &lt; b &amp; c</t></r>"
        );
    }

    #[test]
    fn encode_empty_containers() {
        assert_eq!(body(&encode(&v("{}"), "root").unwrap()), "<root/>");
        assert_eq!(body(&encode(&v(r#"{"a":[]}"#), "root").unwrap()), "<root><a/></root>");
        assert_eq!(body(&encode(&Value::Null, "x").unwrap()), "<x/>");
    }

    #[test]
    fn encode_rejects_bad_names() {
        assert!(matches!(encode(&v(r#"{"1bad":1}"#), "root"), Err(Error::Xml(_))));
        assert!(matches!(encode(&v(r#"{"a b":1}"#), "root"), Err(Error::Xml(_))));
        assert!(matches!(encode(&v(r#"{"a":[[1]]}"#), "root"), Err(Error::Xml(_))));
        assert!(matches!(encode(&v("{}"), ""), Err(Error::Xml(_))));
    }

    #[test]
    fn special_encode_wraps_strings() {
        let doc = v(r#"{"ToUserName":"gh","CreateTime":1348831860,"Articles":{"item":[{"Title":"t"}]},"Skip":null}"#);
        let out = special_encode(&doc, "xml").unwrap();
        insta::assert_snapshot!(
            body(&out),
            @"<xml><Articles><item><Title><![CDATA[t]]></Title></item></Articles><CreateTime>1348831860</CreateTime><ToUserName><![CDATA[gh]]></ToUserName></xml>"
        );
    }

    #[test]
    fn special_encode_keeps_reserved_keys() {
        let doc = v(r#"{"a":{"@attributes":{"k":"v"},"@value":"raw"}}"#);
        let out = special_encode(&doc, "xml").unwrap();
        assert_eq!(body(&out), r#"<xml><a k="v">raw</a></xml>"#);
    }

    #[test]
    fn decode_full_document() {
        let xml = r#"<?xml version="1.0"?>
<root lang="en">
  <item id="1">a</item>
  <item id="2">b</item>
  <title>Hi &amp; bye</title>
  <body><![CDATA[<p>x</p>]]></body>
  note
</root>"#;
        insta::assert_snapshot!(
            json::encode(&decode(xml).unwrap()),
            @r#"{"root":{"@attributes":{"lang":"en"},"@value":"note","body":{"@cdata":"<p>x</p>"},"item":[{"@attributes":{"id":"1"},"@value":"a"},{"@attributes":{"id":"2"},"@value":"b"}],"title":"Hi & bye"}}"#
        );
    }

    #[test]
    fn decode_empty_and_self_closing() {
        assert_eq!(json::encode(&decode("<a/>").unwrap()), r#"{"a":""}"#);
        assert_eq!(
            json::encode(&decode("<a><b/><c></c></a>").unwrap()),
            r#"{"a":{"b":"","c":""}}"#
        );
    }

    #[test]
    fn decode_errors() {
        assert!(matches!(decode(""), Err(Error::Xml(_))));
        assert!(matches!(decode("<a><b></a>"), Err(Error::Xml(_))));
        assert!(matches!(decode("<a>"), Err(Error::Xml(_))));
        assert!(matches!(decode("<a/><b/>"), Err(Error::Xml(_))));
    }

    #[test]
    fn special_decode_wechat_message() {
        let xml = "<xml><ToUserName><![CDATA[gh_1]]></ToUserName><CreateTime>1348831860</CreateTime>\
                   <MsgType><![CDATA[text]]></MsgType><Empty></Empty><Pic><Url>u1</Url><Url>u2</Url></Pic></xml>";
        insta::assert_snapshot!(
            json::encode(&special_decode(xml).unwrap()),
            @r#"{"CreateTime":"1348831860","Empty":[],"MsgType":"text","Pic":{"Url":["u1","u2"]},"ToUserName":"gh_1"}"#
        );
    }

    #[test]
    fn special_round_trip() {
        let doc = v(r#"{"Content":"a & b","FromUserName":"o_1"}"#);
        let out = special_encode(&doc, "xml").unwrap();
        assert_eq!(json::encode(&special_decode(&out).unwrap()), json::encode(&doc));
    }
}
