//! HTML escaping, tag stripping, whitespace compression and text conversion.
//!
//! ```
//! use zd_helpers::html;
//!
//! assert_eq!(html::escape("<b>\"R&D\"</b>"), "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt;");
//! assert_eq!(html::strip_tags("<p>Hello <em>world</em></p>"), "Hello world");
//! assert_eq!(html::from_text("a\n\nb", false), "<p>a</p><p></p><p>b</p>");
//! assert_eq!(html::to_text("<p>one</p><p>two &amp; three</p>"), "\none\n\ntwo & three\n");
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::str::substr;

/// Four non-breaking spaces prefixed to each paragraph by [`from_text`].
const PARAGRAPH_INDENT: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

/// Build a regex from a pattern literal known to be valid.
macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("static regex"));
    };
}

static_regex!(WS_AFTER_TAG, r">[^\S ]+");
static_regex!(WS_BEFORE_TAG, r"[^\S ]+<");
static_regex!(WS_RUN, r"(\s)+");
static_regex!(COMMENT, r"(?s)<!--.*?-->");
static_regex!(TEXT_BETWEEN_TAGS, r"> *([^ ]*) *<");
static_regex!(BLOCK_COMMENT, r"/\*[^*]*\*/");
static_regex!(LINE_BREAKS, r"\r\n|\n|\t");
static_regex!(SPACE_BETWEEN_TAGS, r">[ ]+<");
static_regex!(ANY_TAG, r"<(.*?)>");
static_regex!(TAG_OR_NBSP, r"(<.+?>)|(&nbsp;)+");
static_regex!(STYLE_BLOCK, r"(?is)<style\b.*?</style>");
static_regex!(SCRIPT_BLOCK, r"(?is)<script\b.*?</script>");
static_regex!(LINE_TAG, r"(?i)<br\s*/?>|</?(?:p|div|li)>");
static_regex!(DROPPED_TAG, r"(?i)</?(?:td|blockquote)>");
static_regex!(TYPOGRAPHIC, r"(?i)&(nbsp|ldquo|rdquo|lsquo|rsquo);?");
static_regex!(NUMERIC_LEFTOVER, r"&#.*?;");

/// Compress markup by collapsing whitespace.
///
/// With `has_js`, whitespace next to tags is stripped, runs of whitespace
/// shrink to their first character and comments are removed. Without it, a
/// harsher pass drops every line break, tab and `/* */` block, which breaks
/// inline scripts relying on newlines.
///
/// ```
/// use zd_helpers::html::compress;
///
/// assert_eq!(compress("<div>\n  <p>a   b</p>\n</div>", true), "<div> <p>a b</p></div>");
/// assert_eq!(compress("<div>\n\t<p> a </p>\n</div>", false), "<div><p>a</p></div>");
/// ```
#[must_use]
pub fn compress(html: &str, has_js: bool) -> String {
    let out = if has_js {
        let s = WS_AFTER_TAG.replace_all(html, ">");
        let s = WS_BEFORE_TAG.replace_all(&s, "<");
        let s = WS_RUN.replace_all(&s, "${1}");
        COMMENT.replace_all(&s, "").into_owned()
    } else {
        let s = TEXT_BETWEEN_TAGS.replace_all(html, ">${1}<");
        let s = BLOCK_COMMENT.replace_all(&s, "");
        let s = LINE_BREAKS.replace_all(&s, "");
        SPACE_BETWEEN_TAGS.replace_all(&s, "><").into_owned()
    };
    out.trim().to_owned()
}

/// Decode special characters, then drop every `<...>` tag.
#[must_use]
pub fn filter_html(content: &str) -> String {
    ANY_TAG
        .replace_all(&decode_special_chars(content), "")
        .into_owned()
}

/// Plain-text preview of at most `length` characters.
///
/// Tags and `&nbsp;` runs are removed before truncating.
#[must_use]
pub fn short_string(content: &str, length: usize) -> String {
    let decoded = decode_special_chars(content);
    let plain = TAG_OR_NBSP.replace_all(&decoded, "");
    substr(&plain, 0, length, false)
}

/// Escape `html` for display, truncating to `length` chars (with `…`) when
/// `length > 0`. `None` and empty input give an empty string.
///
/// ```
/// use zd_helpers::html::text;
///
/// assert_eq!(text(Some("<i>hi</i>"), 0), "&lt;i&gt;hi&lt;/i&gt;");
/// assert_eq!(text(Some("abcdef"), 3), "abc…");
/// assert_eq!(text(None, 3), "");
/// ```
#[must_use]
pub fn text(html: Option<&str>, length: usize) -> String {
    let Some(html) = html.filter(|h| !h.is_empty()) else {
        return String::new();
    };
    let escaped = escape(html);
    if length > 0 {
        substr(&escaped, 0, length, true)
    } else {
        escaped
    }
}

/// Wrap each line of `content` in `<p>`, optionally indenting non-empty
/// lines with four `&nbsp;`.
#[must_use]
pub fn from_text(content: &str, line_space: bool) -> String {
    let indent = if line_space { PARAGRAPH_INDENT } else { "" };
    content
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                "<p></p>".to_owned()
            } else {
                format!("<p>{indent}{line}</p>")
            }
        })
        .collect()
}

/// Convert markup to plain text.
///
/// `style` and `script` blocks are removed, `<br>`, `<p>`, `<div>` and
/// `<li>` become line breaks, the remaining tags are stripped and entities
/// decoded. Numeric references that survive decoding are dropped.
#[must_use]
pub fn to_text(html: &str) -> String {
    let s = STYLE_BLOCK.replace_all(html, "");
    let s = SCRIPT_BLOCK.replace_all(&s, "");
    let s = LINE_TAG.replace_all(&s, "\n");
    let s = DROPPED_TAG.replace_all(&s, "");
    let s = TYPOGRAPHIC.replace_all(&s, |caps: &regex::Captures<'_>| {
        match caps[1].to_ascii_lowercase().as_str() {
            "nbsp" => " ",
            "ldquo" | "rdquo" => "\"",
            _ => "'",
        }
    });
    let s = decode_entities(&strip_tags(&s));
    NUMERIC_LEFTOVER.replace_all(&s, "").into_owned()
}

// ============================================================================
// Escaping
// ============================================================================

/// Escape `&`, `<`, `>`, `"` and `'`.
#[must_use]
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// Reverse [`escape`]. Other entities are left untouched.
#[must_use]
pub fn decode_special_chars(s: &str) -> String {
    decode_with(s, |name| match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "#039" | "#39" | "#x27" | "apos" => Some('\''),
        _ => None,
    })
}

/// Decode named (common HTML set) and numeric character references.
///
/// ```
/// use zd_helpers::html::decode_entities;
///
/// assert_eq!(decode_entities("&copy; 2025 &#8220;x&#x201D; &bogus;"), "© 2025 \u{201c}x\u{201d} &bogus;");
/// ```
#[must_use]
pub fn decode_entities(s: &str) -> String {
    decode_with(s, |name| {
        if let Some(num) = name.strip_prefix('#') {
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse().ok()?,
            };
            return char::from_u32(code);
        }
        named_entity(name)
    })
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        "middot" => '·',
        "bull" => '•',
        "laquo" => '«',
        "raquo" => '»',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "times" => '×',
        "divide" => '÷',
        "deg" => '°',
        "yen" => '¥',
        "euro" => '€',
        "pound" => '£',
        "cent" => '¢',
        "sect" => '§',
        "para" => '¶',
        "plusmn" => '±',
        _ => return None,
    })
}

/// Replace `&name;` references that `lookup` resolves.
fn decode_with(s: &str, lookup: impl Fn(&str) -> Option<char>) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        // names are short; a far-off `;` belongs to something else
        let decoded = tail
            .char_indices()
            .take(12)
            .find(|(_, c)| *c == ';')
            .and_then(|(semi, _)| lookup(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            },
            None => {
                out.push('&');
                rest = &tail[1..];
            },
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// Tag stripping
// ============================================================================

/// Remove tags, comments and processing instructions.
///
/// A `<` that cannot open a tag (followed by a space, digit or end of input)
/// is kept as text. Quoted attribute values may contain `>`.
#[must_use]
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let tail = &rest[lt..];
        let opens_tag = tail[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));
        if !opens_tag {
            out.push('<');
            rest = &tail[1..];
            continue;
        }
        if let Some(body) = tail.strip_prefix("<!--") {
            rest = body.find("-->").map_or("", |end| &body[end + 3..]);
            continue;
        }
        rest = tag_end(tail).map_or("", |end| &tail[end..]);
    }
    out.push_str(rest);
    out
}

/// Byte offset just past the `>` closing the tag at the start of `tag`.
fn tag_end(tag: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in tag.char_indices().skip(1) {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return Some(i + 1),
            _ => {},
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_with_js() {
        let html = "<html>\n  <!-- nav -->\n  <body>\n\t<p>Hello   <b>there</b></p>\n  </body>\n</html>\n";
        insta::assert_snapshot!(compress(html, true), @"<html>  <body><p>Hello <b>there</b></p> </body></html>");
    }

    #[test]
    fn compress_without_js() {
        let html = "<ul>\r\n  <li> one </li>\n\t<li>two</li>\n</ul>/* note */";
        insta::assert_snapshot!(compress(html, false), @"<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn compress_leaves_text_split_by_line_breaks() {
        // line breaks are dropped after tag spacing is collapsed
        assert_eq!(compress("<b>\n x \n</b>", false), "<b> x </b>");
        assert_eq!(compress("<i>\r\n y</i>", false), "<i> y</i>");
    }

    #[test]
    fn compress_keeps_text_spacing() {
        assert_eq!(compress("  <a>x y</a>  ", true), "<a>x y</a>");
    }

    #[test]
    fn filter_html_decodes_first() {
        assert_eq!(filter_html("&lt;b&gt;bold&lt;/b&gt; <i>it</i>"), "bold it");
    }

    #[test]
    fn short_string_strips_and_truncates() {
        assert_eq!(short_string("<p>&nbsp;&nbsp;Hello</p> world", 7), "Hello w");
        assert_eq!(short_string("<b>short</b>", 100), "short");
    }

    #[test]
    fn text_escapes_then_truncates() {
        assert_eq!(text(Some("a<b"), 2), "a&…");
        assert_eq!(text(Some(""), 0), "");
    }

    #[test]
    fn from_text_indents() {
        insta::assert_snapshot!(
            from_text("line one\n\nline two", true),
            @"<p>&nbsp;&nbsp;&nbsp;&nbsp;line one</p><p></p><p>&nbsp;&nbsp;&nbsp;&nbsp;line two</p>"
        );
    }

    #[test]
    fn to_text_strips_blocks_and_entities() {
        let html = r#"<style type="text/css">p{color:red}</style><div>&ldquo;Hi&rdquo;&nbsp;there</div><script type="x">alert(1)</script><table><tr><td>cell</td></tr></table>&#128512;&#xZZ;"#;
        assert_eq!(to_text(html), "\n\"Hi\" there\ncell\u{1f600}");
    }

    #[test]
    fn to_text_line_breaks() {
        assert_eq!(to_text("a<br/>b<BR >c<li>d</li>"), "a\nb\nc\nd\n");
    }

    #[test]
    fn escape_and_decode_special_chars() {
        let raw = r#"<a href="x">Tom's & Jerry</a>"#;
        let escaped = escape(raw);
        assert_eq!(
            escaped,
            "&lt;a href=&quot;x&quot;&gt;Tom&#039;s &amp; Jerry&lt;/a&gt;"
        );
        assert_eq!(decode_special_chars(&escaped), raw);
        assert_eq!(decode_special_chars("&copy; &amp;lt;"), "&copy; &lt;");
    }

    #[test]
    fn decode_entities_cases() {
        assert_eq!(decode_entities("&lt;&gt;&amp;&quot;&apos;"), "<>&\"'");
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("&nbsp;"), "\u{a0}");
        assert_eq!(decode_entities("a & b; c"), "a & b; c");
        assert_eq!(decode_entities("&#1114112;"), "&#1114112;");
        assert_eq!(decode_entities("tail &"), "tail &");
    }

    #[test]
    fn strip_tags_cases() {
        assert_eq!(strip_tags("<p class=\"a>b\">x</p>"), "x");
        assert_eq!(strip_tags("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
        assert_eq!(strip_tags("a<!-- <b>c</b> -->d"), "ad");
        assert_eq!(strip_tags("<?xml version=\"1.0\"?><r>t</r>"), "t");
        assert_eq!(strip_tags("open <b unterminated"), "open ");
        assert_eq!(strip_tags("中<br/>文"), "中文");
    }
}
