//! Content normalizer: turns raw upstream bodies into plain values.
//!
//! Three input families are handled:
//!
//! | Input | Entry points |
//! |-------|--------------|
//! | JSON | [`parse_json`], [`str_at`], [`u64_at`], [`strings_at`] |
//! | HTML | [`html_to_text`], [`strip_tags`], [`body_text`] |
//! | XML (Atom, PubMed) | [`xml_blocks`], [`xml_text`], [`xml_texts`], [`xml_attr`] |
//!
//! Lookups of absent or ill-typed fields yield `None`/empty; only a body that
//! cannot be read at all becomes a `parse_error`.

use regex::Regex;
use scout_domain::{Failure, RawResponse};
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

/// Tags whose entire subtree is ignored when extracting text
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "svg", "head", "template"];

/// Tags that start a new line
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "h1", "h2", "h3", "h4", "h5", "h6", "li", "tr", "section", "article",
    "header", "footer", "blockquote", "table", "ul", "ol", "hr",
];

/// Inline tags whose neighbours need a separating space
const CELL_TAGS: &[&str] = &["td", "th", "dt", "dd"];

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Per-tag XML patterns, compiled once; the tag set is fixed by the adapters.
static XML_PATTERNS: LazyLock<Mutex<HashMap<String, Regex>>> = LazyLock::new(Default::default);

// ==================== JSON ====================

/// Parse a response body as JSON.
pub fn parse_json(response: &RawResponse) -> Result<Value, Failure> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Err(Failure::parse_error("Expected JSON but the response body was empty"));
    }
    serde_json::from_slice(&response.body)
        .map_err(|e| Failure::parse_error(format!("Invalid JSON in response: {}", e)))
}

/// String at a JSON pointer (e.g. `/content_urls/desktop/page`).
pub fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

/// Unsigned integer at a JSON pointer. Numeric strings are accepted.
pub fn u64_at(value: &Value, pointer: &str) -> Option<u64> {
    match value.pointer(pointer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Array of strings at a JSON pointer; non-string elements are skipped.
pub fn strings_at(value: &Value, pointer: &str) -> Vec<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Array at a JSON pointer, or an empty slice.
pub fn array_at<'a>(value: &'a Value, pointer: &str) -> &'a [Value] {
    value
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// First `n` characters of a date/time string (e.g. `2024-01-31T...` → `2024-01-31`).
pub fn date_prefix(value: &str) -> String {
    value.chars().take(10).collect()
}

// ==================== HTML ====================

/// Extract readable text from an HTML document.
///
/// Script, style and other non-content subtrees are dropped, block elements
/// start new lines, `<pre>` keeps its whitespace, and runs of blank lines
/// fold to a single empty line.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    // Use <body> when present, fall back to the whole document
    let root = match Selector::parse("body") {
        Ok(selector) => document.select(&selector).next(),
        Err(_) => None,
    }
    .unwrap_or_else(|| document.root_element());

    let mut out = String::new();
    collect_element_text(root, false, &mut out);
    clean_whitespace(&out)
}

/// Recursively collect text from an element, skipping non-content subtrees
fn collect_element_text(element: ElementRef, in_pre: bool, out: &mut String) {
    let tag_name = element.value().name();
    if SKIP_TAGS.contains(&tag_name) {
        return;
    }
    let is_block = BLOCK_TAGS.contains(&tag_name);
    let in_pre = in_pre || tag_name == "pre";

    let is_cell = CELL_TAGS.contains(&tag_name);

    if is_block || tag_name == "pre" {
        out.push('\n');
    } else if is_cell {
        push_space(out);
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if in_pre {
                    out.push_str(text);
                } else {
                    push_inline_text(text, out);
                }
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_element_text(child_el, in_pre, out);
                }
            }
            _ => {}
        }
    }

    if is_block || tag_name == "pre" {
        out.push('\n');
    } else if is_cell {
        push_space(out);
    }
}

/// Inline text keeps its own word spacing, so `safe</a>.` stays `safe.`
fn push_inline_text(text: &str, out: &mut String) {
    if text.starts_with(char::is_whitespace) {
        push_space(out);
    }
    for (i, word) in text.split_whitespace().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(word);
    }
    if text.ends_with(char::is_whitespace) {
        push_space(out);
    }
}

/// One space between words, never at a line start or after another space
fn push_space(out: &mut String) {
    if !out.is_empty() && !out.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

/// Collapse space runs, trim line edges, and keep at most one blank line.
///
/// Text inside `<pre>` has already been emitted verbatim; its indentation is
/// kept because only space runs *between* words on a line are collapsed.
fn clean_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut blank_run = 0;

    for line in text.lines() {
        let line = line.trim_end();
        let leading = line.len() - line.trim_start().len();
        let body = line.trim_start();
        if body.is_empty() {
            blank_run += 1;
            if blank_run == 1 && !result.is_empty() {
                result.push('\n');
            }
            continue;
        }
        blank_run = 0;

        result.push_str(&line[..leading.min(line.len())].replace('\t', "    "));
        let mut prev_space = false;
        for ch in body.chars() {
            if ch == ' ' {
                if !prev_space {
                    result.push(' ');
                }
                prev_space = true;
            } else {
                result.push(ch);
                prev_space = false;
            }
        }
        result.push('\n');
    }

    result.trim().to_string()
}

/// Plain text of an HTML fragment (search snippets, language lists).
pub fn strip_tags(fragment: &str) -> String {
    let text = TAG_RE.replace_all(fragment, " ");
    let text = xml_unescape(&text);
    WS_RE.replace_all(&text, " ").trim().to_string()
}

/// Readable text of a response body.
///
/// HTML is converted with [`html_to_text`]; other textual types are decoded
/// as (lossy) UTF-8; binary types are rejected.
pub fn body_text(response: &RawResponse) -> Result<String, Failure> {
    if response.is_html() {
        return Ok(html_to_text(&response.text()));
    }
    if response.is_textual() {
        return Ok(response.text());
    }
    Err(Failure::parse_error(format!(
        "Unsupported content type: {}",
        response.content_type
    )))
}

// ==================== XML ====================

/// Inner contents of every `<tag ...>...</tag>` element, in document order.
pub fn xml_blocks<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let pattern = format!(r"(?s)<{}(?:\s[^>]*)?>(.*?)</{}>", regex::escape(tag), regex::escape(tag));
    match xml_pattern(pattern) {
        Some(re) => re
            .captures_iter(xml)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect(),
        None => Vec::new(),
    }
}

fn xml_pattern(pattern: String) -> Option<Regex> {
    let mut cache = XML_PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(re) = cache.get(&pattern) {
        return Some(re.clone());
    }
    let re = Regex::new(&pattern).ok()?;
    cache.insert(pattern, re.clone());
    Some(re)
}

/// Text of the first `<tag>` element: tags stripped, entities decoded,
/// whitespace collapsed.
pub fn xml_text(xml: &str, tag: &str) -> Option<String> {
    xml_blocks(xml, tag)
        .into_iter()
        .next()
        .map(strip_tags)
        .filter(|s| !s.is_empty())
}

/// Text of every `<tag>` element.
pub fn xml_texts(xml: &str, tag: &str) -> Vec<String> {
    xml_blocks(xml, tag)
        .into_iter()
        .map(strip_tags)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Attribute values of every `<tag ... attr="...">` occurrence.
///
/// `filter`, when given, is an extra `name="value"` pair the element must carry
/// (e.g. `rel="alternate"`).
pub fn xml_attr(xml: &str, tag: &str, attr: &str, filter: Option<(&str, &str)>) -> Vec<String> {
    let pattern = format!(r"<{}\b([^>]*)>", regex::escape(tag));
    let attr_pattern = format!(r#"\b{}\s*=\s*"([^"]*)""#, regex::escape(attr));
    let (Some(tag_re), Some(attr_re)) = (xml_pattern(pattern), xml_pattern(attr_pattern)) else {
        return Vec::new();
    };

    tag_re
        .captures_iter(xml)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .filter(|attrs| match filter {
            Some((name, value)) => attrs.contains(&format!(r#"{}="{}""#, name, value)),
            None => true,
        })
        .filter_map(|attrs| attr_re.captures(attrs).and_then(|c| c.get(1)))
        .map(|m| xml_unescape(m.as_str()))
        .collect()
}

/// Decode the predefined XML entities and numeric character references.
pub fn xml_unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let decoded = rest.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &rest[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some(' '),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, end))
        });
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_domain::FailureKind;
    use serde_json::json;

    #[test]
    fn test_parse_json_valid_and_invalid() {
        let value = parse_json(&RawResponse::json(r#"{"a": {"b": "c"}}"#)).unwrap();
        assert_eq!(str_at(&value, "/a/b"), Some("c"));

        let err = parse_json(&RawResponse::json("<html>oops</html>")).unwrap_err();
        assert_eq!(err.kind, FailureKind::ParseError);

        let err = parse_json(&RawResponse::json("  ")).unwrap_err();
        assert!(err.message.contains("empty"));
    }

    #[test]
    fn test_pointer_helpers_tolerate_missing_fields() {
        let value = json!({"count": "42", "n": 7, "tags": ["a", 1, "b"], "s": "x"});
        assert_eq!(u64_at(&value, "/count"), Some(42));
        assert_eq!(u64_at(&value, "/n"), Some(7));
        assert_eq!(u64_at(&value, "/missing"), None);
        assert_eq!(str_at(&value, "/n"), None);
        assert_eq!(strings_at(&value, "/tags"), vec!["a", "b"]);
        assert!(strings_at(&value, "/s").is_empty());
        assert!(array_at(&value, "/nope").is_empty());
    }

    #[test]
    fn test_date_prefix() {
        assert_eq!(date_prefix("2024-01-31T12:00:00Z"), "2024-01-31");
        assert_eq!(date_prefix("2024"), "2024");
    }

    #[test]
    fn test_html_to_text_basic() {
        let html = "<html><body><h1>Hello</h1><p>World</p></body></html>";
        let text = html_to_text(html);
        assert_eq!(text, "Hello\n\nWorld");
    }

    #[test]
    fn test_html_to_text_strips_script_and_style() {
        let html = r#"
        <html><head><title>Page title</title></head><body>
            <script>var x = 1;</script>
            <style>.foo { color: red; }</style>
            <p>Visible text</p>
            <noscript>No JS</noscript>
        </body></html>
        "#;
        let text = html_to_text(html);
        assert!(text.contains("Visible text"));
        assert!(!text.contains("var x = 1"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("No JS"));
        assert!(!text.contains("Page title"));
    }

    #[test]
    fn test_html_to_text_inline_elements_stay_on_one_line() {
        let text = html_to_text("<p>Rust is <b>fast</b> and <a href='#'>safe</a>.</p>");
        assert_eq!(text, "Rust is fast and safe.");
    }

    #[test]
    fn test_html_to_text_word_spacing() {
        assert_eq!(html_to_text("<p><b>a</b> <i>b</i>, c</p>"), "a b, c");
        assert_eq!(html_to_text("<p>un<b>bold</b>ed</p>"), "unbolded");
        assert_eq!(
            html_to_text("<table><tr><td>a</td><td>b</td></tr></table>"),
            "a b"
        );
        assert_eq!(html_to_text("<div>\n   <p>  x  </p>\n</div>"), "x");
    }

    #[test]
    fn test_html_to_text_preserves_pre() {
        let html = "<body><pre>fn main() {\n    println!();\n}</pre></body>";
        let text = html_to_text(html);
        assert!(text.contains("    println!();"));
    }

    #[test]
    fn test_html_to_text_folds_blank_lines() {
        let text = html_to_text("<div><p>a</p><div></div><div></div><p>b</p></div>");
        assert!(!text.contains("\n\n\n"));
        assert!(text.starts_with('a'));
        assert!(text.ends_with('b'));
    }

    #[test]
    fn test_html_to_text_empty() {
        assert!(html_to_text("").is_empty());
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags(r#"The <span class="searchmatch">Rust</span> language"#),
            "The Rust language"
        );
        assert_eq!(
            strip_tags("English<strong>*</strong>, French<br><strong>*</strong>languages"),
            "English * , French * languages"
        );
        assert_eq!(strip_tags("Fish &amp; chips"), "Fish & chips");
    }

    #[test]
    fn test_body_text_by_content_type() {
        let html = RawResponse::new(200, "text/html", "<p>Hi</p>");
        assert_eq!(body_text(&html).unwrap(), "Hi");

        let plain = RawResponse::new(200, "text/plain", "a <b> c");
        assert_eq!(body_text(&plain).unwrap(), "a <b> c");

        let pdf = RawResponse::new(200, "application/pdf", vec![0x25, 0x50]);
        assert_eq!(body_text(&pdf).unwrap_err().kind, FailureKind::ParseError);
    }

    const FEED: &str = r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Channel &amp; Co</title>
  <link rel="self" href="https://example.org/self"/>
  <link rel="alternate" href="https://www.youtube.com/channel/UC123"/>
  <entry>
    <title>First</title>
    <category term="cs.AI" scheme="x"/>
    <category term="cs.LG" scheme="x"/>
  </entry>
  <entry>
    <title>Second &lt;2&gt;</title>
  </entry>
</feed>"#;

    #[test]
    fn test_xml_blocks_and_text() {
        let entries = xml_blocks(FEED, "entry");
        assert_eq!(entries.len(), 2);
        assert_eq!(xml_text(entries[0], "title").as_deref(), Some("First"));
        assert_eq!(xml_text(entries[1], "title").as_deref(), Some("Second <2>"));
        assert_eq!(xml_text(entries[1], "missing"), None);
        assert_eq!(xml_text(FEED, "title").as_deref(), Some("Channel & Co"));
    }

    #[test]
    fn test_xml_attr() {
        let entries = xml_blocks(FEED, "entry");
        assert_eq!(
            xml_attr(entries[0], "category", "term", None),
            vec!["cs.AI", "cs.LG"]
        );
        assert_eq!(
            xml_attr(FEED, "link", "href", Some(("rel", "alternate"))),
            vec!["https://www.youtube.com/channel/UC123"]
        );
    }

    #[test]
    fn test_xml_patterns_compiled_once_per_tag() {
        for _ in 0..3 {
            assert_eq!(xml_blocks("<cachedtag>x</cachedtag>", "cachedtag"), vec!["x"]);
        }
        let cache = XML_PATTERNS.lock().unwrap();
        assert!(cache.contains_key(r"(?s)<cachedtag(?:\s[^>]*)?>(.*?)</cachedtag>"));
        assert_eq!(cache.keys().filter(|k| k.contains("cachedtag")).count(), 1);
    }

    #[test]
    fn test_xml_texts() {
        let xml = "<a><name>X</name><name> Y </name><name></name></a>";
        assert_eq!(xml_texts(xml, "name"), vec!["X", "Y"]);
    }

    #[test]
    fn test_xml_unescape() {
        assert_eq!(xml_unescape("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(xml_unescape("&#39;q&#39; &#x41;"), "'q' A");
        assert_eq!(xml_unescape("AT&T & co"), "AT&T & co");
        assert_eq!(xml_unescape("plain"), "plain");
    }
}
