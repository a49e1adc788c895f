//! Syntax coloring for HTML snippet practice.
//!
//! The correctness classification from [`diff`](crate::engine::diff::diff)
//! is computed on the raw snippet. A second pass escapes the snippet and runs
//! a small regex recognizer for `<tag attr="value">` forms over the escaped
//! text. The syntax class is attached alongside the correctness class and
//! never replaces it. Nested or malformed markup is handled on a best-effort
//! basis only.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::engine::diff::{self, CharClass, DiffChar};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxClass {
    Bracket,
    TagName,
    AttrName,
    AttrValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightedChar {
    pub ch: char,
    pub class: CharClass,
    pub syntax: Option<SyntaxClass>,
}

impl From<DiffChar> for HighlightedChar {
    fn from(d: DiffChar) -> Self {
        Self {
            ch: d.ch,
            class: d.class,
            syntax: None,
        }
    }
}

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(&lt;/?)([A-Za-z][A-Za-z0-9-]*)((?:\s+[^\s=&/]+(?:=&quot;.*?&quot;)?)*)\s*(/?&gt;)")
        .expect("tag pattern is valid")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([^\s=&/]+)(?:=(&quot;.*?&quot;))?").expect("attribute pattern is valid")
});

/// Escape the five XML-special characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        out.push_str(&escape_char(ch));
    }
    out
}

fn escape_char(ch: char) -> String {
    match ch {
        '<' => "&lt;".to_string(),
        '>' => "&gt;".to_string(),
        '&' => "&amp;".to_string(),
        '"' => "&quot;".to_string(),
        '\'' => "&#39;".to_string(),
        _ => ch.to_string(),
    }
}

/// Byte ranges of the escaped text that belong to tag syntax.
pub fn syntax_spans(escaped: &str) -> Vec<(Range<usize>, SyntaxClass)> {
    let mut spans = Vec::new();

    for caps in TAG_RE.captures_iter(escaped) {
        if let Some(open) = caps.get(1) {
            spans.push((open.range(), SyntaxClass::Bracket));
        }
        if let Some(name) = caps.get(2) {
            spans.push((name.range(), SyntaxClass::TagName));
        }
        if let Some(attrs) = caps.get(3) {
            let base = attrs.start();
            for attr in ATTR_RE.captures_iter(attrs.as_str()) {
                if let Some(attr_name) = attr.get(1) {
                    let r = attr_name.range();
                    spans.push((base + r.start..base + r.end, SyntaxClass::AttrName));
                }
                if let Some(value) = attr.get(2) {
                    let r = value.range();
                    spans.push((base + r.start..base + r.end, SyntaxClass::AttrValue));
                }
            }
        }
        if let Some(close) = caps.get(4) {
            spans.push((close.range(), SyntaxClass::Bracket));
        }
    }

    spans
}

/// Correctness classification of `target` against `input`, with the HTML
/// syntax class of each character layered on top.
pub fn highlight_snippet(target: &str, input: &str) -> Vec<HighlightedChar> {
    let mut escaped = String::with_capacity(target.len());
    let mut offsets = Vec::with_capacity(target.len());
    for ch in target.chars() {
        offsets.push(escaped.len());
        escaped.push_str(&escape_char(ch));
    }

    let spans = syntax_spans(&escaped);

    diff::diff(target, input)
        .into_iter()
        .zip(offsets)
        .map(|(d, offset)| HighlightedChar {
            ch: d.ch,
            class: d.class,
            syntax: spans
                .iter()
                .find(|(range, _)| range.contains(&offset))
                .map(|(_, class)| *class),
        })
        .collect()
}

/// Plain-text classification in the same shape as [`highlight_snippet`].
pub fn highlight_plain(target: &str, input: &str) -> Vec<HighlightedChar> {
    diff::diff(target, input)
        .into_iter()
        .map(HighlightedChar::from)
        .collect()
}
