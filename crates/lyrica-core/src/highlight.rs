//! Conversion of matched lines into a safe rich-text form.
//!
//! Backend lines mark the matching part of a lyric with `**bold**`
//! delimiters. Rather than splicing markup into a string, the highlighter
//! splits each line into plain and emphasized [`Segment`]s; renderers
//! decide how emphasis looks. [`HighlightedLine::to_html`] escapes every
//! piece of backend text, so no raw backend markup reaches a page.
//!
//! `lyric_line` values are treated as already rendered: their `<em>`,
//! `<strong>` and `<b>` tags become emphasis segments and character
//! entities are decoded. Tags nested inside an emphasised span, or left
//! unpaired, are dropped. Bold delimiters are recognised in every shape.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::lenient::scalar_text;
use crate::model::line::{LineMeta, MatchedLine};

/// Only this many matched lines of a result are ever displayed.
pub const DISPLAY_LINE_LIMIT: usize = 3;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));

// One alternative per tag so each opening tag pairs with its own close.
static EMPHASIS_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<em>(.*?)</em>|<strong>(.*?)</strong>|<b>(.*?)</b>")
        .expect("emphasis pattern is valid")
});

static STRAY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:em|strong|b)>").expect("tag pattern is valid"));

/// A run of text within a highlighted line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Segment {
    Plain(String),
    Emphasis(String),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Emphasis(text) => text,
        }
    }

    pub fn is_emphasis(&self) -> bool {
        matches!(self, Self::Emphasis(_))
    }
}

/// A matched line after normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HighlightedLine {
    pub segments: Vec<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
}

impl HighlightedLine {
    #[must_use]
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            ..Self::default()
        }
    }

    #[must_use]
    fn with_meta(mut self, meta: LineMeta) -> Self {
        self.line_number = meta.line_number;
        self.similarity = meta.similarity;
        self
    }

    /// True when the line has no visible text.
    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(|s| s.text().is_empty())
    }

    /// The line's text with all emphasis dropped.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Render as inline HTML. Text is escaped; emphasis becomes `<em>`.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Plain(text) => escape_html_into(&mut html, text),
                Segment::Emphasis(text) => {
                    html.push_str("<em>");
                    escape_html_into(&mut html, text);
                    html.push_str("</em>");
                }
            }
        }
        html
    }
}

impl fmt::Display for HighlightedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(segment.text())?;
        }
        Ok(())
    }
}

/// A matched line that has no renderable text. Never leaves this module.
#[derive(Debug, Error)]
enum NormalizationFailure {
    #[error("matched line is null")]
    Null,
    #[error("matched line is an unrecognised {0}")]
    Unrenderable(&'static str),
}

/// Normalize one matched line.
///
/// Strings, `text` and `line` fields go through the bold transform;
/// `lyric_line` is read as trusted markup; anything else is coerced to a
/// string, and a value that cannot be coerced yields an empty line.
pub fn normalize_line(line: &MatchedLine) -> HighlightedLine {
    let segments = match line {
        MatchedLine::PlainText(text)
        | MatchedLine::TextField { text, .. }
        | MatchedLine::LineField { line: text, .. } => parse_bold(text),
        MatchedLine::LyricLineField { lyric_line, .. } => parse_markup(lyric_line),
        MatchedLine::Unknown(value) => match coerce(value) {
            Ok(text) => parse_bold(&text),
            Err(_) => Vec::new(),
        },
    };
    HighlightedLine::from_segments(segments).with_meta(line.meta())
}

/// Normalize the displayable prefix of a result's matched lines.
pub fn highlight_lines(lines: &[MatchedLine]) -> Vec<HighlightedLine> {
    lines
        .iter()
        .take(DISPLAY_LINE_LIMIT)
        .map(normalize_line)
        .collect()
}

/// Split `**bold**` spans out of `text`.
///
/// Matching is non-greedy and does not cross line breaks. An unmatched
/// `**` stays in the plain text.
pub fn parse_bold(text: &str) -> Vec<Segment> {
    split_matches(&BOLD, text, |s| s.to_string())
}

fn parse_markup(markup: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let convert = |text: &str| decode_entities(&STRAY_TAG.replace_all(text, ""));
    for segment in split_matches(&EMPHASIS_TAG, markup, convert) {
        match segment {
            Segment::Plain(text) => segments.extend(parse_bold(&text)),
            emphasis @ Segment::Emphasis(_) => segments.push(emphasis),
        }
    }
    segments
}

fn split_matches(pattern: &Regex, text: &str, convert: impl Fn(&str) -> String) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let Some(inner) = caps.iter().skip(1).flatten().next() else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Plain(convert(&text[last..whole.start()])));
        }
        segments.push(Segment::Emphasis(convert(inner.as_str())));
        last = whole.end();
    }
    if last < text.len() {
        segments.push(Segment::Plain(convert(&text[last..])));
    }
    segments
}

fn coerce(value: &Value) -> Result<String, NormalizationFailure> {
    match value {
        Value::Null => Err(NormalizationFailure::Null),
        Value::Array(_) => Err(NormalizationFailure::Unrenderable("array")),
        Value::Object(_) => Err(NormalizationFailure::Unrenderable("object")),
        scalar => scalar_text(scalar).ok_or(NormalizationFailure::Unrenderable("scalar")),
    }
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_html_into(&mut out, text);
    out
}

fn escape_html_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn html(value: Value) -> String {
        normalize_line(&MatchedLine::from_value(value)).to_html()
    }

    #[test]
    fn test_bold_in_middle() {
        assert_eq!(html(json!("a **b** c")), "a <em>b</em> c");
    }

    #[test]
    fn test_bold_whole_line() {
        assert_eq!(html(json!("**x**")), "<em>x</em>");
    }

    #[test]
    fn test_no_bold_unchanged() {
        assert_eq!(html(json!("no bold")), "no bold");
    }

    #[test]
    fn test_consecutive_bold_spans_are_independent() {
        assert_eq!(
            html(json!("**love** and **rain**")),
            "<em>love</em> and <em>rain</em>"
        );
    }

    #[test]
    fn test_unmatched_marker_left_verbatim() {
        assert_eq!(html(json!("a **b c")), "a **b c");
        assert_eq!(html(json!("**a** b **")), "<em>a</em> b **");
    }

    #[test]
    fn test_bold_does_not_cross_newlines() {
        let line = normalize_line(&MatchedLine::from("**a\nb**"));
        assert_eq!(line.segments, vec![Segment::Plain("**a\nb**".to_string())]);
    }

    #[test]
    fn test_plain_string() {
        assert_eq!(html(json!("plain")), "plain");
    }

    #[test]
    fn test_text_field() {
        assert_eq!(html(json!({"text": "**hi**"})), "<em>hi</em>");
    }

    #[test]
    fn test_line_field() {
        assert_eq!(html(json!({"line": "say **hi**"})), "say <em>hi</em>");
    }

    #[test]
    fn test_lyric_line_is_not_retransformed() {
        assert_eq!(html(json!({"lyric_line": "<em>hi</em>"})), "<em>hi</em>");
    }

    #[test]
    fn test_lyric_line_strong_tags_become_emphasis() {
        let line = normalize_line(&MatchedLine::from_value(
            json!({"lyric_line": "I <strong>walk</strong> alone"}),
        ));
        assert_eq!(
            line.segments,
            vec![
                Segment::Plain("I ".to_string()),
                Segment::Emphasis("walk".to_string()),
                Segment::Plain(" alone".to_string()),
            ]
        );
    }

    #[test]
    fn test_lyric_line_bold_delimiters() {
        assert_eq!(
            html(json!({"lyric_line": "**love** in the **rain**"})),
            "<em>love</em> in the <em>rain</em>"
        );
    }

    #[test]
    fn test_lyric_line_entities_decoded_once() {
        let line = normalize_line(&MatchedLine::from_value(
            json!({"lyric_line": "rock &amp; <em>roll</em>"}),
        ));
        assert_eq!(line.plain_text(), "rock & roll");
        assert_eq!(line.to_html(), "rock &amp; <em>roll</em>");
    }

    #[test]
    fn test_lyric_line_nested_tags() {
        assert_eq!(
            html(json!({"lyric_line": "<em><b>x</b></em> y"})),
            "<em>x</em> y"
        );
        assert_eq!(
            html(json!({"lyric_line": "<b>a <em>b</em> c</b>!"})),
            "<em>a b c</em>!"
        );
    }

    #[test]
    fn test_lyric_line_mismatched_tags_are_dropped() {
        assert_eq!(html(json!({"lyric_line": "<em>x</b> y"})), "x y");
        assert_eq!(
            html(json!({"lyric_line": "<strong>a</strong> <em>b"})),
            "<em>a</em> b"
        );
    }

    #[test]
    fn test_lyric_line_escaped_tags_stay_text() {
        assert_eq!(
            html(json!({"lyric_line": "&lt;b&gt; <em>x</em>"})),
            "&lt;b&gt; <em>x</em>"
        );
    }

    #[test]
    fn test_number_is_stringified() {
        assert_eq!(html(json!(42)), "42");
        assert_eq!(html(json!(1.0)), "1");
        assert_eq!(html(json!(true)), "true");
    }

    #[test]
    fn test_scalar_text_field_is_stringified() {
        assert_eq!(html(json!({"text": 5})), "5");
    }

    #[test]
    fn test_null_yields_empty_line() {
        let line = normalize_line(&MatchedLine::from_value(Value::Null));
        assert!(line.is_empty());
        assert_eq!(line.to_html(), "");
    }

    #[test]
    fn test_unrecognised_object_yields_empty_line() {
        assert_eq!(html(json!({"score": 0.4})), "");
        assert_eq!(html(json!(["a", "b"])), "");
    }

    #[test]
    fn test_backend_markup_is_escaped() {
        assert_eq!(
            html(json!({"text": "<script>x</script> **&**"})),
            "&lt;script&gt;x&lt;/script&gt; <em>&amp;</em>"
        );
    }

    #[test]
    fn test_meta_is_carried() {
        let line = normalize_line(&MatchedLine::from_value(
            json!({"lyric_line": "x", "line_number": 4, "similarity_score": 0.5}),
        ));
        assert_eq!(line.line_number, Some(4));
        assert_eq!(line.similarity, Some(0.5));
    }

    #[test]
    fn test_display_drops_emphasis() {
        let line = normalize_line(&MatchedLine::from("a **b** c"));
        assert_eq!(line.to_string(), "a b c");
    }

    #[test]
    fn test_highlight_lines_keeps_first_three() {
        let lines: Vec<MatchedLine> = (1..=6)
            .map(|i| MatchedLine::PlainText(format!("**{i}**")))
            .collect();
        let highlighted = highlight_lines(&lines);
        assert_eq!(highlighted.len(), DISPLAY_LINE_LIMIT);
        let rendered: Vec<String> = highlighted.iter().map(HighlightedLine::to_html).collect();
        assert_eq!(rendered, ["<em>1</em>", "<em>2</em>", "<em>3</em>"]);
    }

    #[test]
    fn test_highlight_lines_fewer_than_limit() {
        let lines = vec![MatchedLine::from("only")];
        assert_eq!(highlight_lines(&lines).len(), 1);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn test_failure_message() {
        assert_eq!(
            NormalizationFailure::Unrenderable("object").to_string(),
            "matched line is an unrecognised object"
        );
    }
}
