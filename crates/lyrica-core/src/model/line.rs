use serde::Deserialize;
use serde_json::Value;

use crate::model::lenient;

/// Position and score attached to an object-shaped matched line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineMeta {
    pub line_number: Option<u64>,
    pub similarity: Option<f64>,
}

/// A matched line in one of the shapes the backend has been seen to send.
///
/// Classification happens once, when the result is read; the highlighter
/// then matches on the variant instead of probing fields.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchedLine {
    /// A bare string.
    PlainText(String),
    /// An object with a non-empty `text` field.
    TextField { text: String, meta: LineMeta },
    /// An object with a non-empty `line` field.
    LineField { line: String, meta: LineMeta },
    /// An object with a `lyric_line` field. Its content is trusted markup.
    LyricLineField { lyric_line: String, meta: LineMeta },
    /// Anything else, kept verbatim.
    Unknown(Value),
}

impl MatchedLine {
    /// Classify a raw JSON value. The first matching shape wins, in the
    /// order `text`, `line`, `lyric_line`.
    ///
    /// `text` and `line` accept any scalar and must be non-empty once read
    /// as text; `lyric_line` must be a string.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => Self::PlainText(s),
            value @ Value::Object(_) => {
                let Ok(record) = LineRecord::deserialize(&value) else {
                    return Self::Unknown(value);
                };
                let meta = LineMeta {
                    line_number: record.line_number,
                    similarity: record.similarity_score,
                };
                if let Some(text) = record.text.filter(|t| !t.is_empty()) {
                    Self::TextField { text, meta }
                } else if let Some(line) = record.line.filter(|l| !l.is_empty()) {
                    Self::LineField { line, meta }
                } else if let Some(lyric_line) = record.lyric_line {
                    Self::LyricLineField { lyric_line, meta }
                } else {
                    Self::Unknown(value)
                }
            }
            other => Self::Unknown(other),
        }
    }

    /// Metadata for object shapes; empty for bare strings and unknown values.
    pub fn meta(&self) -> LineMeta {
        match self {
            Self::TextField { meta, .. }
            | Self::LineField { meta, .. }
            | Self::LyricLineField { meta, .. } => *meta,
            Self::PlainText(_) | Self::Unknown(_) => LineMeta::default(),
        }
    }
}

impl From<Value> for MatchedLine {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<&str> for MatchedLine {
    fn from(text: &str) -> Self {
        Self::PlainText(text.to_string())
    }
}

/// Wire form of an object-shaped matched line.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LineRecord {
    #[serde(deserialize_with = "lenient::scalar")]
    text: Option<String>,
    #[serde(deserialize_with = "lenient::scalar")]
    line: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    lyric_line: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    line_number: Option<u64>,
    #[serde(deserialize_with = "lenient::optional")]
    similarity_score: Option<f64>,
}
