use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::highlight::{highlight_lines, HighlightedLine};
use crate::model::ids::SongId;
use crate::model::lenient;
use crate::model::line::MatchedLine;

/// A song returned by the backend together with its matched lines.
#[derive(Debug, Clone, PartialEq)]
pub struct SongResult {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub external_link: Option<String>,
    pub matched_lines: Vec<MatchedLine>,
}

impl SongResult {
    #[must_use]
    pub fn new(id: SongId, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            external_link: None,
            matched_lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_external_link(mut self, link: impl Into<String>) -> Self {
        self.external_link = Some(link.into());
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: impl Into<MatchedLine>) -> Self {
        self.matched_lines.push(line.into());
        self
    }

    /// Read a result record leniently.
    ///
    /// Returns `None` when the value is not an object. The id is taken from
    /// `id`, falling back to `song_id`. Missing or non-string `title` and
    /// `artist` become empty, and a missing `matched_lines` becomes an
    /// empty list.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let record: SongRecord = serde_json::from_value(value).ok()?;
        Some(record.into())
    }

    /// Build the display form, keeping only the first few matched lines.
    #[must_use]
    pub fn to_display(&self) -> DisplayResult {
        DisplayResult {
            id: self.id.clone(),
            title: self.title.clone(),
            artist: self.artist.clone(),
            external_link: self.external_link.clone(),
            total_matches: self.matched_lines.len(),
            lines: highlight_lines(&self.matched_lines),
        }
    }
}

/// A result ready for a renderer: highlighted and truncated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayResult {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub external_link: Option<String>,
    /// Number of matched lines before truncation.
    pub total_matches: usize,
    pub lines: Vec<HighlightedLine>,
}

impl From<&SongResult> for DisplayResult {
    fn from(song: &SongResult) -> Self {
        song.to_display()
    }
}

/// Wire form of one result record.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SongRecord {
    id: Option<SongId>,
    song_id: Option<SongId>,
    #[serde(deserialize_with = "lenient::optional")]
    title: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    artist: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    external_link: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    matched_lines: Option<Vec<Value>>,
}

impl From<SongRecord> for SongResult {
    fn from(record: SongRecord) -> Self {
        Self {
            id: record.id.or(record.song_id).unwrap_or_default(),
            title: record.title.unwrap_or_default(),
            artist: record.artist.unwrap_or_default(),
            external_link: record.external_link.filter(|link| !link.is_empty()),
            matched_lines: record
                .matched_lines
                .unwrap_or_default()
                .into_iter()
                .map(MatchedLine::from_value)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full_record() {
        let song = SongResult::from_value(json!({
            "id": 1,
            "title": "T",
            "artist": "A",
            "external_link": "https://example.com/t",
            "matched_lines": [{"lyric_line": "**love** in the **rain**"}]
        }))
        .unwrap();

        assert_eq!(song.id, SongId::new("1"));
        assert_eq!(song.title, "T");
        assert_eq!(song.artist, "A");
        assert_eq!(song.external_link.as_deref(), Some("https://example.com/t"));
        assert_eq!(song.matched_lines.len(), 1);
    }

    #[test]
    fn test_from_value_song_id_fallback() {
        let song = SongResult::from_value(json!({"song_id": 9, "title": "X"})).unwrap();
        assert_eq!(song.id.as_str(), "9");
        assert_eq!(song.artist, "");
        assert!(song.matched_lines.is_empty());
        assert!(song.external_link.is_none());
    }

    #[test]
    fn test_from_value_null_fields() {
        let song = SongResult::from_value(json!({
            "id": null,
            "title": null,
            "external_link": null,
            "matched_lines": null
        }))
        .unwrap();
        assert!(song.id.is_empty());
        assert_eq!(song.title, "");
        assert!(song.external_link.is_none());
        assert!(song.matched_lines.is_empty());
    }

    #[test]
    fn test_from_value_wrong_field_types() {
        let song = SongResult::from_value(json!({
            "id": "s-1",
            "title": 12,
            "artist": ["A"],
            "external_link": "",
            "matched_lines": "not a list"
        }))
        .unwrap();
        assert_eq!(song.id.as_str(), "s-1");
        assert_eq!(song.title, "");
        assert_eq!(song.artist, "");
        assert!(song.external_link.is_none());
        assert!(song.matched_lines.is_empty());
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(SongResult::from_value(json!("song")).is_none());
        assert!(SongResult::from_value(json!([1, 2])).is_none());
    }

    #[test]
    fn test_to_display_truncates_to_three_lines() {
        let mut song = SongResult::new(SongId::new("1"), "T", "A");
        for i in 0..6 {
            song = song.with_line(format!("line {i}").as_str());
        }

        let display = song.to_display();
        assert_eq!(display.total_matches, 6);
        assert_eq!(display.lines.len(), 3);
        assert_eq!(display.lines[0].to_html(), "line 0");
        assert_eq!(display.lines[2].to_html(), "line 2");
    }

    #[test]
    fn test_to_display_keeps_link() {
        let song = SongResult::new(SongId::new("2"), "T", "A")
            .with_external_link("https://example.com")
            .with_line("**hi**");
        let display = DisplayResult::from(&song);
        assert_eq!(display.external_link.as_deref(), Some("https://example.com"));
        assert_eq!(display.lines[0].to_html(), "<em>hi</em>");
    }
}
