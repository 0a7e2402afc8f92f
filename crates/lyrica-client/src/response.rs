//! Normalization of backend response bodies.
//!
//! The backend has returned results both under a top-level `results` key
//! and as a bare list. Both shapes are read through [`Body`]; a body in
//! neither shape yields no results.

use lyrica_core::model::lenient;
use lyrica_core::SongResult;
use serde::Deserialize;
use serde_json::Value;

/// The results of one search, plus anything else the backend said.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub results: Vec<SongResult>,
    /// Entries of the result list that were not objects and were dropped.
    pub skipped: usize,
    /// Informational `message` field, e.g. a hint to lower the threshold.
    pub message: Option<String>,
    /// An `error` field the backend reported alongside a success status.
    pub backend_error: Option<String>,
}

impl SearchPage {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Response body shapes, tried in order.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Body {
    Bare(Vec<Value>),
    Wrapped(Envelope),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Envelope {
    #[serde(deserialize_with = "lenient::optional")]
    results: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient::optional")]
    message: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    error: Option<String>,
}

/// Locate and read the result list in a response body.
///
/// A top-level `results` array wins; otherwise a body that is itself an
/// array is used; anything else yields no results.
pub fn normalize_body(body: Value) -> SearchPage {
    let envelope = match Body::deserialize(body) {
        Ok(Body::Bare(items)) => Envelope {
            results: Some(items),
            ..Envelope::default()
        },
        Ok(Body::Wrapped(envelope)) => envelope,
        Err(_) => Envelope::default(),
    };

    let items = envelope.results.unwrap_or_default();
    let total = items.len();
    let results: Vec<SongResult> = items.into_iter().filter_map(SongResult::from_value).collect();

    SearchPage {
        skipped: total - results.len(),
        results,
        message: envelope.message.filter(|m| !m.is_empty()),
        backend_error: envelope.error.filter(|e| !e.is_empty()),
    }
}
