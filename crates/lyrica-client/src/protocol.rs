//! The two backend search protocols and their query encoding.

use std::fmt;
use std::str::FromStr;

use lyrica_core::ComposedQuery;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

// Everything except RFC 3986 unreserved characters. Spaces become `%20`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Which backend endpoint a search is sent to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// `GET /search?query=...`. Exclude terms are not supported.
    Simple,
    /// `GET /semantic-search?include=...&exclude=...&exclude=...`.
    #[default]
    Semantic,
}

/// Optional knobs understood by the semantic endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticTuning {
    pub similarity_threshold: Option<f64>,
    pub max_results: Option<u32>,
}

impl Protocol {
    pub fn path(self) -> &'static str {
        match self {
            Self::Simple => "/search",
            Self::Semantic => "/semantic-search",
        }
    }

    /// Query parameters for `query`, in wire order.
    ///
    /// Each exclude term is its own `exclude` parameter, never joined.
    pub fn query_pairs(
        self,
        query: &ComposedQuery,
        tuning: &SemanticTuning,
    ) -> Vec<(&'static str, String)> {
        match self {
            Self::Simple => vec![("query", query.include().to_string())],
            Self::Semantic => {
                let mut pairs = vec![("include", query.include().to_string())];
                pairs.extend(query.exclude().iter().map(|term| ("exclude", term.clone())));
                if let Some(threshold) = tuning.similarity_threshold {
                    pairs.push(("similarity_threshold", threshold.to_string()));
                }
                if let Some(max) = tuning.max_results {
                    pairs.push(("max_results", max.to_string()));
                }
                pairs
            }
        }
    }

    /// Whether exclude terms reach the backend under this protocol.
    pub fn supports_exclude(self) -> bool {
        matches!(self, Self::Semantic)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Semantic => write!(f, "semantic"),
        }
    }
}

impl FromStr for Protocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "semantic" => Ok(Self::Semantic),
            other => Err(format!(
                "unknown protocol '{other}' (expected 'simple' or 'semantic')"
            )),
        }
    }
}

/// Encode pairs as a query string, percent-encoding keys and values.
pub fn encode_query(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_VALUE),
                utf8_percent_encode(value, QUERY_VALUE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
