//! Reduction of a filter snapshot into the query sent to the backend.

use serde::{Deserialize, Serialize};

use crate::error::{ComposeError, ComposeResult};
use crate::filter::FilterSnapshot;

/// The include string and exclude list actually sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedQuery {
    include: String,
    exclude: Vec<String>,
}

impl ComposedQuery {
    /// All include terms joined by single spaces. Never empty.
    pub fn include(&self) -> &str {
        &self.include
    }

    /// Exclude terms in the order they were added. Order matters because
    /// each term becomes its own repeated query parameter.
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }
}

/// Compose a query from a filter snapshot.
///
/// Blank include terms are skipped, the remainder joined with a single
/// space. Exclude terms pass through untouched.
///
/// # Errors
///
/// Returns [`ComposeError::EmptyIncludeSet`] when no include term survives;
/// the caller must not dispatch a search in that case.
pub fn compose(snapshot: &FilterSnapshot) -> ComposeResult<ComposedQuery> {
    let include = snapshot
        .include_terms
        .iter()
        .map(|term| term.trim())
        .filter(|term| !term.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if include.is_empty() {
        return Err(ComposeError::EmptyIncludeSet);
    }

    Ok(ComposedQuery {
        include,
        exclude: snapshot.exclude_terms.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterState;

    fn snapshot(include: &[&str], exclude: &[&str]) -> FilterSnapshot {
        FilterSnapshot::new(
            include.iter().map(|s| s.to_string()).collect(),
            exclude.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_compose_joins_in_insertion_order() {
        let query = compose(&snapshot(&["love", "rain", "city lights"], &[])).unwrap();
        assert_eq!(query.include(), "love rain city lights");
    }

    #[test]
    fn test_compose_single_term() {
        let query = compose(&snapshot(&["heartbreak"], &[])).unwrap();
        assert_eq!(query.include(), "heartbreak");
        assert!(query.exclude().is_empty());
    }

    #[test]
    fn test_compose_skips_blank_terms() {
        let query = compose(&snapshot(&["", "love", "   ", " rain "], &[])).unwrap();
        assert_eq!(query.include(), "love rain");
    }

    #[test]
    fn test_compose_empty_include_set() {
        assert_eq!(
            compose(&snapshot(&[], &["remix"])),
            Err(ComposeError::EmptyIncludeSet)
        );
    }

    #[test]
    fn test_compose_whitespace_only_include_set() {
        assert_eq!(
            compose(&snapshot(&[" ", "\t\n"], &[])),
            Err(ComposeError::EmptyIncludeSet)
        );
    }

    #[test]
    fn test_compose_preserves_exclude_order() {
        let query = compose(&snapshot(&["love"], &["remix", "live", "acoustic"])).unwrap();
        assert_eq!(query.exclude(), ["remix", "live", "acoustic"]);
    }

    #[test]
    fn test_compose_from_filter_state() {
        let mut filter = FilterState::new();
        filter.add_include("love");
        filter.add_include("rain");
        filter.add_exclude("remix");

        let query = compose(&filter.snapshot()).unwrap();
        assert_eq!(query.include(), "love rain");
        assert_eq!(query.exclude(), ["remix"]);
    }

    #[test]
    fn test_empty_include_prompt() {
        let err = compose(&FilterState::new().snapshot()).unwrap_err();
        assert_eq!(err.user_prompt(), "Please add at least one word to include");
    }
}
