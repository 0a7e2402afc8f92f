//! Include/exclude term sets edited by the user before a search.

use serde::{Deserialize, Serialize};

/// The mutable pair of term sets behind a search.
///
/// Terms are trimmed on the way in and stored at most once per set. A term
/// may appear in both sets at the same time; the two sets are never
/// cross-checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    include: Vec<String>,
    exclude: Vec<String>,
}

/// An immutable copy of a [`FilterState`] handed to query composition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    pub include_terms: Vec<String>,
    pub exclude_terms: Vec<String>,
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required term. Returns `true` when the set changed.
    pub fn add_include(&mut self, term: &str) -> bool {
        insert_term(&mut self.include, term)
    }

    /// Add an exclusion term. Returns `true` when the set changed.
    pub fn add_exclude(&mut self, term: &str) -> bool {
        insert_term(&mut self.exclude, term)
    }

    /// Remove a required term by exact match. Returns `true` when it was present.
    pub fn remove_include(&mut self, term: &str) -> bool {
        remove_term(&mut self.include, term)
    }

    /// Remove an exclusion term by exact match. Returns `true` when it was present.
    pub fn remove_exclude(&mut self, term: &str) -> bool {
        remove_term(&mut self.exclude, term)
    }

    pub fn include_terms(&self) -> &[String] {
        &self.include
    }

    pub fn exclude_terms(&self) -> &[String] {
        &self.exclude
    }

    /// Drop every term from both sets.
    pub fn clear(&mut self) {
        self.include.clear();
        self.exclude.clear();
    }

    #[must_use]
    pub fn snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            include_terms: self.include.clone(),
            exclude_terms: self.exclude.clone(),
        }
    }
}

impl FilterSnapshot {
    #[must_use]
    pub fn new(include_terms: Vec<String>, exclude_terms: Vec<String>) -> Self {
        Self {
            include_terms,
            exclude_terms,
        }
    }
}

fn insert_term(terms: &mut Vec<String>, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() || terms.iter().any(|t| t == term) {
        return false;
    }
    terms.push(term.to_string());
    true
}

fn remove_term(terms: &mut Vec<String>, term: &str) -> bool {
    let before = terms.len();
    terms.retain(|t| t != term);
    terms.len() != before
}
