//! Error types for backend searches.

use thiserror::Error;

/// Errors that can occur while talking to the search backend.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The backend answered with a non-success status.
    #[error("HTTP error from backend: {message}")]
    Http {
        status: Option<u16>,
        message: String,
    },

    /// The request could not be sent or the connection failed.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The configured backend URL is not an absolute HTTP(S) URL.
    #[error("invalid backend URL: {0}")]
    InvalidBaseUrl(String),
}

impl SearchError {
    /// HTTP status reported by the backend, if the request got that far.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::Parse { .. } | Self::InvalidBaseUrl(_) => None,
        }
    }

    /// Returns `true` when the failure might clear up on its own (server
    /// errors, timeouts, dropped connections). Searches are never retried
    /// automatically; this only informs diagnostics.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { status, .. } => status.is_some_and(|s| s >= 500),
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::Parse { .. } | Self::InvalidBaseUrl(_) => false,
        }
    }
}

/// Convenience alias for search results.
pub type SearchResult<T> = std::result::Result<T, SearchError>;
