//! HTTP search client.
//!
//! [`SearchClient`] is the capability the search session depends on.
//! [`HttpSearchClient`] implements it against the lyric backend, picking
//! the endpoint and parameter encoding from its configured [`Protocol`].

use std::time::Duration;

use async_trait::async_trait;
use lyrica_core::ComposedQuery;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{SearchError, SearchResult};
use crate::protocol::{encode_query, Protocol, SemanticTuning};
use crate::response::{normalize_body, SearchPage};

const USER_AGENT: &str = "lyrica/0.1.0 (https://github.com/oxur/lyrica)";
const STATUS_PATH: &str = "/search-status";

/// Something that can run a composed query against a backend.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Send one search and return its normalized results.
    ///
    /// There is no retry and no partial result: any transport failure or
    /// non-success status is returned as an error.
    async fn search(&self, query: &ComposedQuery) -> SearchResult<SearchPage>;
}

/// Indexing state reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackendStatus {
    #[serde(default)]
    pub embeddings_loaded: bool,
    #[serde(default)]
    pub total_lines: u64,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Search client for the lyric backend over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpSearchClient {
    http: Client,
    base_url: String,
    protocol: Protocol,
    tuning: SemanticTuning,
}

impl HttpSearchClient {
    /// Create a client for `base_url` using `protocol`.
    ///
    /// No request timeout is set; see [`HttpSearchClient::from_config`].
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute HTTP(S) URL, or a request error if the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, protocol: Protocol) -> SearchResult<Self> {
        Self::build(base_url, protocol, None)
    }

    /// Create a client from loaded configuration.
    ///
    /// # Errors
    /// Same as [`HttpSearchClient::new`].
    pub fn from_config(config: &Config) -> SearchResult<Self> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        Ok(Self::build(&config.backend_url, config.protocol, timeout)?
            .with_tuning(config.tuning()))
    }

    fn build(base_url: &str, protocol: Protocol, timeout: Option<Duration>) -> SearchResult<Self> {
        let base_url = normalize_base_url(base_url)?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            protocol,
            tuning: SemanticTuning::default(),
        })
    }

    #[must_use]
    pub fn with_tuning(mut self, tuning: SemanticTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The full URL a search for `query` is sent to.
    pub fn request_url(&self, query: &ComposedQuery) -> String {
        let pairs = self.protocol.query_pairs(query, &self.tuning);
        format!(
            "{}{}?{}",
            self.base_url,
            self.protocol.path(),
            encode_query(&pairs)
        )
    }

    /// Ask the backend whether its search index is ready.
    pub async fn status(&self) -> SearchResult<BackendStatus> {
        let url = format!("{}{}", self.base_url, STATUS_PATH);
        let response = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(http_error)?;

        response.json().await.map_err(|e| SearchError::Parse {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn search(&self, query: &ComposedQuery) -> SearchResult<SearchPage> {
        if !self.protocol.supports_exclude() && !query.exclude().is_empty() {
            log::debug!(
                "{} protocol ignores {} exclude term(s)",
                self.protocol,
                query.exclude().len()
            );
        }

        let url = self.request_url(query);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(http_error)?;

        let body: Value = response.json().await.map_err(|e| SearchError::Parse {
            message: e.to_string(),
        })?;

        Ok(normalize_body(body))
    }
}

fn http_error(e: reqwest::Error) -> SearchError {
    SearchError::Http {
        status: e.status().map(|s| s.as_u16()),
        message: e.to_string(),
    }
}

fn normalize_base_url(base_url: &str) -> SearchResult<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| SearchError::InvalidBaseUrl(format!("{trimmed}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SearchError::InvalidBaseUrl(format!(
            "{trimmed}: scheme must be http or https"
        )));
    }
    Ok(trimmed.to_string())
}
