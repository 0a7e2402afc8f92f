//! Backend search client for lyrica.
//!
//! Sends composed queries to the lyric search backend over HTTP, normalizes
//! whatever shape of result list comes back, and keeps the loading flag and
//! current results for a presentation layer in a [`SearchSession`].

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod client;
pub mod config;
pub mod error;
pub mod observer;
pub mod protocol;
pub mod response;
pub mod session;

pub use client::{BackendStatus, HttpSearchClient, SearchClient};
pub use config::Config;
pub use error::{SearchError, SearchResult};
pub use observer::{LogObserver, NoopObserver, SearchEvent, SearchObserver};
pub use protocol::{Protocol, SemanticTuning};
pub use response::{normalize_body, SearchPage};
pub use session::{SearchOutcome, SearchSession, SessionState};
