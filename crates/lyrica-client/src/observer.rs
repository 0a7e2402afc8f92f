//! Diagnostics for search sessions.
//!
//! A [`SearchSession`](crate::session::SearchSession) reports what happens
//! to each search through an injected [`SearchObserver`] instead of logging
//! directly, so sessions can run silently in tests.

use std::fmt;

use lyrica_core::ComposedQuery;

use crate::error::SearchError;

/// Something that happened during a search.
#[derive(Debug)]
pub enum SearchEvent<'a> {
    /// A request was dispatched.
    Started {
        generation: u64,
        query: &'a ComposedQuery,
    },
    /// The latest request finished and its results were published.
    Completed {
        generation: u64,
        results: usize,
        skipped: usize,
    },
    /// The latest request failed; the result list was cleared.
    Failed {
        generation: u64,
        error: &'a SearchError,
    },
    /// A response arrived after a newer search was started and was dropped.
    Superseded { generation: u64, latest: u64 },
    /// The backend attached a `message` or `error` to a successful reply.
    BackendNote { generation: u64, note: &'a str },
}

/// Receives [`SearchEvent`]s from a session.
pub trait SearchObserver: Send + Sync + fmt::Debug {
    fn on_event(&self, event: &SearchEvent<'_>);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SearchObserver for LogObserver {
    fn on_event(&self, event: &SearchEvent<'_>) {
        match event {
            SearchEvent::Started { generation, query } => {
                log::info!(
                    "Search #{}: include={:?} exclude={:?}",
                    generation,
                    query.include(),
                    query.exclude()
                );
            }
            SearchEvent::Completed {
                generation,
                results,
                skipped,
            } => {
                log::info!("Search #{}: {} result(s)", generation, results);
                if *skipped > 0 {
                    log::warn!(
                        "Search #{}: skipped {} malformed result(s)",
                        generation,
                        skipped
                    );
                }
            }
            SearchEvent::Failed { generation, error } => {
                log::error!("Search #{} failed: {}", generation, error);
            }
            SearchEvent::Superseded { generation, latest } => {
                log::debug!(
                    "Search #{} superseded by #{}; response discarded",
                    generation,
                    latest
                );
            }
            SearchEvent::BackendNote { generation, note } => {
                log::warn!("Search #{}: backend says: {}", generation, note);
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_event(&self, _event: &SearchEvent<'_>) {}
}
