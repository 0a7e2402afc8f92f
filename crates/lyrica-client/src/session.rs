//! The search session: one loading flag and one current-results slot.
//!
//! Every search is stamped with a generation number when it starts. When a
//! response arrives, it is only allowed to touch the shared state if no
//! newer search has started in the meantime; otherwise it is dropped.
//! Requests themselves are never cancelled, but a search whose future is
//! dropped early gives the loading flag back if it still owned it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lyrica_core::{compose, ComposeResult, DisplayResult, FilterSnapshot, SongResult};

use crate::client::SearchClient;
use crate::error::SearchError;
use crate::observer::{LogObserver, SearchEvent, SearchObserver};

/// What a renderer needs to draw the results area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub loading: bool,
    pub results: Vec<DisplayResult>,
    /// Generation of the search that produced `results`, 0 before any.
    pub generation: u64,
    /// Description of the last failure, cleared by the next success.
    pub last_error: Option<String>,
}

/// How a single search ended, from the caller's point of view.
#[derive(Debug)]
pub enum SearchOutcome {
    /// Results were published.
    Completed { generation: u64, results: usize },
    /// The backend call failed and the result list was cleared.
    Failed { generation: u64, error: SearchError },
    /// A newer search started before this one finished; nothing changed.
    Superseded { generation: u64, latest: u64 },
}

impl SearchOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Completed { generation, .. }
            | Self::Failed { generation, .. }
            | Self::Superseded { generation, .. } => *generation,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Runs searches and owns the state they publish.
#[derive(Debug)]
pub struct SearchSession<C> {
    client: C,
    observer: Arc<dyn SearchObserver>,
    generation: AtomicU64,
    state: Mutex<SessionState>,
}

impl<C: SearchClient> SearchSession<C> {
    /// Create a session that reports through [`LogObserver`].
    pub fn new(client: C) -> Self {
        Self::with_observer(client, Arc::new(LogObserver))
    }

    pub fn with_observer(client: C, observer: Arc<dyn SearchObserver>) -> Self {
        Self {
            client,
            observer,
            generation: AtomicU64::new(0),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Compose `filter` into a query and run it.
    ///
    /// Backend failures are absorbed into [`SearchOutcome::Failed`]; the
    /// only error returned is a composition error, in which case no request
    /// is sent and the state is left untouched.
    pub async fn search(&self, filter: &FilterSnapshot) -> ComposeResult<SearchOutcome> {
        let query = compose(filter)?;

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock().loading = true;
        let mut in_flight = InFlight {
            generation,
            latest: &self.generation,
            state: &self.state,
            answered: false,
        };
        self.observer.on_event(&SearchEvent::Started {
            generation,
            query: &query,
        });

        let result = self.client.search(&query).await;
        in_flight.answered = true;

        let mut state = self.lock();
        let latest = self.generation.load(Ordering::SeqCst);
        if generation != latest {
            drop(state);
            self.observer
                .on_event(&SearchEvent::Superseded { generation, latest });
            return Ok(SearchOutcome::Superseded { generation, latest });
        }

        state.loading = false;
        state.generation = generation;

        match result {
            Ok(page) => {
                state.results = page.results.iter().map(SongResult::to_display).collect();
                state.last_error = None;
                drop(state);

                for note in [&page.message, &page.backend_error].into_iter().flatten() {
                    self.observer.on_event(&SearchEvent::BackendNote {
                        generation,
                        note: note.as_str(),
                    });
                }
                self.observer.on_event(&SearchEvent::Completed {
                    generation,
                    results: page.results.len(),
                    skipped: page.skipped,
                });
                Ok(SearchOutcome::Completed {
                    generation,
                    results: page.results.len(),
                })
            }
            Err(error) => {
                state.results.clear();
                state.last_error = Some(error.to_string());
                drop(state);

                self.observer.on_event(&SearchEvent::Failed {
                    generation,
                    error: &error,
                });
                Ok(SearchOutcome::Failed { generation, error })
            }
        }
    }

    /// A copy of the current state.
    pub fn state(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn results(&self) -> Vec<DisplayResult> {
        self.lock().results.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the loading flag when a search is dropped before its response
/// arrives, unless a newer search has started since.
struct InFlight<'a> {
    generation: u64,
    latest: &'a AtomicU64,
    state: &'a Mutex<SessionState>,
    answered: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.answered {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if self.latest.load(Ordering::SeqCst) == self.generation {
            state.loading = false;
        }
    }
}
