use thiserror::Error;

/// Errors raised while composing a query from filter state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// No usable include term was present, so no search may be sent.
    #[error("at least one include term is required")]
    EmptyIncludeSet,
}

impl ComposeError {
    /// Prompt shown to the user when a search is blocked.
    pub fn user_prompt(&self) -> &'static str {
        match self {
            Self::EmptyIncludeSet => "Please add at least one word to include",
        }
    }
}

pub type ComposeResult<T> = std::result::Result<T, ComposeError>;
