//! Core domain logic for lyrica.
//!
//! This crate holds the pure parts of a lyric search: the include/exclude
//! filter state, composition of that state into a wire-ready query, the
//! song result model, and the highlighter that turns backend matched lines
//! into a safe rich-text form. Nothing here performs I/O or logs.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod filter;
pub mod highlight;
pub mod model;
pub mod query;

pub use error::{ComposeError, ComposeResult};
pub use filter::{FilterSnapshot, FilterState};
pub use highlight::{
    escape_html, highlight_lines, normalize_line, parse_bold, HighlightedLine, Segment,
    DISPLAY_LINE_LIMIT,
};
pub use model::{DisplayResult, LineMeta, MatchedLine, SongId, SongResult};
pub use query::{compose, ComposedQuery};
