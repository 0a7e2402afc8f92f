pub mod ids;
pub mod lenient;
pub mod line;
pub mod song;

pub use ids::SongId;
pub use line::{LineMeta, MatchedLine};
pub use song::{DisplayResult, SongResult};
