pub mod config;
pub mod search;
pub mod status;

pub use search::run_search;
pub use status::show_status;
