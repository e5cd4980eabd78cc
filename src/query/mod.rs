//! Catalog query engine.
//!
//! One listing operation per host catalog (functions, settings, globals,
//! forms) plus the cell sub-listing, all sharing the same shape: iterate the
//! catalog, test candidate fields against the match string, format a display
//! line, write it to the console sink.

pub mod context;
pub mod engine;

pub use context::MatchContext;
pub use engine::HelpQuery;
