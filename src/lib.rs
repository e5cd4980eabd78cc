//! # helpq - diagnostic help/query command for a simulation host
//!
//! `helpq` implements the console `help` command: given a free-text match
//! string and an optional category filter, it searches the host's in-memory
//! catalogs (functions, settings, globals, generic forms) and prints the
//! matching entries to the console sink.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`command`] - Console registration, argument parsing, dispatch
//! - [`query`] - Catalog listings and the per-invocation match context
//! - [`index`] - Persistent cell-name index built from container files
//! - [`scanner`] - Lazy cursor over chunked record container files
//! - [`host`] - Interfaces to the host process, plus a snapshot host
//! - [`utils`] - Utility functions (case-insensitive matching)
//!
//! ## Quick Start
//!
//! ```
//! use helpq::command::{HelpArgs, HelpCommand};
//! use helpq::host::RecordingSink;
//! use helpq::host::snapshot::HostSnapshot;
//!
//! let host = HostSnapshot::default();
//! let mut command = HelpCommand::new();
//! let mut sink = RecordingSink::default();
//!
//! let args = HelpArgs::parse(&["fflora", "2"]);
//! command.execute(&host, &mut sink, &args);
//!
//! for line in &sink.lines {
//!     println!("{line}");
//! }
//! ```
//!
//! ## Design
//!
//! Map cells are special: the host drops their editor ids from the live
//! form graph, so the cell listing works from a lazily built index that
//! scans the raw container files instead of loading them. The index
//! persists across invocations and is invalidated by the host's
//! world-data-reloaded signal.

pub mod command;
pub mod host;
pub mod index;
pub mod query;
pub mod scanner;
pub mod utils;
