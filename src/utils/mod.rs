//! Shared leaf utilities.
//!
//! - [`matcher`] - ASCII case-insensitive substring matching and ordering

pub mod matcher;

pub use matcher::*;
