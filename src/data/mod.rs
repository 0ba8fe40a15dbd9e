//! Data sources: the built-in measurements and constants.
//!
//! File-based datasets are loaded by `io::ingest`.

pub mod builtin;

pub use builtin::*;
