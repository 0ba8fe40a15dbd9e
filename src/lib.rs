//! `force-fit` library crate.
//!
//! The binary (`forcefit`) is a thin wrapper around this library so that the
//! fit/evaluate/plot pipeline is testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod tui;
