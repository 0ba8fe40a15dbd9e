//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - configuration enums (`ForceOverlay`, `DegreeMode`)
//! - observations and datasets (`Observation`, `Dataset`)
//! - fit outputs (`FitResult`, `CurveModel`, etc.)

pub mod types;

pub use types::*;
