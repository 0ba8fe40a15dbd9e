//! Curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit a least-squares polynomial of a given degree
//! - evaluate candidate degrees (parallel) and select by BIC

pub mod polyfit;
pub mod selection;

pub use polyfit::*;
pub use selection::*;
