//! Plot rendering.
//!
//! - ASCII plots for quick terminal checks (`ascii`)
//! - SVG chart export via Plotters (`chart`)
//! - series preparation shared with the TUI (`series`)

pub mod ascii;
pub mod chart;
pub mod series;

pub use ascii::*;
pub use chart::*;
pub use series::*;
