//! Model implementations: the fitted polynomial and the reference force curves.
//!
//! Models are implemented as small, pure functions so that fitting/plotting
//! code can stay generic.

pub mod force;
pub mod poly;

pub use force::*;
pub use poly::*;
