//! Core sort engine module
//!
//! Provides task planning, the concurrent dispatch-copy engine
//! and the end-to-end sort pipeline.

mod engine;
mod plan;
mod sorter;
mod summary;

pub use engine::*;
pub use plan::*;
pub use sorter::*;
pub use summary::*;
