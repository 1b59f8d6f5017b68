//! File system module
//!
//! Directory scanning and the mapping from source files to
//! extension buckets.

pub mod bucket;
mod scanner;

pub use bucket::{bucket_dir, extension_token, NO_EXTENSION};
pub use scanner::*;
