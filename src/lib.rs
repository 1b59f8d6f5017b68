//! # SortCopy - Sort Files into Extension Folders
//!
//! SortCopy scans a source directory recursively and copies every regular
//! file into `<output>/<extension>/<file name>`, running the copies
//! concurrently. Extensions are lower-cased; files without one go to
//! `no_extension`. A file that fails to copy is logged and counted, and
//! the rest of the batch carries on.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sortcopy::config::SortConfig;
//! use sortcopy::core::FileSorter;
//! use std::path::PathBuf;
//!
//! # async fn demo() -> sortcopy::Result<()> {
//! let config = SortConfig {
//!     source: PathBuf::from("/data/inbox"),
//!     destination: PathBuf::from("/data/sorted"),
//!     jobs: 16,
//!     ..Default::default()
//! };
//!
//! let summary = FileSorter::new(config).run().await?;
//! println!("Copied {} of {} files", summary.files_copied, summary.files_scanned);
//! # Ok(())
//! # }
//! ```
//!
//! ## Building Blocks
//!
//! ```no_run
//! use sortcopy::config::CollisionPolicy;
//! use sortcopy::core::{plan_tasks, DispatchEngine};
//! use sortcopy::fs::{ScanConfig, Scanner};
//! use std::path::Path;
//!
//! # async fn demo() -> sortcopy::Result<()> {
//! let scanner = Scanner::new(&ScanConfig::default())?;
//! let outcome = scanner.scan_async(Path::new("/data/inbox")).await;
//!
//! let tasks = plan_tasks(outcome.files, Path::new("/data/sorted"), CollisionPolicy::Rename);
//! let result = DispatchEngine::new(Some(8)).dispatch(tasks).await;
//! println!("{} failures", result.failures.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;
pub mod fs;

#[cfg(test)]
mod test_util;

// Re-export commonly used types
pub use crate::config::{CollisionPolicy, SortConfig};
pub use crate::core::{FileSorter, SortSummary};
pub use crate::error::{Result, SortError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Target of every log event emitted by the library
pub const LOG_TARGET: &str = "file_sorter";

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use sortcopy::prelude::*;
    //! ```

    pub use crate::config::{CollisionPolicy, SortConfig};
    pub use crate::core::{plan_tasks, CopyTask, DispatchEngine, FileSorter, SortSummary};
    pub use crate::error::{Result, SortError};
    pub use crate::fs::{extension_token, ScanConfig, ScanOutcome, Scanner, SourceFile};
}
