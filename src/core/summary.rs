//! Run summary
//!
//! Aggregate outcome of a sort run, so callers don't have to infer
//! success from log lines.

use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::time::Duration;

/// One file that could not be copied
#[derive(Debug, Clone, Serialize)]
pub struct CopyFailure {
    /// Source path of the failed file
    pub path: PathBuf,
    /// Error message
    pub error: String,
}

/// Outcome of a sort run
#[derive(Debug, Clone, Default, Serialize)]
pub struct SortSummary {
    /// Regular files found by the scanner
    pub files_scanned: u64,
    /// Files copied successfully
    pub files_copied: u64,
    /// Files that failed to copy
    pub files_failed: u64,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Distinct buckets that received at least one file
    pub buckets: usize,
    /// False if the scan stopped early on an error
    pub scan_complete: bool,
    /// Per-file failures
    pub failures: Vec<CopyFailure>,
    /// Wall-clock time for the whole run
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl SortSummary {
    /// True if the whole tree was read and every file was copied
    pub fn is_success(&self) -> bool {
        self.scan_complete && self.failures.is_empty()
    }

    /// Print summary to stdout
    pub fn print_summary(&self) {
        println!("\n=== Sort Summary ===");
        println!("Files scanned:   {}", self.files_scanned);
        println!("Files copied:    {}", self.files_copied);
        println!("Bytes copied:    {}", humansize::format_size(self.bytes_copied, humansize::BINARY));
        println!("Buckets:         {}", self.buckets);
        println!("Duration:        {:.2?}", self.duration);

        if !self.scan_complete {
            println!("\nScan stopped early; some files were not considered");
        }

        if !self.failures.is_empty() {
            println!("\nFailures: {}", self.failures.len());
            for failure in &self.failures {
                println!("  {} - {}", failure.path.display(), failure.error);
            }
        }
    }

    /// Summary as a JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
