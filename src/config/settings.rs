//! Configuration settings for SortCopy
//!
//! Defines the CLI arguments, runtime configuration and defaults
//! for a sort run.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SortCopy - copy a directory tree into per-extension folders
#[derive(Parser, Debug, Clone)]
#[command(name = "sortcopy")]
#[command(author = "SortCopy Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Async file sorting by extensions")]
#[command(long_about = r#"
SortCopy walks a source directory recursively and copies every regular file
into a subfolder of the output directory named after the file's extension.
Files without an extension go to `no_extension`.

Examples:
  sortcopy -s ~/Downloads -o ~/Sorted            # Basic sort
  sortcopy -s src -o out --jobs 8                # At most 8 copies in flight
  sortcopy -s src -o out --on-collision rename   # Keep same-named files apart
  sortcopy -s src -o out --exclude '**/.git/**'  # Skip a subtree
"#)]
pub struct CliArgs {
    /// Source directory with files
    #[arg(short = 's', long, value_name = "DIR")]
    pub source: String,

    /// Directory for sorted files
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: String,

    /// Maximum number of copies in flight (0 = unbounded)
    #[arg(short = 'j', long, value_name = "NUM", env = "SORTCOPY_JOBS")]
    pub jobs: Option<usize>,

    /// What to do when two source files map to the same destination
    #[arg(long, value_enum, default_value = "overwrite")]
    pub on_collision: CollisionPolicy,

    /// File pattern to exclude (glob, relative to the source)
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Print a summary of the run to stdout
    #[arg(long, value_enum, default_value = "none")]
    pub summary: SummaryFormat,

    /// Log line format
    #[arg(long, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl CliArgs {
    /// Default log directive derived from -v / -q
    pub fn log_directive(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Policy for two sources landing on the same destination path
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Last writer wins
    #[default]
    Overwrite,
    /// Later files get a numeric suffix (`name_1.ext`)
    Rename,
}

/// Format of the end-of-run summary
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    /// No summary
    #[default]
    None,
    /// Human-readable text
    Text,
    /// JSON format
    Json,
}

/// Format of log lines
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `timestamp LEVEL target: message`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    /// Source path
    pub source: PathBuf,
    /// Destination root
    pub destination: PathBuf,
    /// Concurrency limit (0 = unbounded)
    pub jobs: usize,
    /// Collision policy
    pub on_collision: CollisionPolicy,
    /// Exclude patterns
    pub exclude_patterns: Vec<String>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            jobs: default_jobs(),
            on_collision: CollisionPolicy::Overwrite,
            exclude_patterns: Vec::new(),
        }
    }
}

/// Default concurrency limit: copies are I/O bound, so oversubscribe the cores
pub fn default_jobs() -> usize {
    num_cpus::get() * 4
}

impl SortConfig {
    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        if args.source.trim().is_empty() {
            return Err("Source path required".to_string());
        }
        if args.output.trim().is_empty() {
            return Err("Output path required".to_string());
        }

        Ok(Self {
            source: PathBuf::from(&args.source),
            destination: PathBuf::from(&args.output),
            jobs: args.jobs.unwrap_or_else(default_jobs),
            on_collision: args.on_collision,
            exclude_patterns: args.exclude.clone(),
        })
    }

    /// Concurrency limit as an option, `None` meaning unbounded
    pub fn concurrency_limit(&self) -> Option<usize> {
        (self.jobs > 0).then_some(self.jobs)
    }
}
