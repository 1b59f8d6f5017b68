//! SortCopy CLI - sort files into extension folders
//!
//! Copies every file under `--source` into `--output/<extension>/`.

use clap::Parser;
use sortcopy::config::{CliArgs, LogFormat, SortConfig, SummaryFormat};
use sortcopy::core::FileSorter;
use sortcopy::error::{Result, SortError};
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Initialize logging for the lifetime of the process
    let dispatch = build_dispatch(&args);
    if tracing::dispatcher::set_global_default(dispatch.clone()).is_err() {
        eprintln!("Warning: a global log subscriber was already installed");
    }

    // Handle result
    match run(args, dispatch) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn build_dispatch(args: &CliArgs) -> Dispatch {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match args.log_format {
        LogFormat::Text => Dispatch::new(builder.finish()),
        LogFormat::Json => Dispatch::new(builder.json().finish()),
    }
}

fn run(args: CliArgs, dispatch: Dispatch) -> Result<i32> {
    // Build configuration
    let config = SortConfig::from_cli(&args).map_err(SortError::Config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| SortError::config(format!("Failed to create runtime: {}", e)))?;

    let sorter = FileSorter::new(config).with_dispatch(dispatch);
    let summary = match rt.block_on(sorter.run()) {
        Ok(summary) => summary,
        // Already logged by the pre-flight check
        Err(SortError::SourceMissing(_)) | Err(SortError::NotADirectory(_)) => return Ok(1),
        Err(e) => return Err(e),
    };

    match args.summary {
        SummaryFormat::None => {}
        SummaryFormat::Text => summary.print_summary(),
        SummaryFormat::Json => {
            let json = summary
                .to_json()
                .map_err(|e| SortError::config(format!("Failed to encode summary: {}", e)))?;
            println!("{}", json);
        }
    }

    Ok(0)
}
