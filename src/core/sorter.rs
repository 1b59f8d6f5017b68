//! Sort pipeline
//!
//! Pre-flight check, scan, plan and dispatch, in that order. The scan
//! finishes before any copy starts.

use crate::config::SortConfig;
use crate::core::{plan_tasks, DispatchEngine, SortSummary};
use crate::error::{IoResultExt, Result, SortError};
use crate::fs::{ScanConfig, Scanner};
use crate::LOG_TARGET;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::instrument::WithSubscriber;
use tracing::Dispatch;

/// Sorts a source tree into extension buckets under the destination
pub struct FileSorter {
    config: SortConfig,
    dispatch: Option<Dispatch>,
}

impl FileSorter {
    /// Create a sorter that logs to the current default subscriber
    pub fn new(config: SortConfig) -> Self {
        Self {
            config,
            dispatch: None,
        }
    }

    /// Send every log line of the run, including those from copy tasks, to `dispatch`
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Run the pipeline.
    ///
    /// Errors only when the run cannot start: the source is missing or not a
    /// directory, an exclude pattern is invalid, or the destination root
    /// cannot be created. Scan and per-file failures end up in the summary.
    pub async fn run(&self) -> Result<SortSummary> {
        match &self.dispatch {
            Some(dispatch) => self.execute().with_subscriber(dispatch.clone()).await,
            None => self.execute().await,
        }
    }

    async fn execute(&self) -> Result<SortSummary> {
        let start_time = Instant::now();
        let source = &self.config.source;
        let destination = &self.config.destination;

        self.preflight().await?;

        let mut scanner = Scanner::new(&ScanConfig {
            exclude_patterns: self.config.exclude_patterns.clone(),
            ..Default::default()
        })?;

        tokio::fs::create_dir_all(destination).await.with_path(destination)?;

        // Earlier output inside the source must not be scanned back in
        if let Some(nested) = nested_destination(source, destination).await {
            tracing::debug!(target: LOG_TARGET, "Skipping output folder {}", nested.display());
            scanner = scanner.with_prune_dir(nested);
        }

        let outcome = scanner.scan_async(source).await;
        tracing::info!(target: LOG_TARGET, "Found {} files to sort", outcome.files.len());

        let scan_complete = outcome.is_complete();
        let files_scanned = outcome.files.len() as u64;
        let tasks = plan_tasks(outcome.files, destination, self.config.on_collision);

        let engine = DispatchEngine::new(self.config.concurrency_limit());
        let result = engine.dispatch(tasks).await;

        tracing::info!(target: LOG_TARGET, "Finished");

        Ok(SortSummary {
            files_scanned,
            files_copied: result.files_copied,
            files_failed: result.failures.len() as u64,
            bytes_copied: result.bytes_copied,
            buckets: result.buckets.len(),
            scan_complete,
            failures: result.failures,
            duration: start_time.elapsed(),
        })
    }

    /// The source must exist and be a directory before anything is created
    async fn preflight(&self) -> Result<()> {
        let source = &self.config.source;
        match tokio::fs::metadata(source).await {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => {
                tracing::error!(target: LOG_TARGET, "Source folder {} is not a directory", source.display());
                Err(SortError::NotADirectory(source.clone()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::error!(target: LOG_TARGET, "Source folder {} does not exist", source.display());
                Err(SortError::SourceMissing(source.clone()))
            }
            Err(e) => {
                tracing::error!(target: LOG_TARGET, "Source folder {} is not accessible: {}", source.display(), e);
                Err(SortError::io(source, e))
            }
        }
    }
}

/// The destination as the scanner will see it, when it lies strictly inside the source
async fn nested_destination(source: &Path, destination: &Path) -> Option<PathBuf> {
    let source_canon = tokio::fs::canonicalize(source).await.ok()?;
    let dest_canon = tokio::fs::canonicalize(destination).await.ok()?;
    let rel = dest_canon.strip_prefix(&source_canon).ok()?;
    if rel.as_os_str().is_empty() {
        return None;
    }
    Some(source.join(rel))
}
