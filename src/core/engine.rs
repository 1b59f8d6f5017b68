//! Dispatch-copy engine
//!
//! Spawns one task per [`CopyTask`], bounded by a semaphore, and gathers
//! every outcome. A failing file is logged and recorded; it never stops
//! its siblings.

use crate::core::{CopyFailure, CopyTask};
use crate::error::{IoResultExt, Result, SortError};
use crate::LOG_TARGET;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::instrument::WithSubscriber;
use tracing::Instrument;

/// Outcome of dispatching a batch of tasks
#[derive(Debug, Default)]
pub struct DispatchResult {
    /// Files copied successfully
    pub files_copied: u64,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Buckets that received at least one file
    pub buckets: HashSet<PathBuf>,
    /// Per-file failures
    pub failures: Vec<CopyFailure>,
}

/// Concurrent copy engine
#[derive(Debug, Clone)]
pub struct DispatchEngine {
    semaphore: Option<Arc<Semaphore>>,
}

impl DispatchEngine {
    /// Create an engine allowing at most `limit` copies in flight (`None` = unbounded)
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            semaphore: limit.map(|n| Arc::new(Semaphore::new(n.max(1)))),
        }
    }

    /// Run every task and wait for all of them to settle.
    ///
    /// Each task logs its own outcome as soon as it finishes.
    pub async fn dispatch(&self, tasks: Vec<CopyTask>) -> DispatchResult {
        let handles: Vec<(PathBuf, JoinHandle<(CopyTask, Result<u64>)>)> = tasks
            .into_iter()
            .map(|task| {
                let source = task.source.path.clone();
                let semaphore = self.semaphore.clone();
                let fut = async move {
                    let result = run_task(&task, semaphore).await;
                    match &result {
                        Ok(_) => tracing::info!(
                            target: LOG_TARGET,
                            "File {} was copied to {}",
                            task.dest_path
                                .file_name()
                                .unwrap_or(task.source.file_name.as_os_str())
                                .to_string_lossy(),
                            task.bucket.display()
                        ),
                        Err(err) => tracing::error!(
                            target: LOG_TARGET,
                            "Copying file error {}: {}",
                            task.source.path.display(),
                            err
                        ),
                    }
                    (task, result)
                };
                let handle = tokio::spawn(fut.in_current_span().with_current_subscriber());
                (source, handle)
            })
            .collect();

        let mut result = DispatchResult::default();
        for (source, handle) in handles {
            match handle.await {
                Ok((task, Ok(bytes))) => {
                    result.files_copied += 1;
                    result.bytes_copied += bytes;
                    result.buckets.insert(task.bucket);
                }
                Ok((task, Err(err))) => result.failures.push(CopyFailure {
                    path: task.source.path,
                    error: err.to_string(),
                }),
                Err(join_err) => {
                    let err = SortError::TaskPanicked(join_err.to_string());
                    tracing::error!(target: LOG_TARGET, "Copying file error {}: {}", source.display(), err);
                    result.failures.push(CopyFailure {
                        path: source,
                        error: err.to_string(),
                    });
                }
            }
        }

        result
    }
}

/// Ensure the bucket exists, then copy the file over any existing destination
async fn run_task(task: &CopyTask, semaphore: Option<Arc<Semaphore>>) -> Result<u64> {
    let _permit = match semaphore {
        Some(semaphore) => Some(
            semaphore
                .acquire_owned()
                .await
                .map_err(|e| SortError::TaskPanicked(format!("Semaphore error: {}", e)))?,
        ),
        None => None,
    };

    // create_dir_all treats a concurrently created bucket as success
    tokio::fs::create_dir_all(&task.bucket).await.with_path(&task.bucket)?;

    // Copying a file onto itself would truncate it to zero bytes
    if is_same_file(&task.source.path, &task.dest_path).await {
        return Err(SortError::SameFile(task.dest_path.clone()));
    }

    tokio::fs::copy(&task.source.path, &task.dest_path)
        .await
        .with_path(&task.dest_path)
}

/// True when both paths exist and resolve to the same location
async fn is_same_file(source: &Path, dest: &Path) -> bool {
    match (tokio::fs::canonicalize(source).await, tokio::fs::canonicalize(dest).await) {
        (Ok(source), Ok(dest)) => source == dest,
        _ => false,
    }
}
