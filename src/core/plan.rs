//! Copy task planning
//!
//! Turns scanned files into copy tasks and applies the collision policy.

use crate::config::CollisionPolicy;
use crate::fs::{bucket_dir, SourceFile};
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A single copy task
#[derive(Debug, Clone)]
pub struct CopyTask {
    /// Task ID (position in the plan)
    pub id: u64,
    /// Source file
    pub source: SourceFile,
    /// Bucket directory the file goes into
    pub bucket: PathBuf,
    /// Full destination path
    pub dest_path: PathBuf,
}

impl CopyTask {
    /// Create a task writing to `<dest_root>/<token>/<basename>`
    pub fn new(id: u64, source: SourceFile, dest_root: &Path) -> Self {
        let bucket = bucket_dir(dest_root, &source.extension);
        let dest_path = bucket.join(&source.file_name);
        Self {
            id,
            source,
            bucket,
            dest_path,
        }
    }
}

/// Build one task per source file.
///
/// With [`CollisionPolicy::Rename`], a destination already claimed earlier in
/// the same batch is replaced by `<stem>_<n><.ext>` with the smallest free `n`.
pub fn plan_tasks(files: Vec<SourceFile>, dest_root: &Path, policy: CollisionPolicy) -> Vec<CopyTask> {
    let mut claimed: HashSet<PathBuf> = HashSet::with_capacity(files.len());

    files
        .into_iter()
        .enumerate()
        .map(|(id, source)| {
            let mut task = CopyTask::new(id as u64, source, dest_root);
            if policy == CollisionPolicy::Rename {
                let mut n = 1u32;
                while claimed.contains(&task.dest_path) {
                    task.dest_path = task.bucket.join(suffixed_name(&task.source.path, n));
                    n += 1;
                }
                claimed.insert(task.dest_path.clone());
            }
            task
        })
        .collect()
}

/// `report.pdf` + 2 -> `report_2.pdf`, `.gitignore` + 1 -> `.gitignore_1`
fn suffixed_name(path: &Path, n: u32) -> OsString {
    let mut name = path.file_stem().map(OsString::from).unwrap_or_default();
    name.push(format!("_{}", n));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}
