//! Directory scanner
//!
//! Walks the source tree and collects every regular file. Directories are
//! descended into; symlinks and special files are skipped.

use crate::error::{Result, SortError};
use crate::fs::bucket::extension_token;
use crate::LOG_TARGET;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A regular file found by the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path to the file as discovered under the scan root
    pub path: PathBuf,
    /// Base name of the file
    pub file_name: OsString,
    /// Bucket token (lower-cased extension or `no_extension`)
    pub extension: OsString,
}

impl SourceFile {
    /// Build a SourceFile from a path, `None` if the path has no file name
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let file_name = path.file_name()?.to_os_string();
        let extension = extension_token(&path);
        Some(Self {
            path,
            file_name,
            extension,
        })
    }
}

/// Result of a directory scan
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Root path that was scanned
    pub root: PathBuf,
    /// Regular files found before the scan finished or failed
    pub files: Vec<SourceFile>,
    /// Scan duration
    pub scan_duration: std::time::Duration,
    /// Error that cut the scan short, if any
    pub error: Option<SortError>,
}

impl ScanOutcome {
    /// True when the whole tree was read
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Configuration for directory scanning
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Exclude patterns, matched against the path relative to the root
    pub exclude_patterns: Vec<String>,
    /// Directories never descended into, given as `root.join(relative)`
    pub prune_dirs: Vec<PathBuf>,
}

/// Directory scanner
#[derive(Debug, Clone)]
pub struct Scanner {
    exclude_matcher: GlobSet,
    prune_dirs: Vec<PathBuf>,
}

impl Scanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: &ScanConfig) -> Result<Self> {
        Ok(Self {
            exclude_matcher: Self::build_globset(&config.exclude_patterns)?,
            prune_dirs: config.prune_dirs.clone(),
        })
    }

    /// Also skip `dir` and everything below it
    pub fn with_prune_dir(mut self, dir: PathBuf) -> Self {
        self.prune_dirs.push(dir);
        self
    }

    /// Build a GlobSet from patterns
    fn build_globset(patterns: &[String]) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| SortError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| SortError::InvalidPattern(format!("failed to build glob set: {}", e)))
    }

    /// Scan a directory tree.
    ///
    /// Never fails outright: a missing or unreadable root yields zero files,
    /// and an error part way through stops the walk and keeps what was found.
    /// Either way the error is logged and returned in [`ScanOutcome::error`].
    pub fn scan(&self, root: &Path) -> ScanOutcome {
        let start_time = std::time::Instant::now();
        let mut outcome = ScanOutcome {
            root: root.to_path_buf(),
            ..Default::default()
        };

        if let Err(err) = Self::check_root(root) {
            tracing::error!(target: LOG_TARGET, "Reading folder error {}: {}", root.display(), err);
            outcome.error = Some(err);
            outcome.scan_duration = start_time.elapsed();
            return outcome;
        }

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry, root));

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    if let Some(file) = SourceFile::from_path(entry.into_path()) {
                        outcome.files.push(file);
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(target: LOG_TARGET, "Reading folder error {}: {}", root.display(), err);
                    outcome.error = Some(SortError::scan(root, err.to_string()));
                    break;
                }
            }
        }

        outcome.scan_duration = start_time.elapsed();
        tracing::debug!(
            target: LOG_TARGET,
            "Scanned {} in {:?}, {} files",
            root.display(),
            outcome.scan_duration,
            outcome.files.len()
        );
        outcome
    }

    /// Scan on the blocking pool so the runtime threads stay free
    pub async fn scan_async(&self, root: &Path) -> ScanOutcome {
        let scanner = self.clone();
        let owned_root = root.to_path_buf();
        // Blocking threads don't inherit a scoped subscriber
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());
        let walk = move || tracing::dispatcher::with_default(&dispatch, || scanner.scan(&owned_root));
        match tokio::task::spawn_blocking(walk).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(target: LOG_TARGET, "Reading folder error {}: {}", root.display(), err);
                ScanOutcome {
                    root: root.to_path_buf(),
                    error: Some(SortError::scan(root, err.to_string())),
                    ..Default::default()
                }
            }
        }
    }

    fn check_root(root: &Path) -> Result<()> {
        let metadata = std::fs::metadata(root).map_err(|e| SortError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(SortError::NotADirectory(root.to_path_buf()));
        }
        Ok(())
    }

    /// Check if an entry is pruned or matches an exclude pattern
    fn is_excluded(&self, entry: &DirEntry, root: &Path) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        if entry.file_type().is_dir() && self.prune_dirs.iter().any(|dir| dir == entry.path()) {
            return true;
        }
        if self.exclude_matcher.is_empty() {
            return false;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        self.exclude_matcher.is_match(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::CapturedLogs;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        File::create(dir.path().join("a.txt")).unwrap()
            .write_all(b"alpha").unwrap();
        File::create(dir.path().join("readme")).unwrap()
            .write_all(b"read me").unwrap();
        File::create(dir.path().join(".hidden")).unwrap()
            .write_all(b"hidden").unwrap();

        std::fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        File::create(dir.path().join("sub/b.TXT")).unwrap()
            .write_all(b"bravo").unwrap();
        File::create(dir.path().join("sub/deeper/archive.tar.gz")).unwrap()
            .write_all(b"gz").unwrap();

        std::fs::create_dir(dir.path().join("empty")).unwrap();

        dir
    }

    fn names(outcome: &ScanOutcome) -> Vec<String> {
        let mut names: Vec<String> = outcome
            .files
            .iter()
            .map(|f| f.file_name.to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_scan_finds_all_regular_files() {
        let dir = create_test_dir();
        let scanner = Scanner::new(&ScanConfig::default()).unwrap();

        let outcome = scanner.scan(dir.path());

        assert!(outcome.is_complete());
        assert_eq!(
            names(&outcome),
            vec![".hidden", "a.txt", "archive.tar.gz", "b.TXT", "readme"]
        );
    }

    #[test]
    fn test_source_file_tokens() {
        let dir = create_test_dir();
        let scanner = Scanner::new(&ScanConfig::default()).unwrap();

        let outcome = scanner.scan(dir.path());
        let token = |name: &str| {
            outcome
                .files
                .iter()
                .find(|f| f.file_name == name)
                .map(|f| f.extension.clone())
                .unwrap()
        };

        assert_eq!(token("a.txt"), "txt");
        assert_eq!(token("b.TXT"), "txt");
        assert_eq!(token("readme"), "no_extension");
        assert_eq!(token(".hidden"), "no_extension");
        assert_eq!(token("archive.tar.gz"), "gz");
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = TempDir::new().unwrap();
        let scanner = Scanner::new(&ScanConfig::default()).unwrap();

        let outcome = scanner.scan(&dir.path().join("missing"));

        assert!(outcome.files.is_empty());
        assert!(matches!(outcome.error, Some(SortError::Io { .. })));
    }

    #[test]
    fn test_scan_file_as_root() {
        let dir = create_test_dir();
        let scanner = Scanner::new(&ScanConfig::default()).unwrap();

        let outcome = scanner.scan(&dir.path().join("a.txt"));

        assert!(outcome.files.is_empty());
        assert!(matches!(outcome.error, Some(SortError::NotADirectory(_))));
    }

    #[test]
    fn test_scan_exclude_pattern() {
        let dir = create_test_dir();
        let config = ScanConfig {
            exclude_patterns: vec!["sub".to_string(), "*.txt".to_string()],
            ..Default::default()
        };
        let scanner = Scanner::new(&config).unwrap();

        let outcome = scanner.scan(dir.path());

        assert_eq!(names(&outcome), vec![".hidden", "readme"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let config = ScanConfig {
            exclude_patterns: vec!["a[".to_string()],
            ..Default::default()
        };
        assert!(matches!(Scanner::new(&config), Err(SortError::InvalidPattern(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let dir = create_test_dir();
        std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("link.txt")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("sub"), dir.path().join("sublink")).unwrap();
        let scanner = Scanner::new(&ScanConfig::default()).unwrap();

        let outcome = scanner.scan(dir.path());

        assert!(outcome.is_complete());
        assert!(!names(&outcome).contains(&"link.txt".to_string()));
        assert_eq!(outcome.files.len(), 5);
    }

    #[tokio::test]
    async fn test_scan_async_matches_sync() {
        let dir = create_test_dir();
        let scanner = Scanner::new(&ScanConfig::default()).unwrap();

        let sync = scanner.scan(dir.path());
        let from_async = scanner.scan_async(dir.path()).await;

        assert_eq!(sync.files, from_async.files);
    }

    #[test]
    fn test_prune_dirs_are_not_descended() {
        let dir = create_test_dir();
        let config = ScanConfig {
            prune_dirs: vec![dir.path().join("sub")],
            ..Default::default()
        };
        let scanner = Scanner::new(&config).unwrap();

        let outcome = scanner.scan(dir.path());

        assert!(outcome.is_complete());
        assert_eq!(names(&outcome), vec![".hidden", "a.txt", "readme"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdir_keeps_partial_results() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"before").unwrap();
        let locked = dir.path().join("m_locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::write(locked.join("inner.txt"), b"hidden").unwrap();
        std::fs::write(dir.path().join("z.txt"), b"after").unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores directory modes, so only assert the failure when it is real
        let unreadable = std::fs::read_dir(&locked).is_err();
        let logs = CapturedLogs::default();
        let scanner = Scanner::new(&ScanConfig::default()).unwrap();

        let outcome = tracing::dispatcher::with_default(&logs.dispatch(), || scanner.scan(dir.path()));

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert!(names(&outcome).contains(&"a.txt".to_string()));
        if unreadable {
            assert!(!outcome.is_complete());
            assert!(matches!(outcome.error, Some(SortError::Scan { .. })));
            assert!(!names(&outcome).contains(&"inner.txt".to_string()));
            assert!(logs
                .lines()
                .iter()
                .any(|l| l.contains("ERROR") && l.contains("Reading folder error")));
        } else {
            assert!(outcome.is_complete());
            assert_eq!(names(&outcome), vec!["a.txt", "inner.txt", "z.txt"]);
        }
    }
}
